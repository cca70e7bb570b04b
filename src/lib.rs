// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]

//! # cildoc
//!
//! A compiler from .NET module metadata and documentation-comment XML to one canonical,
//! merged **documentation tree**: a namespace → type → member hierarchy in which every
//! declaration carries a deterministically computed identifier string, its resolved
//! documentation text, its overload position, and its visibility classification.
//!
//! Downstream renderers (HTML engines, help-file compilers, GUIs) consume the tree;
//! they are not part of this crate. `cildoc` covers the pipeline up to the handoff:
//!
//! 1. **Metadata** - structural module/type/member metadata behind a narrow
//!    [`metadata::source::MetadataSource`] interface (so PE-backed loaders can live in
//!    a separate, sandboxed process and never execute target code in-process)
//! 2. **Type references** - canonical recursive encoding of every type-usage site
//!    (arrays of arbitrary rank, byref, pointers, generic instantiation, generic
//!    parameter back-references), see [`metadata::typeref`]
//! 3. **Identifiers** - the exact, bit-reproducible identifier grammar
//!    (``T:Lib.Box`2``, ```M:Lib.Box`2.Combine``2(`0,`1,``1,``0)```, ...), see [`ident`]
//! 4. **Tree building** - overload grouping, visibility filtering, doc-comment
//!    merging, namespace-summary merging, duplicate-type handling, structural
//!    validation and canonical XML serialization, see [`doctree`]
//!
//! ## Quick Start
//!
//! ```rust
//! use cildoc::prelude::*;
//!
//! let module = ModuleMetadata::build("Lib")
//!     .ty(TypeMetadata::build(TypeKind::Class, "Lib", "Widget")
//!         .member(MemberMetadata::build(MemberKind::Method, "Run").finish())
//!         .finish())
//!     .finish();
//!
//! let tree = DocBuilder::new(DocConfig::default()).build(vec![module], vec![])?;
//! assert_eq!(tree.namespaces[0].types[0].id.as_str(), "T:Lib.Widget");
//! # Ok::<(), cildoc::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! The pipeline is lenient by design: an individual declaration with an unresolvable
//! type reference is encoded with a placeholder sentinel and reported through
//! [`metadata::diagnostics::Diagnostics`]; missing documentation only increments
//! counters. Only module loading, entirely unparseable documentation XML and a
//! [`doctree::validation`] violation fail a build, always with a single terminal
//! [`Error`].

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// This module provides a curated selection of the most frequently used types
/// from across the cildoc library, allowing for convenient glob imports.
///
/// # Example
///
/// ```rust
/// use cildoc::prelude::*;
///
/// let id = identify_namespace("Lib.Controls");
/// assert_eq!(id.as_str(), "N:Lib.Controls");
/// ```
pub mod prelude;

/// Structural metadata for compiled modules and the recursive type-reference encoding.
///
/// This module owns the input side of the pipeline:
///
/// - [`metadata::source::MetadataSource`] - the narrow loading interface (module path
///   in, structural metadata out); implementations that parse real PE images are
///   external and can be isolated in a separate process
/// - [`metadata::module::ModuleMetadata`] - one immutable record per input module
/// - [`metadata::types`] - type and member metadata, kinds, visibility, origin markers
/// - [`metadata::typeref`] - the [`metadata::typeref::TypeReference`] structure and the
///   encoder that turns type-usage sites into it
/// - [`metadata::diagnostics`] - non-fatal diagnostic collection for lenient builds
pub mod metadata;

/// The canonical identifier grammar and derived per-identifier queries.
///
/// [`ident::builder`] emits the identifier string for any documentable declaration;
/// [`ident::filenames`] maps identifiers to deterministic, filesystem-safe names for
/// renderers. Both are pure functions of their inputs.
pub mod ident;

/// Documentation-tree construction: overloads, filtering, doc merging, validation.
///
/// The [`doctree::builder::DocBuilder`] drives the whole pipeline in a single
/// synchronous pass and hands off a read-only [`doctree::builder::DocTree`].
/// [`doctree::xml`] provides the canonical XML serialization of that tree and the
/// matching re-parser.
pub mod doctree;

/// `cildoc` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always
/// [`Error`]. This is used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `cildoc` Error type
///
/// The main error type for all operations in this crate. See [`error`] for the
/// distinction between fatal errors and reported diagnostics.
pub use error::Error;

/// Main entry point for compiling documentation trees.
///
/// See [`doctree::builder::DocBuilder`] for the pipeline driver and
/// [`doctree::builder::DocTree`] for the resulting structure.
pub use doctree::builder::{DocBuilder, DocTree};

/// The build configuration record (visibility flags, reporting flags, pass-through text).
pub use doctree::config::DocConfig;

/// The canonical identifier string for one documentable declaration.
pub use ident::Identifier;
