//! Structural metadata for compiled modules.
//!
//! The input side of the pipeline: loading (behind [`source::MetadataSource`]),
//! the per-module records ([`module::ModuleMetadata`], [`types::TypeMetadata`],
//! [`types::MemberMetadata`]), the recursive type-reference encoding
//! ([`typeref::TypeReference`]) and non-fatal diagnostic collection
//! ([`diagnostics::Diagnostics`]).

/// Non-fatal diagnostic collection for lenient builds
pub mod diagnostics;
/// Per-module metadata records
pub mod module;
/// The narrow metadata-loading interface and the in-memory implementation
pub mod source;
/// Type and member metadata, kinds, visibility, origin markers
pub mod types;
/// Canonical type-reference encoding for type-usage sites
pub mod typeref;
