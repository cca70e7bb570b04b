//! Documentation-tree construction.
//!
//! The pipeline stages live here: overload grouping ([`overloads`]), visibility
//! filtering ([`filter`]), documentation-comment parsing and merging
//! ([`doccomments`]), tree assembly ([`builder`]), structural validation
//! ([`validation`]) and the canonical XML form ([`xml`]). [`config`] holds the
//! per-build option record consumed by all of them.

/// The per-build configuration record
pub mod config;
/// Documentation-comment sources, merging and missing-doc accounting
pub mod doccomments;
/// The pure visibility predicate
pub mod filter;
/// Overload grouping and ordinal assignment
pub mod overloads;
/// Structural validation of finished trees
pub mod validation;
/// Canonical XML serialization and re-parsing
pub mod xml;

/// The pipeline driver and the tree node types
pub mod builder;
