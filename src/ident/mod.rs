//! Canonical identifiers for documentable declarations.
//!
//! Every namespace, type and member gets exactly one [`Identifier`]: a string
//! following the canonical grammar (`N:`/`T:`/`F:`/`P:`/`M:`/`E:` prefix, dotted
//! declaring-type path, arity suffixes, recursive parameter encoding). The
//! grammar is bit-reproducible: two declarations with identical structural
//! metadata always produce identical strings, independent of build order.
//!
//! Within one module no two declarations share an identifier. Across modules the
//! grammar carries no module qualifier, so two modules can legally produce the
//! same identifier for unrelated types; the documentation tree keeps the
//! (module, identifier) pair as the true key and treats the plain identifier as
//! a display and filename hint. This ambiguity is intentional and covered by the
//! test suite rather than "fixed" by renaming.

/// The identifier grammar implementation
pub mod builder;
/// Deterministic identifier-to-filename mapping for renderers
pub mod filenames;

use std::fmt;

pub use builder::{
    identify_member, identify_member_at_path, identify_namespace, identify_type,
    identify_type_name,
};
pub use filenames::filename_for;

/// A canonical identifier string for one documentable declaration.
///
/// Construct through the [`builder`] functions; the inner string is the exact
/// grammar production and is compared byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    /// Wraps an already-encoded identifier string.
    ///
    /// Used by the canonical XML re-parser; everything else goes through the
    /// [`builder`] functions.
    pub fn new(raw: impl Into<String>) -> Self {
        Identifier(raw.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the identifier, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// The one-letter kind prefix (`N`, `T`, `F`, `P`, `M`, `E`), if present.
    pub fn prefix(&self) -> Option<char> {
        let mut chars = self.0.chars();
        let first = chars.next()?;
        (chars.next() == Some(':')).then_some(first)
    }

    /// The overload-shape key for near-duplicate detection.
    ///
    /// Byref markers are stripped, so `ref`/`out`/by-value variants of the same
    /// parameter list collapse onto one shape. Renderers use this through
    /// [`crate::doctree::builder::DocTree::has_similar_overload`] to avoid
    /// emitting near-duplicate overload summaries.
    pub fn overload_shape(&self) -> String {
        self.0.replace('@', "")
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix() {
        assert_eq!(Identifier::new("T:Lib.Widget").prefix(), Some('T'));
        assert_eq!(Identifier::new("Lib.Widget").prefix(), None);
        assert_eq!(Identifier::new("").prefix(), None);
    }

    #[test]
    fn test_overload_shape_strips_byref() {
        let a = Identifier::new("M:Lib.Widget.Run(`0@,`1)");
        let b = Identifier::new("M:Lib.Widget.Run(`0,`1)");
        assert_eq!(a.overload_shape(), b.overload_shape());
    }
}
