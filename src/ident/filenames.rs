//! Deterministic identifier-to-filename mapping.
//!
//! Renderers name one output file per documentable declaration. The mapping is a
//! pure function of the identifier string: the two-character kind prefix is
//! stripped, `#` is dropped (so `#ctor` becomes `ctor`), backticks and all other
//! characters that are reserved on common filesystems are replaced by `-`. No
//! extension is appended; that choice belongs to the renderer.
//!
//! The mapping is not injective across modules (identifiers themselves are not),
//! which mirrors the intentional (module, identifier) ambiguity of the tree -
//! renderers that emit per-module output must segregate by module directory.

use crate::ident::Identifier;

/// Maps an identifier to a deterministic, filesystem-safe file stem.
///
/// # Examples
///
/// ```rust
/// use cildoc::ident::{filename_for, Identifier};
///
/// let id = Identifier::new("M:Lib.Box`2.#ctor(`0)");
/// assert_eq!(filename_for(&id), "Lib.Box-2.ctor--0-");
/// ```
pub fn filename_for(identifier: &Identifier) -> String {
    let raw = identifier.as_str();
    let body = match identifier.prefix() {
        Some(_) => &raw[2..],
        None => raw,
    };

    let mut out = String::with_capacity(body.len());
    for ch in body.chars() {
        match ch {
            '#' => {}
            c if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' => out.push(c),
            _ => out.push('-'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_prefix() {
        let id = Identifier::new("T:Lib.Widget");
        assert_eq!(filename_for(&id), "Lib.Widget");
    }

    #[test]
    fn test_replaces_reserved_characters() {
        let id = Identifier::new("M:Lib.Box`2.Combine``2(`0,`1)");
        assert_eq!(filename_for(&id), "Lib.Box-2.Combine--2--0--1-");
    }

    #[test]
    fn test_constructor_name() {
        let id = Identifier::new("M:Lib.Widget.#ctor");
        assert_eq!(filename_for(&id), "Lib.Widget.ctor");
    }

    #[test]
    fn test_no_prefix_is_kept_whole() {
        let id = Identifier::new("Lib.Widget");
        assert_eq!(filename_for(&id), "Lib.Widget");
    }

    #[test]
    fn test_deterministic() {
        let id = Identifier::new("P:Lib.Box`2.Item(System.Int32)");
        assert_eq!(filename_for(&id), filename_for(&id));
    }
}
