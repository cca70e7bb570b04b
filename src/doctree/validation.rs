//! Structural validation of a finished documentation tree.
//!
//! Runs as the last pipeline stage, before the tree is handed out. Violations
//! here are always fatal - they indicate a broken identifier grammar or a
//! resolver bug, never a user-input problem:
//!
//! - within one module, two sibling declarations must never share an identifier
//! - every inherited member must carry a declaring-type identifier whose body
//!   parses under the grammar, even when the declaring type itself was filtered
//!   out of the tree; the identifier builder's verbatim fallback for
//!   unparseable origin names is rejected here
//! - every attached overload group must contain at least one member

use std::collections::HashMap;

use crate::doctree::builder::{DocTree, TypeNode};
use crate::metadata::typeref::parse_type_name;
use crate::{Error, Result};

/// Checks the tree invariants; any violation aborts the build.
///
/// # Errors
///
/// Returns [`Error::DuplicateIdentifier`], [`Error::MissingDeclaringType`] or
/// [`Error::EmptyOverloadGroup`] for the respective violation.
pub fn validate(tree: &DocTree) -> Result<()> {
    for namespace in &tree.namespaces {
        check_sibling_types(&namespace.types)?;
        for ty in &namespace.types {
            check_members(ty)?;
            check_groups(ty)?;
        }
    }
    Ok(())
}

/// Same-module duplicate type identifiers within one namespace are fatal;
/// cross-module duplicates are legal siblings.
fn check_sibling_types(types: &[TypeNode]) -> Result<()> {
    let mut seen: HashMap<(&str, &str), ()> = HashMap::new();
    for ty in types {
        if seen.insert((ty.module.as_str(), ty.id.as_str()), ()).is_some() {
            return Err(Error::DuplicateIdentifier {
                identifier: ty.id.as_str().to_string(),
                module: ty.module.clone(),
            });
        }
    }
    Ok(())
}

fn check_members(ty: &TypeNode) -> Result<()> {
    let mut seen: HashMap<&str, ()> = HashMap::new();
    for member in &ty.members {
        if seen.insert(member.id.as_str(), ()).is_some() {
            return Err(Error::DuplicateIdentifier {
                identifier: member.id.as_str().to_string(),
                module: ty.module.clone(),
            });
        }

        if member.origin.is_inherited() {
            let resolvable = member
                .declaring_type
                .as_str()
                .strip_prefix("T:")
                .and_then(parse_type_name)
                .is_some();
            if !resolvable {
                return Err(Error::MissingDeclaringType(member.id.as_str().to_string()));
            }
        }
    }
    Ok(())
}

fn check_groups(ty: &TypeNode) -> Result<()> {
    for group in &ty.overload_groups {
        if group.members == 0 {
            return Err(Error::EmptyOverloadGroup(format!(
                "{} on {}",
                group.name, ty.id
            )));
        }
    }
    Ok(())
}
