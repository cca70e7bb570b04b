//! The visibility filter.
//!
//! A pure predicate over one declaration and one [`DocConfig`]. Evaluation in
//! the tree builder is monotonic top-down: a type failing the filter removes all
//! of its members from consideration without evaluating them, and a member
//! failing the filter is simply omitted without affecting its siblings.
//!
//! Explicit interface implementations are special-cased: they are `Private` at
//! the metadata level but are identified by a distinct marker flag, and their
//! inclusion is governed solely by
//! [`DocConfig::document_explicit_interface_implementations`] (plus origin and
//! browsability), not by the ordinary accessibility options.

use crate::doctree::config::{BrowsableFilterLevel, DocConfig};
use crate::metadata::types::{
    Browsability, MemberMetadata, MemberOrigin, TypeMetadata, Visibility,
};

/// Whether a type declaration is documented under this configuration.
pub fn type_visible(ty: &TypeMetadata, config: &DocConfig) -> bool {
    visibility_allowed(ty.visibility, config) && browsable(ty.browsability, config)
}

/// Whether a member declaration is documented under this configuration.
///
/// Callers must only evaluate members of types that already passed
/// [`type_visible`]; the predicate itself does not re-check the declaring type.
pub fn member_visible(member: &MemberMetadata, config: &DocConfig) -> bool {
    if !browsable(member.browsability, config) {
        return false;
    }

    if !origin_allowed(&member.origin, config) {
        return false;
    }

    if member.is_explicit_impl() {
        return config.document_explicit_interface_implementations;
    }

    visibility_allowed(member.visibility, config)
}

/// The accessibility part of the predicate, shared by types and members.
fn visibility_allowed(visibility: Visibility, config: &DocConfig) -> bool {
    match visibility {
        Visibility::Public => true,
        Visibility::Family => config.document_protected,
        Visibility::Assembly => config.document_internals,
        Visibility::FamilyOrAssembly => {
            if config.document_protected_internal_as_protected {
                config.document_protected
            } else {
                config.document_protected || config.document_internals
            }
        }
        Visibility::FamilyAndAssembly => config.document_internals && config.document_protected,
        Visibility::Private => config.document_privates,
    }
}

fn origin_allowed(origin: &MemberOrigin, config: &DocConfig) -> bool {
    match origin {
        MemberOrigin::Declared => true,
        MemberOrigin::Inherited { .. } => config.document_inherited_members,
        MemberOrigin::FrameworkInherited { .. } => {
            config.document_inherited_members && config.document_inherited_framework_members
        }
    }
}

fn browsable(browsability: Browsability, config: &DocConfig) -> bool {
    match config.editor_browsable_filter {
        BrowsableFilterLevel::Everything => true,
        BrowsableFilterLevel::AdvancedOnly => browsability != Browsability::Never,
        BrowsableFilterLevel::NothingHidden => browsability == Browsability::Always,
    }
}
