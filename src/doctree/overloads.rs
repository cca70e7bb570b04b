//! Overload grouping and ordinal assignment.
//!
//! Sibling members sharing (declaring type, name, static contract) form an
//! overload group. Groups are ordered by **first appearance in stable metadata
//! enumeration order**, never alphabetically - downstream identifier-uniqueness
//! assumptions depend on that. Within a group of size > 1 each member gets a
//! zero-based ordinal used only for presentation grouping; the canonical
//! identifier already disambiguates overloads via its parameter list and carries
//! no ordinal. A group of size 1 gets no ordinal.
//!
//! Constructors group under the `#ctor` key; a static constructor groups under
//! `#cctor` with the static contract, so it can never be counted among the
//! instance-constructor overloads.

use std::collections::HashMap;

use crate::metadata::types::{MemberKind, MemberMetadata, TypeMetadata};

/// One overload group over a type's member list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverloadGroup {
    /// Grouping name (`#ctor`/`#cctor` for constructors, the declared name otherwise)
    pub name: String,
    /// Static contract of the group
    pub is_static: bool,
    /// Member indices into the type's member list, in enumeration order
    pub members: Vec<usize>,
}

/// The resolver output for one type: per-member ordinals plus the group table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverloadTable {
    /// Ordinal per member index; `None` for members outside any group of size > 1
    pub ordinals: Vec<Option<u32>>,
    /// All groups in first-appearance order (including singletons)
    pub groups: Vec<OverloadGroup>,
}

impl OverloadTable {
    /// The group a member index belongs to.
    pub fn group_of(&self, member_index: usize) -> Option<&OverloadGroup> {
        self.groups
            .iter()
            .find(|g| g.members.contains(&member_index))
    }
}

/// The grouping name for one member.
pub fn group_name(member: &MemberMetadata) -> String {
    match member.kind {
        MemberKind::Constructor => {
            if member.is_static() {
                "#cctor".to_string()
            } else {
                "#ctor".to_string()
            }
        }
        _ => member.name.clone(),
    }
}

/// Groups a type's members and assigns presentation ordinals.
///
/// Runs over the unfiltered member list; the tree builder intersects the result
/// with the visibility filter and only attaches groups that keep at least one
/// surviving member. Ordinals are never renumbered after filtering: a
/// filtered-out overload leaves a gap, so the surviving ordinals stay stable
/// across configuration changes.
pub fn resolve_overloads(ty: &TypeMetadata) -> OverloadTable {
    let mut groups: Vec<OverloadGroup> = Vec::new();
    let mut index_of: HashMap<(String, bool), usize> = HashMap::new();

    for (member_index, member) in ty.members.iter().enumerate() {
        let key = (group_name(member), member.is_static());
        match index_of.get(&key) {
            Some(&group_index) => groups[group_index].members.push(member_index),
            None => {
                index_of.insert(key.clone(), groups.len());
                groups.push(OverloadGroup {
                    name: key.0,
                    is_static: key.1,
                    members: vec![member_index],
                });
            }
        }
    }

    let mut ordinals = vec![None; ty.members.len()];
    for group in &groups {
        if group.members.len() > 1 {
            for (position, &member_index) in group.members.iter().enumerate() {
                ordinals[member_index] = Some(u32::try_from(position).unwrap_or(u32::MAX));
            }
        }
    }

    OverloadTable { ordinals, groups }
}
