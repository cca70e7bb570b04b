//! The document-tree builder and the pipeline driver.
//!
//! [`DocBuilder::build`] runs the whole pipeline in one synchronous pass:
//! encode type references → identify → resolve overloads → filter → merge
//! documentation → bucket by namespace → validate. Each stage consumes the full
//! output of the previous one; module counts are small and streaming is not
//! required. Aborting mid-pipeline simply drops the in-progress tree; there is
//! no partial-result contract.
//!
//! Duplicate type names from distinct modules are preserved as sibling entries
//! under the same namespace, each keeping its owning-module attribution. The
//! (module, identifier) pair is the true unique key of the tree; the plain
//! identifier is a display and filename hint.
//!
//! The per-build [`BuildCache`] replaces the legacy process-wide lookup caches:
//! it is created by `build`, travels inside the returned tree for the renderer
//! queries, and is discarded with it.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;

use crate::doctree::{
    config::DocConfig,
    doccomments::{DocComment, DocMerger, DocSource, MissingDocCounters},
    filter,
    overloads::{resolve_overloads, OverloadTable},
    validation,
};
use crate::ident::{
    filename_for, identify_member, identify_member_at_path, identify_namespace, identify_type,
    identify_type_name, Identifier,
};
use crate::metadata::{
    diagnostics::{DiagnosticCategory, Diagnostics},
    module::ModuleMetadata,
    source::MetadataSource,
    types::{MemberKind, MemberMetadata, MemberOrigin, TypeKind, TypeMetadata, Visibility},
};
use crate::Result;

/// Build-scoped cache for renderer-facing queries.
///
/// Owned by one [`DocTree`]; never shared across builds.
#[derive(Debug, Default)]
pub(crate) struct BuildCache {
    filenames: DashMap<String, String>,
    emitted_shapes: DashMap<String, ()>,
}

/// A namespace node of the documentation tree.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceNode {
    /// Canonical identifier (`N:Lib`), derived from the name
    pub id: Identifier,
    /// Namespace name (empty for the global namespace)
    pub name: String,
    /// Merged summary, first-non-empty-wins across documentation sources
    pub summary: Option<String>,
    /// Documented types, in (module order, metadata order)
    pub types: Vec<TypeNode>,
}

/// A type node of the documentation tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    /// Canonical identifier (``T:Lib.Box`2``)
    pub id: Identifier,
    /// Kind of the declaration
    pub kind: TypeKind,
    /// Owning module, the disambiguator for duplicate type names
    pub module: String,
    /// Namespace this node is bucketed under
    pub namespace: String,
    /// Display name with arity suffix (``Box`2``)
    pub name: String,
    /// Declared accessibility
    pub visibility: Visibility,
    /// Merged documentation
    pub doc: DocComment,
    /// Documented members in metadata enumeration order
    pub members: Vec<MemberNode>,
    /// Overload groups that kept at least one member after filtering
    pub overload_groups: Vec<OverloadGroupNode>,
}

/// Summary of one overload group attached to a type node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverloadGroupNode {
    /// Grouping name (`#ctor` for constructors, the declared name otherwise)
    pub name: String,
    /// Static contract of the group
    pub is_static: bool,
    /// Number of members surviving the filter
    pub members: u32,
}

/// A member node of the documentation tree.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberNode {
    /// Canonical identifier
    pub id: Identifier,
    /// Kind of the declaration
    pub kind: MemberKind,
    /// Declared name (unsanitized)
    pub name: String,
    /// Identifier of the declaring type; for inherited members the type the
    /// member was inherited from, resolvable even when that type is filtered
    pub declaring_type: Identifier,
    /// Presentation ordinal within an overload group of size > 1.
    ///
    /// Assigned over the unfiltered member list in declaration order and never
    /// compacted: when an earlier overload is filtered out, the survivors keep
    /// their declared ordinals and the sequence has a gap.
    pub overload: Option<u32>,
    /// Static contract
    pub is_static: bool,
    /// Declared-here vs inherited-from marker
    pub origin: MemberOrigin,
    /// Declared accessibility
    pub visibility: Visibility,
    /// Merged documentation
    pub doc: DocComment,
}

/// The final namespace → type → member tree handed to renderers.
///
/// Read-only after validation. Renderer queries (filename mapping, overload
/// grouping, overload-shape dedup) are served from the build-scoped cache.
#[derive(Debug)]
pub struct DocTree {
    /// Namespace nodes in sorted name order
    pub namespaces: Vec<NamespaceNode>,
    pub(crate) cache: BuildCache,
}

impl DocTree {
    /// Wraps already-built namespace nodes (used by the XML re-parser).
    pub(crate) fn from_namespaces(namespaces: Vec<NamespaceNode>) -> Self {
        Self {
            namespaces,
            cache: BuildCache::default(),
        }
    }

    /// The canonical filename stem for an identifier, memoized per build.
    pub fn filename_for(&self, identifier: &Identifier) -> String {
        if let Some(cached) = self.cache.filenames.get(identifier.as_str()) {
            return cached.clone();
        }
        let filename = filename_for(identifier);
        self.cache
            .filenames
            .insert(identifier.as_str().to_string(), filename.clone());
        filename
    }

    /// All members of the overload group (type, name, static contract).
    ///
    /// Duplicate type identifiers across modules all contribute; callers that
    /// need one module's view should resolve through
    /// [`DocTree::find_type_in_module`] instead.
    pub fn overload_group(
        &self,
        type_id: &Identifier,
        name: &str,
        is_static: bool,
    ) -> Vec<&MemberNode> {
        self.types()
            .filter(|t| &t.id == type_id)
            .flat_map(|t| t.members.iter())
            .filter(|m| m.name == name && m.is_static == is_static)
            .collect()
    }

    /// Whether a member with the same overload shape was already queried.
    ///
    /// Shape comparison strips byref markers, so `ref`/`out`/by-value variants
    /// of one parameter list count as similar. The first query for a shape
    /// returns `false` and records it; renderers use this to skip
    /// near-duplicate overload summaries.
    pub fn has_similar_overload(&self, member: &MemberNode) -> bool {
        let shape = member.id.overload_shape();
        self.cache.emitted_shapes.insert(shape, ()).is_some()
    }

    /// Iterates all type nodes across namespaces.
    pub fn types(&self) -> impl Iterator<Item = &TypeNode> {
        self.namespaces.iter().flat_map(|ns| ns.types.iter())
    }

    /// The first type node with the given identifier, across all modules.
    pub fn find_type(&self, id: &Identifier) -> Option<&TypeNode> {
        self.types().find(|t| &t.id == id)
    }

    /// The type node with the given identifier owned by a specific module.
    pub fn find_type_in_module(&self, module: &str, id: &Identifier) -> Option<&TypeNode> {
        self.types().find(|t| &t.id == id && t.module == module)
    }
}

/// Pipeline driver: one instance per build configuration.
///
/// # Example
///
/// ```rust
/// use cildoc::prelude::*;
///
/// let module = ModuleMetadata::build("Lib")
///     .ty(TypeMetadata::build(TypeKind::Class, "Lib", "Widget").finish())
///     .finish();
///
/// let builder = DocBuilder::new(DocConfig::default());
/// let tree = builder.build(vec![module], vec![])?;
/// assert_eq!(tree.namespaces.len(), 1);
/// # Ok::<(), cildoc::Error>(())
/// ```
pub struct DocBuilder {
    config: DocConfig,
    diagnostics: Arc<Diagnostics>,
}

impl DocBuilder {
    /// Creates a builder for one configuration.
    #[must_use]
    pub fn new(config: DocConfig) -> Self {
        Self {
            config,
            diagnostics: Arc::new(Diagnostics::new()),
        }
    }

    /// The diagnostics collected by builds run through this builder.
    #[must_use]
    pub fn diagnostics(&self) -> Arc<Diagnostics> {
        Arc::clone(&self.diagnostics)
    }

    /// Loads modules through a [`MetadataSource`] and builds the tree.
    ///
    /// # Errors
    ///
    /// Module loading failures are fatal, as are the conditions of
    /// [`DocBuilder::build`].
    pub fn build_from_source(
        &self,
        source: &dyn MetadataSource,
        module_paths: &[&Path],
        docs: Vec<DocSource>,
    ) -> Result<DocTree> {
        let mut modules = Vec::with_capacity(module_paths.len());
        for path in module_paths {
            modules.push(source.load_module(path)?);
        }
        self.build(modules, docs)
    }

    /// Builds the documentation tree for a set of modules and doc sources.
    ///
    /// # Errors
    ///
    /// Returns an error only for tree-validation violations; unresolvable
    /// references and missing documentation are diagnostics.
    pub fn build(&self, modules: Vec<ModuleMetadata>, docs: Vec<DocSource>) -> Result<DocTree> {
        let merger = DocMerger::new(docs);
        let summaries = merger.namespace_summaries(&self.diagnostics);
        let mut counters = MissingDocCounters::default();

        let mut buckets: BTreeMap<String, Vec<TypeNode>> = BTreeMap::new();
        let mut seen_namespaces: BTreeSet<String> = BTreeSet::new();

        for module in &modules {
            for ty in &module.types {
                seen_namespaces.insert(ty.namespace.clone());

                // Monotonic top-down: an excluded type removes all of its
                // members from consideration without evaluating them.
                if !filter::type_visible(ty, &self.config) {
                    continue;
                }

                let node = self.build_type(module, ty, &merger, &mut counters);
                buckets.entry(ty.namespace.clone()).or_default().push(node);
            }
        }

        self.note_cross_module_duplicates(&buckets);

        let mut namespaces = Vec::new();
        for namespace in &seen_namespaces {
            let types = buckets.remove(namespace).unwrap_or_default();
            let summary = summaries.get(namespace).map(str::to_string);

            if self.config.skip_namespaces_without_summaries && summary.is_none() {
                self.diagnostics.info(
                    DiagnosticCategory::Namespace,
                    format!("Namespace '{namespace}' omitted: no summary available"),
                );
                continue;
            }

            if types.is_empty() && !self.config.document_empty_namespaces {
                self.diagnostics.info(
                    DiagnosticCategory::Namespace,
                    format!("Namespace '{namespace}' dropped: no documented types"),
                );
                continue;
            }

            namespaces.push(NamespaceNode {
                id: identify_namespace(namespace),
                name: namespace.clone(),
                summary,
                types,
            });
        }

        counters.report(&self.diagnostics, &self.config);

        let tree = DocTree {
            namespaces,
            cache: BuildCache::default(),
        };
        validation::validate(&tree)?;
        Ok(tree)
    }

    fn build_type(
        &self,
        module: &ModuleMetadata,
        ty: &TypeMetadata,
        merger: &DocMerger,
        counters: &mut MissingDocCounters,
    ) -> TypeNode {
        let type_id = identify_type(ty);
        let table = resolve_overloads(ty);

        let type_doc = merger.lookup(type_id.as_str()).cloned().unwrap_or_default();
        if type_doc.summary.is_none() {
            counters.summaries += 1;
        }
        if type_doc.remarks.is_none() {
            counters.remarks += 1;
        }

        let mut members = Vec::new();
        let mut survivors = vec![0u32; table.groups.len()];

        for (member_index, member) in ty.members.iter().enumerate() {
            if !filter::member_visible(member, &self.config) {
                continue;
            }

            let id = identify_member(ty, member);
            let declaring_type = match member.origin.inherited_from() {
                Some(from) => identify_type_name(from),
                None => type_id.clone(),
            };

            let doc = self.member_doc(merger, &id, member, counters);

            if let Some(group_index) = table
                .groups
                .iter()
                .position(|g| g.members.contains(&member_index))
            {
                survivors[group_index] += 1;
            }

            members.push(MemberNode {
                id,
                kind: member.kind,
                name: member.name.clone(),
                declaring_type,
                overload: table.ordinals[member_index],
                is_static: member.is_static(),
                origin: member.origin.clone(),
                visibility: member.visibility,
                doc,
            });
        }

        let overload_groups = attach_groups(&table, &survivors);

        TypeNode {
            id: type_id,
            kind: ty.kind,
            module: module.name.clone(),
            namespace: ty.namespace.clone(),
            name: ty.display_name(),
            visibility: ty.visibility,
            doc: type_doc,
            members,
            overload_groups,
        }
    }

    /// Resolves a member's documentation across all sources; first match wins.
    ///
    /// Inherited members fall back to their identifier re-rooted at the
    /// declaring type's path, where compilers emit their documentation.
    fn member_doc(
        &self,
        merger: &DocMerger,
        id: &Identifier,
        member: &MemberMetadata,
        counters: &mut MissingDocCounters,
    ) -> DocComment {
        let mut doc = merger.lookup(id.as_str()).cloned();

        if doc.is_none() {
            if let Some(from) = member.origin.inherited_from() {
                let base_path = identify_type_name(from);
                let rebased = identify_member_at_path(&base_path.as_str()[2..], member);
                doc = merger.lookup(rebased.as_str()).cloned();
            }
        }

        let doc = doc.unwrap_or_default();

        if doc.summary.is_none() {
            counters.summaries += 1;
        }
        if doc.remarks.is_none() {
            counters.remarks += 1;
        }
        for param in &member.params {
            if doc.param(&param.name).is_none() {
                counters.params += 1;
            }
        }
        if member.returns.is_some() && doc.returns.is_none() {
            counters.returns += 1;
        }
        if member.kind == MemberKind::Property && doc.value.is_none() {
            counters.values += 1;
        }

        doc
    }

    /// Notes duplicate identifiers across modules as retained ambiguity.
    fn note_cross_module_duplicates(&self, buckets: &BTreeMap<String, Vec<TypeNode>>) {
        let mut seen: HashSet<&str> = HashSet::new();
        for types in buckets.values() {
            for ty in types {
                if !seen.insert(ty.id.as_str()) {
                    self.diagnostics.info(
                        DiagnosticCategory::General,
                        format!(
                            "Type identifier '{}' occurs in multiple modules; \
                             disambiguate by (module, identifier)",
                            ty.id
                        ),
                    );
                }
            }
        }
    }
}

/// Keeps the overload groups that had more than one member declared and at
/// least one surviving the filter.
fn attach_groups(table: &OverloadTable, survivors: &[u32]) -> Vec<OverloadGroupNode> {
    table
        .groups
        .iter()
        .zip(survivors)
        .filter(|(group, &count)| group.members.len() > 1 && count > 0)
        .map(|(group, &count)| OverloadGroupNode {
            name: group.name.clone(),
            is_static: group.is_static,
            members: count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{sample_doc_xml, sample_module};

    #[test]
    fn test_build_sample_tree() {
        let builder = DocBuilder::new(DocConfig::default());
        let docs = vec![DocSource::from_str("Lib", &sample_doc_xml()).unwrap()];
        let tree = builder.build(vec![sample_module()], docs).unwrap();

        assert_eq!(tree.namespaces.len(), 1);
        let ns = &tree.namespaces[0];
        assert_eq!(ns.id.as_str(), "N:Lib");
        assert_eq!(ns.name, "Lib");
        assert_eq!(ns.summary.as_deref(), Some("The sample library."));

        let box_node = tree.find_type(&Identifier::new("T:Lib.Box`2")).unwrap();
        assert_eq!(box_node.module, "Lib");
        assert_eq!(box_node.name, "Box`2");
        assert_eq!(box_node.doc.summary.as_deref(), Some("A generic container."));
    }

    #[test]
    fn test_member_identifiers_in_tree() {
        let builder = DocBuilder::new(DocConfig::default());
        let tree = builder.build(vec![sample_module()], vec![]).unwrap();

        let box_node = tree.find_type(&Identifier::new("T:Lib.Box`2")).unwrap();
        let ids: Vec<&str> = box_node.members.iter().map(|m| m.id.as_str()).collect();
        assert!(ids.contains(&"M:Lib.Box`2.Combine``2(`0,`1,``1,``0)"));
        assert!(ids.contains(
            &"M:Lib.Box`2.Complex``1(`0@,`1[][],Lib.Box{``0,Lib.Box{`1,`0}},``0[0:,0:]@)"
        ));
    }

    #[test]
    fn test_filename_memoization() {
        let builder = DocBuilder::new(DocConfig::default());
        let tree = builder.build(vec![sample_module()], vec![]).unwrap();

        let id = Identifier::new("T:Lib.Box`2");
        assert_eq!(tree.filename_for(&id), "Lib.Box-2");
        assert_eq!(tree.filename_for(&id), "Lib.Box-2");
    }

    #[test]
    fn test_has_similar_overload() {
        let builder = DocBuilder::new(DocConfig::default());
        let tree = builder.build(vec![sample_module()], vec![]).unwrap();

        let box_node = tree.find_type(&Identifier::new("T:Lib.Box`2")).unwrap();
        let member = &box_node.members[0];
        assert!(!tree.has_similar_overload(member));
        assert!(tree.has_similar_overload(member));
    }

    #[test]
    fn test_empty_namespace_dropped_by_default() {
        let builder = DocBuilder::new(DocConfig::default());
        let module = ModuleMetadata::build("Lib")
            .ty(
                TypeMetadata::build(TypeKind::Class, "Lib.Hidden", "Secret")
                    .visibility(Visibility::Private)
                    .finish(),
            )
            .finish();

        let tree = builder.build(vec![module], vec![]).unwrap();
        assert!(tree.namespaces.is_empty());
    }

    #[test]
    fn test_empty_namespace_kept_when_configured() {
        let config = DocConfig {
            document_empty_namespaces: true,
            ..DocConfig::default()
        };
        let builder = DocBuilder::new(config);
        let module = ModuleMetadata::build("Lib")
            .ty(
                TypeMetadata::build(TypeKind::Class, "Lib.Hidden", "Secret")
                    .visibility(Visibility::Private)
                    .finish(),
            )
            .finish();

        let tree = builder.build(vec![module], vec![]).unwrap();
        assert_eq!(tree.namespaces.len(), 1);
        assert!(tree.namespaces[0].types.is_empty());
    }

    #[test]
    fn test_skip_namespaces_without_summaries() {
        let config = DocConfig {
            skip_namespaces_without_summaries: true,
            ..DocConfig::default()
        };
        let builder = DocBuilder::new(config);
        let tree = builder.build(vec![sample_module()], vec![]).unwrap();

        // No doc sources, no summaries: everything is omitted, not an error.
        assert!(tree.namespaces.is_empty());
        assert!(builder.diagnostics().has_any());
    }
}
