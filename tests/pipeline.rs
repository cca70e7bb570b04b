//! End-to-end pipeline tests: metadata in, validated documentation tree out.

use std::path::Path;

use cildoc::prelude::*;

fn widget_module(module_name: &str) -> ModuleMetadata {
    let widget = TypeMetadata::build(TypeKind::Class, "Lib", "Widget")
        .member(
            MemberMetadata::build(MemberKind::Method, "Run")
                .param("input", TypeReference::named("System", "String"))
                .finish(),
        )
        .member(MemberMetadata::build(MemberKind::Method, "Attach").finish())
        .member(
            MemberMetadata::build(MemberKind::Method, "Run")
                .param("count", TypeReference::named("System", "Int32"))
                .finish(),
        )
        .member(MemberMetadata::build(MemberKind::Method, "Run").finish())
        .finish();

    ModuleMetadata::build(module_name).ty(widget).finish()
}

fn doc_source(module: &str, xml: &str) -> DocSource {
    DocSource::from_str(module, xml).unwrap()
}

#[test]
fn build_is_deterministic() {
    let builder = DocBuilder::new(DocConfig::default());
    let first = builder.build(vec![widget_module("Lib")], vec![]).unwrap();
    let second = builder.build(vec![widget_module("Lib")], vec![]).unwrap();

    assert_eq!(first.namespaces, second.namespaces);
    assert_eq!(first.to_xml(), second.to_xml());
}

#[test]
fn identifiers_are_unique_within_a_module() {
    let builder = DocBuilder::new(DocConfig::default());
    let tree = builder.build(vec![widget_module("Lib")], vec![]).unwrap();

    let ty = &tree.namespaces[0].types[0];
    let mut ids: Vec<&str> = ty.members.iter().map(|m| m.id.as_str()).collect();
    let before = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), before);
}

#[test]
fn overload_ordinals_follow_enumeration_order() {
    let builder = DocBuilder::new(DocConfig::default());
    let tree = builder.build(vec![widget_module("Lib")], vec![]).unwrap();

    let ty = &tree.namespaces[0].types[0];
    let ordinals: Vec<Option<u32>> = ty.members.iter().map(|m| m.overload).collect();
    // The three Run overloads number 0..2 in declaration order; Attach stands alone.
    assert_eq!(ordinals, vec![Some(0), None, Some(1), Some(2)]);

    assert_eq!(ty.overload_groups.len(), 1);
    assert_eq!(ty.overload_groups[0].name, "Run");
    assert_eq!(ty.overload_groups[0].members, 3);

    let group = tree.overload_group(&ty.id.clone(), "Run", false);
    assert_eq!(group.len(), 3);
}

#[test]
fn filtering_is_monotonic_top_down() {
    let hidden = TypeMetadata::build(TypeKind::Class, "Lib", "Secret")
        .visibility(Visibility::Assembly)
        .member(MemberMetadata::build(MemberKind::Method, "Visible").finish())
        .finish();
    let module = ModuleMetadata::build("Lib").ty(hidden).finish();

    let builder = DocBuilder::new(DocConfig::default());
    let tree = builder.build(vec![module], vec![]).unwrap();

    // The public member never surfaces once its type is filtered out.
    assert!(tree.namespaces.is_empty());
}

#[test]
fn namespace_summaries_first_non_empty_wins() {
    let first = doc_source(
        "A",
        r#"<doc><members><member name="N:Lib"><summary></summary></member></members></doc>"#,
    );
    let second = doc_source(
        "B",
        r#"<doc><members><member name="N:Lib"><summary>From B.</summary></member></members></doc>"#,
    );
    let third = doc_source(
        "C",
        r#"<doc><members><member name="N:Lib"><summary>From C.</summary></member></members></doc>"#,
    );

    let builder = DocBuilder::new(DocConfig::default());
    let tree = builder
        .build(vec![widget_module("Lib")], vec![first, second, third])
        .unwrap();

    assert_eq!(tree.namespaces[0].summary.as_deref(), Some("From B."));
    // The dropped duplicate from C is noted, not fatal.
    assert!(builder.diagnostics().has_any());
    assert!(!builder.diagnostics().has_errors());
}

#[test]
fn doc_merge_first_source_wins() {
    let first = doc_source(
        "A",
        r#"<doc><members><member name="T:Lib.Widget"><summary>From A.</summary></member></members></doc>"#,
    );
    let second = doc_source(
        "B",
        r#"<doc><members><member name="T:Lib.Widget"><summary>From B.</summary></member></members></doc>"#,
    );

    let builder = DocBuilder::new(DocConfig::default());
    let tree = builder
        .build(vec![widget_module("Lib")], vec![first, second])
        .unwrap();

    let ty = &tree.namespaces[0].types[0];
    assert_eq!(ty.doc.summary.as_deref(), Some("From A."));
}

#[test]
fn duplicate_type_names_across_modules_are_siblings() {
    let builder = DocBuilder::new(DocConfig::default());
    let tree = builder
        .build(vec![widget_module("Lib"), widget_module("Extras")], vec![])
        .unwrap();

    let ns = &tree.namespaces[0];
    assert_eq!(ns.types.len(), 2);
    assert_eq!(ns.types[0].id, ns.types[1].id);
    assert_ne!(ns.types[0].module, ns.types[1].module);

    let id = ns.types[0].id.clone();
    assert!(tree.find_type_in_module("Lib", &id).is_some());
    assert!(tree.find_type_in_module("Extras", &id).is_some());
    assert!(tree.find_type_in_module("Missing", &id).is_none());
}

#[test]
fn inherited_member_doc_found_under_base_type() {
    let base_doc = doc_source(
        "Lib",
        r#"<doc><members>
            <member name="M:Lib.Base.Helper">
                <summary>Documented on the base type.</summary>
            </member>
        </members></doc>"#,
    );

    let derived = TypeMetadata::build(TypeKind::Class, "Lib", "Derived")
        .member(
            MemberMetadata::build(MemberKind::Method, "Helper")
                .inherited_from("Lib.Base")
                .finish(),
        )
        .finish();
    let module = ModuleMetadata::build("Lib").ty(derived).finish();

    let builder = DocBuilder::new(DocConfig::default());
    let tree = builder.build(vec![module], vec![base_doc]).unwrap();

    let member = &tree.namespaces[0].types[0].members[0];
    assert_eq!(member.id.as_str(), "M:Lib.Derived.Helper");
    assert_eq!(member.declaring_type.as_str(), "T:Lib.Base");
    assert_eq!(
        member.doc.summary.as_deref(),
        Some("Documented on the base type.")
    );
}

#[test]
fn inherited_member_with_unparseable_origin_fails_validation() {
    let derived = TypeMetadata::build(TypeKind::Class, "Lib", "Derived")
        .member(
            MemberMetadata::build(MemberKind::Method, "Helper")
                .inherited_from("Bad+`Name")
                .finish(),
        )
        .finish();
    let module = ModuleMetadata::build("Lib").ty(derived).finish();

    // The verbatim declaring-type fallback is not a grammar production; the
    // validator must reject it rather than hand renderers a dead reference.
    let builder = DocBuilder::new(DocConfig::default());
    assert!(matches!(
        builder.build(vec![module], vec![]),
        Err(Error::MissingDeclaringType(_))
    ));
}

#[test]
fn filtered_overloads_keep_their_declared_ordinals() {
    let widget = TypeMetadata::build(TypeKind::Class, "Lib", "Widget")
        .member(
            MemberMetadata::build(MemberKind::Method, "Run")
                .param("input", TypeReference::named("System", "String"))
                .visibility(Visibility::Assembly)
                .finish(),
        )
        .member(
            MemberMetadata::build(MemberKind::Method, "Run")
                .param("count", TypeReference::named("System", "Int32"))
                .finish(),
        )
        .member(MemberMetadata::build(MemberKind::Method, "Run").finish())
        .finish();
    let module = ModuleMetadata::build("Lib").ty(widget).finish();

    let builder = DocBuilder::new(DocConfig::default());
    let tree = builder.build(vec![module], vec![]).unwrap();

    // Ordinals come from declaration order over the unfiltered list and are
    // not compacted: filtering the first overload leaves a gap at 0.
    let ty = &tree.namespaces[0].types[0];
    let ordinals: Vec<Option<u32>> = ty.members.iter().map(|m| m.overload).collect();
    assert_eq!(ordinals, vec![Some(1), Some(2)]);

    assert_eq!(ty.overload_groups.len(), 1);
    assert_eq!(ty.overload_groups[0].members, 2);
}

#[test]
fn xml_round_trip_preserves_the_tree() {
    let docs = doc_source(
        "Lib",
        r#"<doc><members>
            <member name="N:Lib"><summary>The library.</summary></member>
            <member name="T:Lib.Widget"><summary>A widget.</summary></member>
            <member name="M:Lib.Widget.Run(System.String)">
                <summary>Runs with text.</summary>
                <param name="input">The text.</param>
            </member>
        </members></doc>"#,
    );

    let builder = DocBuilder::new(DocConfig::default());
    let tree = builder
        .build(vec![widget_module("Lib")], vec![docs])
        .unwrap();

    let restored = DocTree::from_xml(&tree.to_xml()).unwrap();
    assert_eq!(tree.namespaces, restored.namespaces);
    assert_eq!(tree.to_xml(), restored.to_xml());
}

#[test]
fn loading_failures_are_fatal() {
    let source = InMemorySource::new().with_module("Lib.dll", widget_module("Lib"));

    let builder = DocBuilder::new(DocConfig::default());
    let ok = builder.build_from_source(&source, &[Path::new("Lib.dll")], vec![]);
    assert!(ok.is_ok());

    let missing = builder.build_from_source(&source, &[Path::new("Other.dll")], vec![]);
    assert!(matches!(missing, Err(Error::ModuleNotFound(_))));
}

#[test]
fn unresolvable_references_do_not_fail_the_build() {
    let diagnostics = Diagnostics::new();
    let encoder = TypeRefEncoder::new(&[], &diagnostics);
    let sentinel = encoder.named("Bad+`Name");

    let widget = TypeMetadata::build(TypeKind::Class, "Lib", "Widget")
        .member(
            MemberMetadata::build(MemberKind::Method, "Run")
                .param("input", sentinel)
                .finish(),
        )
        .finish();
    let module = ModuleMetadata::build("Lib").ty(widget).finish();

    let builder = DocBuilder::new(DocConfig::default());
    let tree = builder.build(vec![module], vec![]).unwrap();

    // The placeholder flows into the identifier; the build stays green.
    let member = &tree.namespaces[0].types[0].members[0];
    assert_eq!(member.id.as_str(), "M:Lib.Widget.Run(Bad+`Name)");
    assert!(diagnostics.has_warnings());
}
