//! Canonical XML form of a documentation tree.
//!
//! [`DocTree::to_xml`] writes the whole tree - namespaces, types, members,
//! overload groups and merged documentation - into one XML document;
//! [`DocTree::from_xml`] reads it back. The two are isomorphic over everything
//! except the build-scoped cache, which is recreated empty on load.
//!
//! The writer emits deterministic output: identical trees serialize
//! byte-for-byte identically, so the XML doubles as a golden-file format for
//! pipeline tests. Type nodes do not repeat their namespace; the reader
//! restores it from the enclosing `namespace` element.

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::doctree::builder::{DocTree, MemberNode, NamespaceNode, OverloadGroupNode, TypeNode};
use crate::doctree::doccomments::{
    optional_attr, parse_member, read_flattened_text, require_attr, skip_element, DocComment,
};
use crate::ident::{identify_namespace, Identifier};
use crate::metadata::types::{MemberKind, MemberOrigin, TypeKind, Visibility};
use crate::{Error, Result};

impl DocTree {
    /// Serializes the tree into its canonical XML document.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        out.push_str("<docs>\n");
        for namespace in &self.namespaces {
            write_namespace(&mut out, namespace);
        }
        out.push_str("</docs>\n");
        out
    }

    /// Parses a tree back from its canonical XML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] for blank input and [`Error::Malformed`] for
    /// anything the canonical writer would not have produced.
    pub fn from_xml(xml: &str) -> Result<Self> {
        if xml.trim().is_empty() {
            return Err(Error::Empty);
        }

        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut namespaces = Vec::new();
        loop {
            let event = reader
                .read_event()
                .map_err(|e| malformed_error!("invalid tree XML - {}", e))?;
            match event {
                Event::Start(e) if e.name().as_ref() == b"namespace" => {
                    namespaces.push(read_namespace(&mut reader, &e)?);
                }
                Event::Empty(e) if e.name().as_ref() == b"namespace" => {
                    let name = require_attr(&e, "name")?;
                    namespaces.push(NamespaceNode {
                        id: identify_namespace(&name),
                        name,
                        summary: optional_attr(&e, "summary")?,
                        types: Vec::new(),
                    });
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(DocTree::from_namespaces(namespaces))
    }
}

fn write_namespace(out: &mut String, namespace: &NamespaceNode) {
    out.push_str("  <namespace");
    push_attr(out, "name", &namespace.name);
    if let Some(summary) = &namespace.summary {
        push_attr(out, "summary", summary);
    }
    if namespace.types.is_empty() {
        out.push_str("/>\n");
        return;
    }
    out.push_str(">\n");
    for ty in &namespace.types {
        write_type(out, ty);
    }
    out.push_str("  </namespace>\n");
}

fn write_type(out: &mut String, ty: &TypeNode) {
    out.push_str("    <type");
    push_attr(out, "id", ty.id.as_str());
    push_attr(out, "kind", &ty.kind.to_string());
    push_attr(out, "module", &ty.module);
    push_attr(out, "name", &ty.name);
    push_attr(out, "visibility", &ty.visibility.to_string());

    let bare = ty.doc.is_empty() && ty.members.is_empty() && ty.overload_groups.is_empty();
    if bare {
        out.push_str("/>\n");
        return;
    }
    out.push_str(">\n");

    write_doc(out, "      ", &ty.doc);

    for group in &ty.overload_groups {
        out.push_str("      <overloadGroup");
        push_attr(out, "name", &group.name);
        push_attr(out, "static", bool_str(group.is_static));
        push_attr(out, "members", &group.members.to_string());
        out.push_str("/>\n");
    }

    for member in &ty.members {
        write_member(out, member);
    }

    out.push_str("    </type>\n");
}

fn write_member(out: &mut String, member: &MemberNode) {
    out.push_str("      <member");
    push_attr(out, "id", member.id.as_str());
    push_attr(out, "kind", &member.kind.to_string());
    push_attr(out, "name", &member.name);
    push_attr(out, "declaringType", member.declaring_type.as_str());
    if let Some(ordinal) = member.overload {
        push_attr(out, "overload", &ordinal.to_string());
    }
    push_attr(out, "static", bool_str(member.is_static));
    push_attr(out, "visibility", &member.visibility.to_string());
    match &member.origin {
        MemberOrigin::Declared => push_attr(out, "origin", "Declared"),
        MemberOrigin::Inherited { from } => {
            push_attr(out, "origin", "Inherited");
            push_attr(out, "inheritedFrom", from);
        }
        MemberOrigin::FrameworkInherited { from } => {
            push_attr(out, "origin", "FrameworkInherited");
            push_attr(out, "inheritedFrom", from);
        }
    }

    if member.doc.is_empty() {
        out.push_str("/>\n");
        return;
    }
    out.push_str(">\n");
    write_doc(out, "        ", &member.doc);
    out.push_str("      </member>\n");
}

fn write_doc(out: &mut String, indent: &str, doc: &DocComment) {
    let blocks = [
        ("summary", &doc.summary),
        ("remarks", &doc.remarks),
        ("returns", &doc.returns),
        ("value", &doc.value),
    ];
    for (tag, text) in blocks {
        if let Some(text) = text {
            out.push_str(indent);
            out.push('<');
            out.push_str(tag);
            out.push('>');
            out.push_str(&escape(text.as_str()));
            out.push_str("</");
            out.push_str(tag);
            out.push_str(">\n");
        }
    }
    for (name, text) in &doc.params {
        out.push_str(indent);
        out.push_str("<param");
        push_attr(out, "name", name);
        out.push('>');
        out.push_str(&escape(text.as_str()));
        out.push_str("</param>\n");
    }
    for (cref, text) in &doc.exceptions {
        out.push_str(indent);
        out.push_str("<exception");
        push_attr(out, "cref", cref);
        out.push('>');
        out.push_str(&escape(text.as_str()));
        out.push_str("</exception>\n");
    }
    for cref in &doc.seealso {
        out.push_str(indent);
        out.push_str("<seealso");
        push_attr(out, "cref", cref);
        out.push_str("/>\n");
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn read_namespace(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> Result<NamespaceNode> {
    let name = require_attr(start, "name")?;
    let summary = optional_attr(start, "summary")?;
    let mut types = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| malformed_error!("invalid tree XML - {}", e))?;
        match event {
            Event::Start(e) if e.name().as_ref() == b"type" => {
                types.push(read_type(reader, &e, &name, false)?);
            }
            Event::Empty(e) if e.name().as_ref() == b"type" => {
                types.push(read_type(reader, &e, &name, true)?);
            }
            Event::End(e) if e.name().as_ref() == b"namespace" => break,
            Event::Eof => return Err(malformed_error!("unterminated 'namespace' element")),
            _ => {}
        }
    }

    Ok(NamespaceNode {
        id: identify_namespace(&name),
        name,
        summary,
        types,
    })
}

fn read_type(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
    namespace: &str,
    bare: bool,
) -> Result<TypeNode> {
    let mut node = TypeNode {
        id: Identifier::new(require_attr(start, "id")?),
        kind: parse_enum::<TypeKind>(&require_attr(start, "kind")?, "type kind")?,
        module: require_attr(start, "module")?,
        namespace: namespace.to_string(),
        name: require_attr(start, "name")?,
        visibility: parse_enum::<Visibility>(&require_attr(start, "visibility")?, "visibility")?,
        doc: DocComment::default(),
        members: Vec::new(),
        overload_groups: Vec::new(),
    };
    if bare {
        return Ok(node);
    }

    loop {
        let event = reader
            .read_event()
            .map_err(|e| malformed_error!("invalid tree XML - {}", e))?;
        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"member" => node.members.push(read_member(reader, &e, false)?),
                b"summary" => {
                    let text = read_flattened_text(reader, b"summary")?;
                    node.doc.summary.get_or_insert(text);
                }
                b"remarks" => {
                    let text = read_flattened_text(reader, b"remarks")?;
                    node.doc.remarks.get_or_insert(text);
                }
                b"returns" => {
                    let text = read_flattened_text(reader, b"returns")?;
                    node.doc.returns.get_or_insert(text);
                }
                b"value" => {
                    let text = read_flattened_text(reader, b"value")?;
                    node.doc.value.get_or_insert(text);
                }
                b"param" => {
                    let name = require_attr(&e, "name")?;
                    let text = read_flattened_text(reader, b"param")?;
                    node.doc.params.push((name, text));
                }
                b"exception" => {
                    let cref = require_attr(&e, "cref")?;
                    let text = read_flattened_text(reader, b"exception")?;
                    node.doc.exceptions.push((cref, text));
                }
                other => {
                    let tag = other.to_vec();
                    skip_element(reader, &tag)?;
                }
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"member" => node.members.push(read_member(reader, &e, true)?),
                b"overloadGroup" => node.overload_groups.push(read_group(&e)?),
                b"seealso" => {
                    if let Some(cref) = optional_attr(&e, "cref")? {
                        node.doc.seealso.push(cref);
                    }
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"type" => break,
            Event::Eof => return Err(malformed_error!("unterminated 'type' element")),
            _ => {}
        }
    }

    Ok(node)
}

fn read_member(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
    bare: bool,
) -> Result<MemberNode> {
    let origin = match require_attr(start, "origin")?.as_str() {
        "Declared" => MemberOrigin::Declared,
        "Inherited" => MemberOrigin::Inherited {
            from: require_attr(start, "inheritedFrom")?,
        },
        "FrameworkInherited" => MemberOrigin::FrameworkInherited {
            from: require_attr(start, "inheritedFrom")?,
        },
        other => return Err(malformed_error!("unknown member origin '{}'", other)),
    };

    let overload = match optional_attr(start, "overload")? {
        Some(value) => Some(
            value
                .parse::<u32>()
                .map_err(|e| malformed_error!("invalid overload ordinal '{}' - {}", value, e))?,
        ),
        None => None,
    };

    let doc = if bare {
        DocComment::default()
    } else {
        // Member elements hold only documentation blocks; the compiler-XML
        // member parser reads exactly that shape.
        parse_member(reader)?
    };

    Ok(MemberNode {
        id: Identifier::new(require_attr(start, "id")?),
        kind: parse_enum::<MemberKind>(&require_attr(start, "kind")?, "member kind")?,
        name: require_attr(start, "name")?,
        declaring_type: Identifier::new(require_attr(start, "declaringType")?),
        overload,
        is_static: parse_bool(&require_attr(start, "static")?)?,
        visibility: parse_enum::<Visibility>(&require_attr(start, "visibility")?, "visibility")?,
        origin,
        doc,
    })
}

fn read_group(element: &BytesStart<'_>) -> Result<OverloadGroupNode> {
    let members = require_attr(element, "members")?;
    Ok(OverloadGroupNode {
        name: require_attr(element, "name")?,
        is_static: parse_bool(&require_attr(element, "static")?)?,
        members: members
            .parse::<u32>()
            .map_err(|e| malformed_error!("invalid group size '{}' - {}", members, e))?,
    })
}

fn parse_enum<T: std::str::FromStr>(value: &str, what: &str) -> Result<T> {
    value
        .parse::<T>()
        .map_err(|_| malformed_error!("unknown {} '{}'", what, value))
}

fn parse_bool(value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(malformed_error!("invalid boolean '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> DocTree {
        DocTree::from_namespaces(vec![NamespaceNode {
            id: Identifier::new("N:Lib"),
            name: "Lib".to_string(),
            summary: Some("The sample library.".to_string()),
            types: vec![TypeNode {
                id: Identifier::new("T:Lib.Box`2"),
                kind: TypeKind::Class,
                module: "Lib".to_string(),
                namespace: "Lib".to_string(),
                name: "Box`2".to_string(),
                visibility: Visibility::Public,
                doc: DocComment {
                    summary: Some("A generic container.".to_string()),
                    ..DocComment::default()
                },
                members: vec![MemberNode {
                    id: Identifier::new("M:Lib.Box`2.Combine``2(`0,`1,``1,``0)"),
                    kind: MemberKind::Method,
                    name: "Combine".to_string(),
                    declaring_type: Identifier::new("T:Lib.Box`2"),
                    overload: Some(0),
                    is_static: false,
                    origin: MemberOrigin::Declared,
                    visibility: Visibility::Public,
                    doc: DocComment {
                        summary: Some("Combines values & things.".to_string()),
                        params: vec![("first".to_string(), "The first value.".to_string())],
                        ..DocComment::default()
                    },
                }],
                overload_groups: vec![OverloadGroupNode {
                    name: "Combine".to_string(),
                    is_static: false,
                    members: 2,
                }],
            }],
        }])
    }

    #[test]
    fn test_round_trip() {
        let tree = sample_tree();
        let xml = tree.to_xml();
        let restored = DocTree::from_xml(&xml).unwrap();
        assert_eq!(tree.namespaces, restored.namespaces);
    }

    #[test]
    fn test_output_is_deterministic() {
        assert_eq!(sample_tree().to_xml(), sample_tree().to_xml());
    }

    #[test]
    fn test_escaping_survives() {
        let xml = sample_tree().to_xml();
        assert!(xml.contains("Combines values &amp; things."));
        let restored = DocTree::from_xml(&xml).unwrap();
        let member = &restored.namespaces[0].types[0].members[0];
        assert_eq!(
            member.doc.summary.as_deref(),
            Some("Combines values & things.")
        );
    }

    #[test]
    fn test_namespace_restored_on_types() {
        let restored = DocTree::from_xml(&sample_tree().to_xml()).unwrap();
        assert_eq!(restored.namespaces[0].types[0].namespace, "Lib");
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(DocTree::from_xml("  "), Err(Error::Empty)));
    }

    #[test]
    fn test_unknown_kind_is_malformed() {
        let xml = r#"<docs><namespace name="Lib">
            <type id="T:Lib.W" kind="Gadget" module="Lib" name="W" visibility="Public"/>
        </namespace></docs>"#;
        assert!(matches!(
            DocTree::from_xml(xml),
            Err(Error::Malformed { .. })
        ));
    }
}
