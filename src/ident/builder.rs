//! The canonical identifier grammar.
//!
//! Grammar summary (all productions are exact and bit-reproducible):
//!
//! - Namespace: `N:` + dotted namespace
//! - Type: `T:` + dotted path; a generic type definition appends a backtick and
//!   its arity (``T:Lib.Box`2``); nested types use `.` exactly like namespace
//!   segments, each generic nesting point keeping its own arity suffix
//! - Field / Property / Event: `F:`/`P:`/`E:` + declaring-type path + `.` + name;
//!   indexers (properties with parameters) append a parenthesized parameter list
//! - Method: `M:` + declaring-type path + `.` + name; a method with its own
//!   generic parameters appends a double backtick and its arity before the
//!   parameter list (```M:Lib.Box`2.Combine``2(...)```)
//! - Constructor: the name segment is `#ctor` (instance) or `#cctor` (static)
//! - Operators keep their reserved method names (`op_Addition` etc.), no special
//!   production
//!
//! Parameter encoding, applied recursively to each [`TypeReference`]:
//!
//! - declaring type's Kth generic parameter: `` `K ``; method's own Kth: ``` ``K ```
//! - array rank 1: `[]`; rank N>1: `[0:,0:,...]` (one `0:` per dimension)
//! - pointer: `*`; byref/`ref`/`out`: trailing `@` after the full signature
//! - constructed generic: `Namespace.Type{arg1,arg2,...}`, each argument itself
//!   fully encoded; the brace list replaces the arity suffix of the segment it
//!   instantiates (``Lib.Box{`1,`0}``, ``Lib.Outer.Function{``0}``)
//! - the parameter list is comma-separated without whitespace and omitted
//!   entirely (no empty parentheses) for zero parameters
//!
//! Dots inside member names (explicit interface implementations) are replaced by
//! `#` so the member-name segment never collides with the path separator.
//!
//! All functions here are pure: no I/O, no caches, no build-order dependence.

use crate::ident::Identifier;
use crate::metadata::{
    typeref::{parse_type_name, TypeReference},
    types::{MemberKind, MemberMetadata, Parameter, TypeMetadata},
};

/// Identifier for a namespace.
pub fn identify_namespace(namespace: &str) -> Identifier {
    Identifier::new(format!("N:{namespace}"))
}

/// Identifier for a type declaration.
pub fn identify_type(ty: &TypeMetadata) -> Identifier {
    Identifier::new(format!("T:{}", type_id_path(ty)))
}

/// Identifier for a type named in reflection style (``Lib.Outer+Inner`2``).
///
/// Used for declaring-type identifiers of inherited members, where only the
/// textual name of the originating type is known. An unparseable name is kept
/// verbatim after the prefix (best effort, the validator decides whether that
/// is acceptable).
pub fn identify_type_name(reflection_name: &str) -> Identifier {
    match parse_type_name(reflection_name) {
        Some(reference) => Identifier::new(format!("T:{}", encode_type_ref(&reference))),
        None => Identifier::new(format!("T:{reflection_name}")),
    }
}

/// Identifier for a member declaration under its declaring type.
///
/// Pure function of the two records; dispatches exhaustively over
/// [`MemberKind`] so a new kind fails to compile until it is handled here.
pub fn identify_member(ty: &TypeMetadata, member: &MemberMetadata) -> Identifier {
    identify_member_at_path(&type_id_path(ty), member)
}

/// Identifier for a member under an explicit declaring-type path.
///
/// Inherited members are looked up in documentation sources under the path of
/// the type that declared them; this variant makes that re-rooting possible
/// without synthesizing a full type record.
pub fn identify_member_at_path(path: &str, member: &MemberMetadata) -> Identifier {
    let id = match member.kind {
        MemberKind::Field => {
            format!("F:{path}.{}", sanitize_member_name(&member.name))
        }
        MemberKind::Event => {
            format!("E:{path}.{}", sanitize_member_name(&member.name))
        }
        MemberKind::Property => {
            format!(
                "P:{path}.{}{}",
                sanitize_member_name(&member.name),
                encode_params(&member.params)
            )
        }
        MemberKind::Constructor => {
            let name = if member.is_static() { "#cctor" } else { "#ctor" };
            format!("M:{path}.{name}{}", encode_params(&member.params))
        }
        MemberKind::Method | MemberKind::Operator => {
            let mut id = format!("M:{path}.{}", sanitize_member_name(&member.name));
            if member.arity() > 0 {
                id.push_str("``");
                id.push_str(&member.arity().to_string());
            }
            id.push_str(&encode_params(&member.params));
            id
        }
    };
    Identifier::new(id)
}

/// The dotted declaring-type path with arity suffixes, without prefix.
pub fn type_id_path(ty: &TypeMetadata) -> String {
    let reference = ty.as_reference();
    encode_type_ref(&reference)
}

/// Encodes one [`TypeReference`] per the parameter grammar.
pub fn encode_type_ref(reference: &TypeReference) -> String {
    match reference {
        TypeReference::Named {
            namespace,
            segments,
            args,
        } => {
            let mut out = String::new();
            if !namespace.is_empty() {
                out.push_str(namespace);
            }
            let last = segments.len().saturating_sub(1);
            for (index, seg) in segments.iter().enumerate() {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(&seg.name);
                // The brace list replaces the instantiated segment's arity suffix.
                if seg.arity > 0 && !(index == last && !args.is_empty()) {
                    out.push('`');
                    out.push_str(&seg.arity.to_string());
                }
            }
            if !args.is_empty() {
                out.push('{');
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        out.push(',');
                    }
                    out.push_str(&encode_type_ref(arg));
                }
                out.push('}');
            }
            out
        }
        TypeReference::TypeParam(k) => format!("`{k}"),
        TypeReference::MethodParam(k) => format!("``{k}"),
        TypeReference::Array { element, rank } => {
            let mut out = encode_type_ref(element);
            if *rank <= 1 {
                out.push_str("[]");
            } else {
                out.push('[');
                for index in 0..*rank {
                    if index > 0 {
                        out.push(',');
                    }
                    out.push_str("0:");
                }
                out.push(']');
            }
            out
        }
        TypeReference::Pointer(inner) => format!("{}*", encode_type_ref(inner)),
        TypeReference::ByRef(inner) => format!("{}@", encode_type_ref(inner)),
        TypeReference::Unresolved(name) => name.clone(),
    }
}

/// Encodes a parameter list; empty for zero parameters (no empty parentheses).
fn encode_params(params: &[Parameter]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let mut out = String::from("(");
    for (index, param) in params.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&encode_type_ref(&param.ty));
        if param.by_ref && !matches!(param.ty, TypeReference::ByRef(_)) {
            out.push('@');
        }
    }
    out.push(')');
    out
}

/// Replaces dots in member names with `#`.
///
/// Explicit interface implementations carry the interface path in their name;
/// the substitution keeps the member-name segment free of the path separator.
fn sanitize_member_name(name: &str) -> String {
    name.replace('.', "#")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::types::{MemberKind, MemberMetadata, TypeKind, TypeMetadata};
    use crate::metadata::typeref::TypeRefSegment;

    fn box_type() -> TypeMetadata {
        TypeMetadata::build(TypeKind::Class, "Lib", "Box")
            .generic_param("S")
            .generic_param("T")
            .finish()
    }

    #[test]
    fn test_namespace_identifier() {
        assert_eq!(
            identify_namespace("Lib.Controls").as_str(),
            "N:Lib.Controls"
        );
    }

    #[test]
    fn test_generic_type_identifier() {
        assert_eq!(identify_type(&box_type()).as_str(), "T:Lib.Box`2");
    }

    #[test]
    fn test_nested_type_identifier() {
        let inner = TypeMetadata::build(TypeKind::Class, "Lib", "Inner")
            .nested_in(vec![TypeRefSegment::generic("Outer", 1)])
            .generic_param("U")
            .finish();
        assert_eq!(identify_type(&inner).as_str(), "T:Lib.Outer`1.Inner`1");
    }

    #[test]
    fn test_field_and_event_identifiers() {
        let ty = box_type();
        let field = MemberMetadata::build(MemberKind::Field, "count").finish();
        let event = MemberMetadata::build(MemberKind::Event, "Changed").finish();

        assert_eq!(identify_member(&ty, &field).as_str(), "F:Lib.Box`2.count");
        assert_eq!(identify_member(&ty, &event).as_str(), "E:Lib.Box`2.Changed");
    }

    #[test]
    fn test_parameterless_method_has_no_parens() {
        let ty = box_type();
        let method = MemberMetadata::build(MemberKind::Method, "Clear").finish();
        assert_eq!(identify_member(&ty, &method).as_str(), "M:Lib.Box`2.Clear");
    }

    #[test]
    fn test_constructor_identifiers() {
        let ty = box_type();
        let ctor = MemberMetadata::build(MemberKind::Constructor, ".ctor")
            .param("initial", TypeReference::TypeParam(0))
            .finish();
        let cctor = MemberMetadata::build(MemberKind::Constructor, ".cctor")
            .static_contract()
            .finish();

        assert_eq!(
            identify_member(&ty, &ctor).as_str(),
            "M:Lib.Box`2.#ctor(`0)"
        );
        assert_eq!(identify_member(&ty, &cctor).as_str(), "M:Lib.Box`2.#cctor");
    }

    #[test]
    fn test_indexer_identifier() {
        let ty = box_type();
        let indexer = MemberMetadata::build(MemberKind::Property, "Item")
            .param("index", TypeReference::named("System", "Int32"))
            .finish();
        assert_eq!(
            identify_member(&ty, &indexer).as_str(),
            "P:Lib.Box`2.Item(System.Int32)"
        );
    }

    #[test]
    fn test_explicit_interface_implementation_name() {
        let ty = box_type();
        let method = MemberMetadata::build(
            MemberKind::Method,
            "System.Collections.IEnumerable.GetEnumerator",
        )
        .explicit_impl()
        .visibility(crate::metadata::types::Visibility::Private)
        .finish();

        assert_eq!(
            identify_member(&ty, &method).as_str(),
            "M:Lib.Box`2.System#Collections#IEnumerable#GetEnumerator"
        );
    }

    #[test]
    fn test_operator_uses_reserved_name() {
        let ty = box_type();
        let op = MemberMetadata::build(MemberKind::Operator, "op_Addition")
            .static_contract()
            .param("left", TypeReference::TypeParam(0))
            .param("right", TypeReference::TypeParam(1))
            .finish();
        assert_eq!(
            identify_member(&ty, &op).as_str(),
            "M:Lib.Box`2.op_Addition(`0,`1)"
        );
    }

    #[test]
    fn test_pointer_encoding() {
        let reference = TypeReference::named("System", "Byte").pointer();
        assert_eq!(encode_type_ref(&reference), "System.Byte*");
    }

    #[test]
    fn test_multidimensional_array_encoding() {
        let reference = TypeReference::TypeParam(0).array(3);
        assert_eq!(encode_type_ref(&reference), "`0[0:,0:,0:]");
    }

    #[test]
    fn test_identify_type_name_roundtrip() {
        assert_eq!(
            identify_type_name("Lib.Outer+Inner`2").as_str(),
            "T:Lib.Outer.Inner`2"
        );
        // Unparseable names are kept verbatim after the prefix.
        assert_eq!(identify_type_name("Bad+`Name").as_str(), "T:Bad+`Name");
    }

    #[test]
    fn test_determinism() {
        let ty = box_type();
        let method = MemberMetadata::build(MemberKind::Method, "Combine")
            .generic_param("U")
            .generic_param("V")
            .param("a", TypeReference::TypeParam(0))
            .param("b", TypeReference::TypeParam(1))
            .param("c", TypeReference::MethodParam(1))
            .param("d", TypeReference::MethodParam(0))
            .finish();

        let first = identify_member(&ty, &method);
        let second = identify_member(&ty, &method);
        assert_eq!(first, second);
        assert_eq!(first.as_str(), "M:Lib.Box`2.Combine``2(`0,`1,``1,``0)");
    }
}
