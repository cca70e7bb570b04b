//! Shared fixtures for unit- and integration-tests.

use crate::metadata::module::ModuleMetadata;
use crate::metadata::typeref::{TypeRefSegment, TypeReference};
use crate::metadata::types::{MemberKind, MemberMetadata, TypeKind, TypeMetadata};

/// A module exercising the interesting corners of the identifier grammar:
/// a two-parameter generic type, generic methods with back-references into
/// both index spaces, byref/jagged/multidimensional parameters, constructed
/// generic arguments and a nested delegate.
pub(crate) fn sample_module() -> ModuleMetadata {
    let combine = MemberMetadata::build(MemberKind::Method, "Combine")
        .generic_param("U")
        .generic_param("V")
        .param("a", TypeReference::TypeParam(0))
        .param("b", TypeReference::TypeParam(1))
        .param("c", TypeReference::MethodParam(1))
        .param("d", TypeReference::MethodParam(0))
        .returns(TypeReference::MethodParam(0))
        .finish();

    let nested_box = TypeReference::generic("Lib", "Box", 2).with_args(vec![
        TypeReference::MethodParam(0),
        TypeReference::generic("Lib", "Box", 2)
            .with_args(vec![TypeReference::TypeParam(1), TypeReference::TypeParam(0)]),
    ]);
    let complex = MemberMetadata::build(MemberKind::Method, "Complex")
        .generic_param("U")
        .byref_param("value", TypeReference::TypeParam(0))
        .param("grid", TypeReference::TypeParam(1).vector().vector())
        .param("boxes", nested_box)
        .byref_param("cells", TypeReference::MethodParam(0).array(2))
        .finish();

    let box_type = TypeMetadata::build(TypeKind::Class, "Lib", "Box")
        .generic_param("S")
        .generic_param("T")
        .member(combine)
        .member(complex)
        .finish();

    let outer = TypeMetadata::build(TypeKind::Class, "Lib", "Outer").finish();

    let function = TypeMetadata::build(TypeKind::Delegate, "Lib", "Function")
        .nested_in(vec![TypeRefSegment::new("Outer")])
        .generic_param("T")
        .finish();

    ModuleMetadata::build("Lib")
        .ty(box_type)
        .ty(outer)
        .ty(function)
        .finish()
}

/// Compiler-style documentation XML matching [`sample_module`].
pub(crate) fn sample_doc_xml() -> String {
    r#"<?xml version="1.0"?>
<doc>
    <assembly><name>Lib</name></assembly>
    <members>
        <member name="N:Lib">
            <summary>The sample library.</summary>
        </member>
        <member name="T:Lib.Box`2">
            <summary>A generic container.</summary>
        </member>
        <member name="M:Lib.Box`2.Combine``2(`0,`1,``1,``0)">
            <summary>Combines four values.</summary>
            <param name="a">First stored value.</param>
            <returns>The combined result.</returns>
        </member>
    </members>
</doc>"#
        .to_string()
}
