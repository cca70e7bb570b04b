//! Canonical type-reference encoding for type-usage sites.
//!
//! Every place a type is *used* (a field's type, a parameter, a return type, a base
//! type) is captured as a [`TypeReference`]: a recursive structure describing either
//! a named type (optionally a constructed generic with resolved arguments), a
//! back-reference to a generic parameter of the enclosing type or method, or any of
//! those wrapped in array-rank, pointer or byref annotations.
//!
//! Generic parameter back-references live in **two independent zero-based index
//! spaces**: [`TypeReference::TypeParam`] indexes the declaring type's parameter
//! list, [`TypeReference::MethodParam`] the enclosing method's own list. The
//! identifier builder renders them as `` `K `` and ``` ``K ``` respectively.
//!
//! Unresolvable references (e.g. a type from a module that is not part of the
//! documented set) are never an error: [`TypeRefEncoder::named`] encodes them as
//! [`TypeReference::Unresolved`] placeholders and pushes a warning diagnostic, and
//! the build continues.

use crate::metadata::{
    diagnostics::{DiagnosticCategory, Diagnostics},
    module::ModuleMetadata,
};

/// One dotted segment of a named type path, carrying its own generic arity.
///
/// Nested generic types keep an arity per nesting point, so `Lib.Outer<T>.Inner<U,V>`
/// is the segment list `[Outer/1, Inner/2]` under namespace `Lib`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRefSegment {
    /// Simple name of the segment, without any arity suffix
    pub name: String,
    /// Number of generic parameters declared at this nesting point
    pub arity: u32,
}

impl TypeRefSegment {
    /// Creates a non-generic segment.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arity: 0,
        }
    }

    /// Creates a segment with the given generic arity.
    pub fn generic(name: impl Into<String>, arity: u32) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }
}

/// A canonical reference to a type at a usage site.
///
/// The structure is recursive: array elements, pointer targets, byref targets and
/// generic arguments are themselves `TypeReference`s, so arbitrarily nested shapes
/// like `Box<U, Box<T, S>>[][]` are representable without special cases.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeReference {
    /// A named type, optionally a constructed generic with resolved arguments.
    ///
    /// `namespace` may be empty for types in the global namespace. `segments` is
    /// the nesting chain, outermost first; each segment carries its own arity.
    /// `args` is empty for a plain (or open) reference and carries the full,
    /// flattened argument list for a constructed generic.
    Named {
        /// Dotted namespace, empty for the global namespace
        namespace: String,
        /// Nesting chain, outermost segment first
        segments: Vec<TypeRefSegment>,
        /// Generic arguments for a constructed generic reference
        args: Vec<TypeReference>,
    },

    /// Back-reference to the declaring type's Nth generic parameter.
    TypeParam(u32),

    /// Back-reference to the enclosing method's Nth generic parameter.
    MethodParam(u32),

    /// An array of the element type with the given rank (1 = vector).
    ///
    /// Jagged arrays nest: `T[][]` is `Array { element: Array { element: T, rank: 1 }, rank: 1 }`.
    Array {
        /// Element type of the array
        element: Box<TypeReference>,
        /// Number of dimensions; rank 1 renders as `[]`, rank N as `[0:,0:,...]`
        rank: u32,
    },

    /// An unmanaged pointer to the target type.
    Pointer(Box<TypeReference>),

    /// A byref (managed reference) to the target type.
    ///
    /// Parameters usually carry byref as a flag on the parameter itself; this
    /// variant exists for byref return types and nested positions.
    ByRef(Box<TypeReference>),

    /// Placeholder sentinel for a reference that could not be resolved.
    ///
    /// Carries the best-effort display name. Encoding one of these is always
    /// accompanied by a [`DiagnosticCategory::TypeReference`] warning.
    Unresolved(String),
}

impl TypeReference {
    /// Creates a plain named reference from a namespace and a simple name.
    pub fn named(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeReference::Named {
            namespace: namespace.into(),
            segments: vec![TypeRefSegment::new(name)],
            args: Vec::new(),
        }
    }

    /// Creates a named reference to a generic type definition.
    pub fn generic(namespace: impl Into<String>, name: impl Into<String>, arity: u32) -> Self {
        TypeReference::Named {
            namespace: namespace.into(),
            segments: vec![TypeRefSegment::generic(name, arity)],
            args: Vec::new(),
        }
    }

    /// Creates a named reference from an explicit nesting chain.
    pub fn nested(namespace: impl Into<String>, segments: Vec<TypeRefSegment>) -> Self {
        TypeReference::Named {
            namespace: namespace.into(),
            segments,
            args: Vec::new(),
        }
    }

    /// Instantiates this reference with generic arguments.
    ///
    /// Only meaningful on [`TypeReference::Named`]; other shapes are returned
    /// unchanged (a generic parameter cannot itself be instantiated).
    #[must_use]
    pub fn with_args(self, args: Vec<TypeReference>) -> Self {
        match self {
            TypeReference::Named {
                namespace,
                segments,
                ..
            } => TypeReference::Named {
                namespace,
                segments,
                args,
            },
            other => other,
        }
    }

    /// Wraps this reference in an array of the given rank.
    #[must_use]
    pub fn array(self, rank: u32) -> Self {
        TypeReference::Array {
            element: Box::new(self),
            rank,
        }
    }

    /// Wraps this reference in a single-dimension array.
    #[must_use]
    pub fn vector(self) -> Self {
        self.array(1)
    }

    /// Wraps this reference in a pointer.
    #[must_use]
    pub fn pointer(self) -> Self {
        TypeReference::Pointer(Box::new(self))
    }

    /// Wraps this reference in a byref.
    #[must_use]
    pub fn by_ref(self) -> Self {
        TypeReference::ByRef(Box::new(self))
    }

    /// Returns true if this reference (or any nested part of it) is unresolved.
    pub fn has_unresolved(&self) -> bool {
        match self {
            TypeReference::Unresolved(_) => true,
            TypeReference::Named { args, .. } => args.iter().any(TypeReference::has_unresolved),
            TypeReference::Array { element, .. } => element.has_unresolved(),
            TypeReference::Pointer(inner) | TypeReference::ByRef(inner) => inner.has_unresolved(),
            TypeReference::TypeParam(_) | TypeReference::MethodParam(_) => false,
        }
    }

    /// Best-effort display name, used in diagnostics.
    pub fn display_name(&self) -> String {
        match self {
            TypeReference::Named {
                namespace,
                segments,
                ..
            } => {
                let mut out = String::new();
                if !namespace.is_empty() {
                    out.push_str(namespace);
                }
                for seg in segments {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(&seg.name);
                }
                out
            }
            TypeReference::TypeParam(k) => format!("!{k}"),
            TypeReference::MethodParam(k) => format!("!!{k}"),
            TypeReference::Array { element, .. } => format!("{}[]", element.display_name()),
            TypeReference::Pointer(inner) => format!("{}*", inner.display_name()),
            TypeReference::ByRef(inner) => format!("{}&", inner.display_name()),
            TypeReference::Unresolved(name) => name.clone(),
        }
    }
}

/// Encoder that turns raw type-usage sites into [`TypeReference`]s.
///
/// The encoder resolves textual type names against the set of loaded modules. A
/// name that matches a declared type is encoded with that type's exact namespace,
/// nesting chain and arities; a name that matches nothing becomes an
/// [`TypeReference::Unresolved`] sentinel plus a warning diagnostic. Resolution
/// failures are non-fatal by contract.
///
/// Accepted textual shape: dotted namespace + type name, `+` for nesting, a
/// backtick arity suffix per generic segment - the reflection-style notation
/// loaders already have at hand (e.g. ``Lib.Outer+Inner`2``).
pub struct TypeRefEncoder<'a> {
    modules: &'a [ModuleMetadata],
    diagnostics: &'a Diagnostics,
}

impl<'a> TypeRefEncoder<'a> {
    /// Creates an encoder over the given module set.
    pub fn new(modules: &'a [ModuleMetadata], diagnostics: &'a Diagnostics) -> Self {
        Self {
            modules,
            diagnostics,
        }
    }

    /// Encodes a textual type name as a [`TypeReference`].
    ///
    /// Resolution order: exact match against a declared type in any loaded module
    /// first, then a purely textual parse (the name is well-formed but the type
    /// lives outside the documented set - still resolvable for identifier
    /// purposes). Only a name that cannot even be parsed becomes a sentinel.
    pub fn named(&self, full_name: &str) -> TypeReference {
        if let Some(reference) = self.resolve_declared(full_name) {
            return reference;
        }

        match parse_type_name(full_name) {
            Some(reference) => reference,
            None => {
                self.diagnostics.warning(
                    DiagnosticCategory::TypeReference,
                    format!("Unresolvable type reference '{full_name}'"),
                );
                TypeReference::Unresolved(full_name.to_string())
            }
        }
    }

    /// Encodes a textual type name, requiring it to resolve to a declared type.
    ///
    /// Same as [`TypeRefEncoder::named`] but a textual-only parse also counts as
    /// unresolved. Used for base types and implemented interfaces where the
    /// caller wants the diagnostic even for well-formed external names.
    pub fn declared(&self, full_name: &str) -> TypeReference {
        match self.resolve_declared(full_name) {
            Some(reference) => reference,
            None => {
                self.diagnostics.warning(
                    DiagnosticCategory::TypeReference,
                    format!("Type reference '{full_name}' does not resolve to a documented type"),
                );
                parse_type_name(full_name)
                    .unwrap_or_else(|| TypeReference::Unresolved(full_name.to_string()))
            }
        }
    }

    fn resolve_declared(&self, full_name: &str) -> Option<TypeReference> {
        for module in self.modules {
            for ty in &module.types {
                if ty.reflection_name() == full_name {
                    return Some(ty.as_reference());
                }
            }
        }
        None
    }
}

/// Parses a reflection-style type name into a named reference.
///
/// Returns `None` when the name is structurally invalid (empty segments, empty
/// name, malformed arity suffix).
pub(crate) fn parse_type_name(full_name: &str) -> Option<TypeReference> {
    if full_name.is_empty() {
        return None;
    }

    // Nested segments are separated by '+'; the part before the first '+'
    // carries the namespace.
    let mut nesting = full_name.split('+');
    let first = nesting.next()?;

    let (namespace, top) = match first.rfind('.') {
        Some(idx) => (&first[..idx], &first[idx + 1..]),
        None => ("", first),
    };
    if namespace.split('.').any(str::is_empty) && !namespace.is_empty() {
        return None;
    }

    let mut segments = vec![parse_segment(top)?];
    for part in nesting {
        segments.push(parse_segment(part)?);
    }

    Some(TypeReference::Named {
        namespace: namespace.to_string(),
        segments,
        args: Vec::new(),
    })
}

fn parse_segment(raw: &str) -> Option<TypeRefSegment> {
    if raw.is_empty() {
        return None;
    }
    match raw.split_once('`') {
        Some((name, arity)) => {
            if name.is_empty() {
                return None;
            }
            let arity = arity.parse::<u32>().ok()?;
            Some(TypeRefSegment::generic(name, arity))
        }
        None => Some(TypeRefSegment::new(raw)),
    }
}
