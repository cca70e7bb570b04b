//! Type and member metadata records.
//!
//! These are the structural facts a [`crate::metadata::source::MetadataSource`]
//! delivers per module: declared types (kind, namespace, nesting, generic
//! parameters, base type, interfaces, attributes, visibility) and per type the
//! declared members (kind, name, parameters, return type, generic method
//! parameters, contract flags, origin). All records are immutable once a module
//! is loaded.
//!
//! Declaration kinds are **closed enums** ([`TypeKind`], [`MemberKind`]) so the
//! identifier builder and the visibility filter match exhaustively; adding a new
//! kind is a compile-time-checked change everywhere it matters.

use bitflags::bitflags;
use strum::{Display, EnumCount, EnumIter, EnumString};

use crate::metadata::typeref::{TypeRefSegment, TypeReference};

/// Kind of a documentable type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount, EnumString)]
pub enum TypeKind {
    /// A reference type
    Class,
    /// An interface contract
    Interface,
    /// A value type
    Struct,
    /// An enumeration
    Enum,
    /// A delegate type
    Delegate,
}

/// Kind of a documentable member declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount, EnumString)]
pub enum MemberKind {
    /// A field
    Field,
    /// A property, including indexers (properties with parameters)
    Property,
    /// An ordinary method
    Method,
    /// An instance or static constructor
    Constructor,
    /// An operator method with a reserved name (e.g. `op_Addition`)
    Operator,
    /// An event
    Event,
}

/// Declared accessibility of a type or member.
///
/// Uses the metadata-level terms: `Family` is "protected", `Assembly` is
/// "internal", `FamilyOrAssembly` is "protected internal".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Visibility {
    /// Visible to everyone
    Public,
    /// Visible to derived types (protected)
    Family,
    /// Visible within the declaring module (internal)
    Assembly,
    /// Visible to derived types or within the module (protected internal)
    FamilyOrAssembly,
    /// Visible to derived types within the module (private protected)
    FamilyAndAssembly,
    /// Visible to the declaring type only
    Private,
}

/// Editor-browsability classification, derived from attributes by the loader.
///
/// Drives the browsability filter level of the visibility filter; independent of
/// declared accessibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Browsability {
    /// Normally browsable
    Always,
    /// Only shown when advanced members are requested
    Advanced,
    /// Hidden from browsers
    Never,
}

bitflags! {
    /// Contract flags on a member declaration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MemberFlags: u8 {
        /// Static contract (no instance receiver)
        const STATIC = 1;
        /// Explicit interface implementation marker, independent of visibility
        const EXPLICIT_IMPL = 1 << 1;
    }
}

/// Where a member comes from, relative to the type it is listed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemberOrigin {
    /// Declared directly on the listing type
    Declared,
    /// Inherited from another type within the documented module set.
    ///
    /// `from` is the reflection-style full name of the declaring type.
    Inherited {
        /// Full name of the type the member was inherited from
        from: String,
    },
    /// Inherited from a type outside the documented module set (framework).
    FrameworkInherited {
        /// Full name of the framework type the member was inherited from
        from: String,
    },
}

impl MemberOrigin {
    /// Returns true for both inherited variants.
    pub fn is_inherited(&self) -> bool {
        !matches!(self, MemberOrigin::Declared)
    }

    /// The full name of the declaring type, for inherited members.
    pub fn inherited_from(&self) -> Option<&str> {
        match self {
            MemberOrigin::Declared => None,
            MemberOrigin::Inherited { from } | MemberOrigin::FrameworkInherited { from } => {
                Some(from)
            }
        }
    }
}

/// A generic parameter declaration (on a type or a method).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericParam {
    /// Declared name of the parameter (e.g. `T`)
    pub name: String,
    /// Constraint descriptions, pass-through for renderers
    pub constraints: Vec<String>,
}

impl GenericParam {
    /// Creates an unconstrained generic parameter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraints: Vec::new(),
        }
    }
}

/// A formal parameter of a method, constructor, operator or indexer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    /// Declared parameter name
    pub name: String,
    /// Type at the usage site
    pub ty: TypeReference,
    /// Passed by reference (`ref`/`out`/`in`); renders a trailing `@`
    pub by_ref: bool,
}

/// Metadata for one declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeMetadata {
    /// Kind of the declaration
    pub kind: TypeKind,
    /// Dotted namespace, empty for the global namespace
    pub namespace: String,
    /// Simple name, without arity suffix
    pub name: String,
    /// Enclosing-type chain for nested types, outermost first
    pub nesting: Vec<TypeRefSegment>,
    /// Generic parameters declared by this type
    pub generic_params: Vec<GenericParam>,
    /// Base type, if any
    pub base: Option<TypeReference>,
    /// Implemented interfaces
    pub interfaces: Vec<TypeReference>,
    /// Attribute type names, pass-through for renderers
    pub attributes: Vec<String>,
    /// Declared accessibility
    pub visibility: Visibility,
    /// Browsability classification
    pub browsability: Browsability,
    /// Members in stable metadata enumeration order
    pub members: Vec<MemberMetadata>,
}

impl TypeMetadata {
    /// Starts building a type record.
    pub fn build(kind: TypeKind, namespace: impl Into<String>, name: impl Into<String>) -> TypeBuilder {
        TypeBuilder {
            inner: TypeMetadata {
                kind,
                namespace: namespace.into(),
                name: name.into(),
                nesting: Vec::new(),
                generic_params: Vec::new(),
                base: None,
                interfaces: Vec::new(),
                attributes: Vec::new(),
                visibility: Visibility::Public,
                browsability: Browsability::Always,
                members: Vec::new(),
            },
        }
    }

    /// Number of generic parameters declared by this type.
    pub fn arity(&self) -> u32 {
        u32::try_from(self.generic_params.len()).unwrap_or(u32::MAX)
    }

    /// The full nesting chain including this type's own segment, outermost first.
    pub fn segments(&self) -> Vec<TypeRefSegment> {
        let mut segments = self.nesting.clone();
        segments.push(TypeRefSegment::generic(self.name.clone(), self.arity()));
        segments
    }

    /// Reflection-style full name: namespace, `+`-separated nesting, arity suffixes.
    ///
    /// This is the textual shape [`crate::metadata::typeref::TypeRefEncoder`]
    /// resolves against.
    pub fn reflection_name(&self) -> String {
        let mut out = String::new();
        if !self.namespace.is_empty() {
            out.push_str(&self.namespace);
            out.push('.');
        }
        for (index, seg) in self.segments().iter().enumerate() {
            if index > 0 {
                out.push('+');
            }
            out.push_str(&seg.name);
            if seg.arity > 0 {
                out.push('`');
                out.push_str(&seg.arity.to_string());
            }
        }
        out
    }

    /// This type as a [`TypeReference`] (open, no arguments).
    pub fn as_reference(&self) -> TypeReference {
        TypeReference::Named {
            namespace: self.namespace.clone(),
            segments: self.segments(),
            args: Vec::new(),
        }
    }

    /// Display name: simple name plus arity suffix for generic types (`Box`2`).
    pub fn display_name(&self) -> String {
        if self.arity() > 0 {
            format!("{}`{}", self.name, self.arity())
        } else {
            self.name.clone()
        }
    }
}

/// Fluent builder for [`TypeMetadata`].
///
/// The first-party way to assemble metadata in-memory; PE-backed loaders fill the
/// same records from image data.
pub struct TypeBuilder {
    inner: TypeMetadata,
}

impl TypeBuilder {
    /// Sets the enclosing-type chain for a nested type, outermost first.
    #[must_use]
    pub fn nested_in(mut self, nesting: Vec<TypeRefSegment>) -> Self {
        self.inner.nesting = nesting;
        self
    }

    /// Declares a generic parameter.
    #[must_use]
    pub fn generic_param(mut self, name: impl Into<String>) -> Self {
        self.inner.generic_params.push(GenericParam::new(name));
        self
    }

    /// Declares a generic parameter with constraints.
    #[must_use]
    pub fn constrained_param(mut self, name: impl Into<String>, constraints: Vec<String>) -> Self {
        self.inner.generic_params.push(GenericParam {
            name: name.into(),
            constraints,
        });
        self
    }

    /// Sets the base type.
    #[must_use]
    pub fn base(mut self, base: TypeReference) -> Self {
        self.inner.base = Some(base);
        self
    }

    /// Adds an implemented interface.
    #[must_use]
    pub fn interface(mut self, interface: TypeReference) -> Self {
        self.inner.interfaces.push(interface);
        self
    }

    /// Adds an attribute type name.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.inner.attributes.push(name.into());
        self
    }

    /// Sets the declared accessibility (default: public).
    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.inner.visibility = visibility;
        self
    }

    /// Sets the browsability classification (default: always).
    #[must_use]
    pub fn browsability(mut self, browsability: Browsability) -> Self {
        self.inner.browsability = browsability;
        self
    }

    /// Adds a member, preserving metadata enumeration order.
    #[must_use]
    pub fn member(mut self, member: MemberMetadata) -> Self {
        self.inner.members.push(member);
        self
    }

    /// Finishes the record.
    pub fn finish(self) -> TypeMetadata {
        self.inner
    }
}

/// Metadata for one declared member.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberMetadata {
    /// Kind of the declaration
    pub kind: MemberKind,
    /// Declared name; constructors use `.ctor`/`.cctor` style names or any
    /// loader-supplied name (the identifier builder substitutes `#ctor`/`#cctor`)
    pub name: String,
    /// Formal parameters in declaration order
    pub params: Vec<Parameter>,
    /// Return type; absent for fields, events and constructors
    pub returns: Option<TypeReference>,
    /// Generic parameters declared by the method itself
    pub generic_params: Vec<GenericParam>,
    /// Contract flags
    pub flags: MemberFlags,
    /// Declared accessibility
    pub visibility: Visibility,
    /// Browsability classification
    pub browsability: Browsability,
    /// Declared-here vs inherited-from marker
    pub origin: MemberOrigin,
}

impl MemberMetadata {
    /// Starts building a member record.
    pub fn build(kind: MemberKind, name: impl Into<String>) -> MemberBuilder {
        MemberBuilder {
            inner: MemberMetadata {
                kind,
                name: name.into(),
                params: Vec::new(),
                returns: None,
                generic_params: Vec::new(),
                flags: MemberFlags::empty(),
                visibility: Visibility::Public,
                browsability: Browsability::Always,
                origin: MemberOrigin::Declared,
            },
        }
    }

    /// Whether this member has the static contract.
    pub fn is_static(&self) -> bool {
        self.flags.contains(MemberFlags::STATIC)
    }

    /// Whether this member is an explicit interface implementation.
    pub fn is_explicit_impl(&self) -> bool {
        self.flags.contains(MemberFlags::EXPLICIT_IMPL)
    }

    /// Number of generic parameters declared by the method itself.
    pub fn arity(&self) -> u32 {
        u32::try_from(self.generic_params.len()).unwrap_or(u32::MAX)
    }
}

/// Fluent builder for [`MemberMetadata`].
pub struct MemberBuilder {
    inner: MemberMetadata,
}

impl MemberBuilder {
    /// Adds a by-value parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, ty: TypeReference) -> Self {
        self.inner.params.push(Parameter {
            name: name.into(),
            ty,
            by_ref: false,
        });
        self
    }

    /// Adds a byref (`ref`/`out`/`in`) parameter.
    #[must_use]
    pub fn byref_param(mut self, name: impl Into<String>, ty: TypeReference) -> Self {
        self.inner.params.push(Parameter {
            name: name.into(),
            ty,
            by_ref: true,
        });
        self
    }

    /// Sets the return type.
    #[must_use]
    pub fn returns(mut self, ty: TypeReference) -> Self {
        self.inner.returns = Some(ty);
        self
    }

    /// Declares a generic parameter on the method itself.
    #[must_use]
    pub fn generic_param(mut self, name: impl Into<String>) -> Self {
        self.inner.generic_params.push(GenericParam::new(name));
        self
    }

    /// Marks the static contract.
    #[must_use]
    pub fn static_contract(mut self) -> Self {
        self.inner.flags |= MemberFlags::STATIC;
        self
    }

    /// Marks an explicit interface implementation.
    #[must_use]
    pub fn explicit_impl(mut self) -> Self {
        self.inner.flags |= MemberFlags::EXPLICIT_IMPL;
        self
    }

    /// Sets the declared accessibility (default: public).
    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.inner.visibility = visibility;
        self
    }

    /// Sets the browsability classification (default: always).
    #[must_use]
    pub fn browsability(mut self, browsability: Browsability) -> Self {
        self.inner.browsability = browsability;
        self
    }

    /// Marks the member as inherited from a documented type.
    #[must_use]
    pub fn inherited_from(mut self, from: impl Into<String>) -> Self {
        self.inner.origin = MemberOrigin::Inherited { from: from.into() };
        self
    }

    /// Marks the member as inherited from a framework type outside the documented set.
    #[must_use]
    pub fn framework_inherited_from(mut self, from: impl Into<String>) -> Self {
        self.inner.origin = MemberOrigin::FrameworkInherited { from: from.into() };
        self
    }

    /// Finishes the record.
    pub fn finish(self) -> MemberMetadata {
        self.inner
    }
}
