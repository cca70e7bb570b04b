//! Common imports for working with documentation trees.
//!
//! ```rust
//! use cildoc::prelude::*;
//!
//! let ty = TypeMetadata::build(TypeKind::Struct, "Lib", "Point").finish();
//! assert_eq!(identify_type(&ty).as_str(), "T:Lib.Point");
//! ```

pub use crate::doctree::builder::{
    DocBuilder, DocTree, MemberNode, NamespaceNode, OverloadGroupNode, TypeNode,
};
pub use crate::doctree::config::{BrowsableFilterLevel, DocConfig};
pub use crate::doctree::doccomments::{DocComment, DocMerger, DocSource, NamespaceSummaries};
pub use crate::doctree::overloads::{resolve_overloads, OverloadGroup, OverloadTable};
pub use crate::ident::{
    filename_for, identify_member, identify_member_at_path, identify_namespace, identify_type,
    identify_type_name, Identifier,
};
pub use crate::metadata::diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics,
};
pub use crate::metadata::module::{ModuleBuilder, ModuleMetadata};
pub use crate::metadata::source::{InMemorySource, MetadataSource};
pub use crate::metadata::typeref::{TypeRefEncoder, TypeRefSegment, TypeReference};
pub use crate::metadata::types::{
    Browsability, GenericParam, MemberBuilder, MemberFlags, MemberKind, MemberMetadata,
    MemberOrigin, Parameter, TypeBuilder, TypeKind, TypeMetadata, Visibility,
};
pub use crate::{Error, Result};
