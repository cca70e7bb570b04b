//! Per-module metadata records.

use crate::metadata::types::TypeMetadata;

/// Structural metadata for one compiled module.
///
/// One instance per input module, immutable once loaded. Type order follows the
/// module's stable metadata enumeration order; overload ordinals and tree
/// placement depend on it, so loaders must not sort.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleMetadata {
    /// Module name, used for tree attribution and duplicate-type disambiguation
    pub name: String,
    /// Module version string, pass-through for renderers
    pub version: String,
    /// Declared types in metadata enumeration order
    pub types: Vec<TypeMetadata>,
    /// Names of modules this module references
    pub references: Vec<String>,
}

impl ModuleMetadata {
    /// Starts building a module record.
    pub fn build(name: impl Into<String>) -> ModuleBuilder {
        ModuleBuilder {
            inner: ModuleMetadata {
                name: name.into(),
                version: String::new(),
                types: Vec::new(),
                references: Vec::new(),
            },
        }
    }

    /// Looks up a declared type by reflection-style full name.
    pub fn find_type(&self, reflection_name: &str) -> Option<&TypeMetadata> {
        self.types
            .iter()
            .find(|t| t.reflection_name() == reflection_name)
    }
}

/// Fluent builder for [`ModuleMetadata`].
pub struct ModuleBuilder {
    inner: ModuleMetadata,
}

impl ModuleBuilder {
    /// Sets the module version string.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.inner.version = version.into();
        self
    }

    /// Adds a referenced module name.
    #[must_use]
    pub fn reference(mut self, name: impl Into<String>) -> Self {
        self.inner.references.push(name.into());
        self
    }

    /// Adds a declared type, preserving metadata enumeration order.
    #[must_use]
    pub fn ty(mut self, ty: TypeMetadata) -> Self {
        self.inner.types.push(ty);
        self
    }

    /// Finishes the record.
    pub fn finish(self) -> ModuleMetadata {
        self.inner
    }
}
