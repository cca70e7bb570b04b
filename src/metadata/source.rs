//! The narrow metadata-loading interface.
//!
//! Loading third-party compiled modules is an untrusted-input operation: naive
//! reflection-based loaders can execute module-level static initialization code.
//! The pipeline therefore only ever talks to a [`MetadataSource`] - module path
//! in, structural metadata out - so the actual loader can be a metadata-only
//! reader, live in a separate process, or run in a sandbox without touching the
//! rest of the pipeline. No implementation in this crate executes target code.
//!
//! [`InMemorySource`] is the first-party implementation: a map from paths to
//! pre-built [`ModuleMetadata`], used by tests and by embedders that already hold
//! structural metadata.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::{metadata::module::ModuleMetadata, Result};

/// Loads structural metadata for one compiled module.
///
/// Implementations must not execute any code contained in the module. A module
/// that cannot be read at all is the one loader failure that is fatal to a build;
/// everything downstream is lenient.
pub trait MetadataSource {
    /// Loads the module at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ModuleNotFound`] when the path does not map to a
    /// loadable module, or an implementation-specific error for unreadable or
    /// corrupt module data.
    fn load_module(&self, path: &Path) -> Result<ModuleMetadata>;
}

/// A [`MetadataSource`] over pre-built metadata records.
///
/// # Example
///
/// ```rust
/// use cildoc::metadata::source::{InMemorySource, MetadataSource};
/// use cildoc::metadata::module::ModuleMetadata;
/// use std::path::Path;
///
/// let source = InMemorySource::new()
///     .with_module("Lib.dll", ModuleMetadata::build("Lib").finish());
///
/// let module = source.load_module(Path::new("Lib.dll"))?;
/// assert_eq!(module.name, "Lib");
/// # Ok::<(), cildoc::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct InMemorySource {
    modules: HashMap<PathBuf, ModuleMetadata>,
}

impl InMemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    /// Registers a module under the given path.
    #[must_use]
    pub fn with_module(mut self, path: impl Into<PathBuf>, module: ModuleMetadata) -> Self {
        self.modules.insert(path.into(), module);
        self
    }
}

impl MetadataSource for InMemorySource {
    fn load_module(&self, path: &Path) -> Result<ModuleMetadata> {
        self.modules
            .get(path)
            .cloned()
            .ok_or_else(|| crate::Error::ModuleNotFound(path.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_source() {
        let source = InMemorySource::new()
            .with_module("Lib.dll", ModuleMetadata::build("Lib").finish());

        assert!(source.load_module(Path::new("Lib.dll")).is_ok());

        let err = source.load_module(Path::new("Other.dll")).unwrap_err();
        assert!(matches!(err, crate::Error::ModuleNotFound(_)));
    }
}
