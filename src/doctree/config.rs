//! Build configuration.
//!
//! One flat record of named options controls visibility filtering, missing-doc
//! reporting and pass-through presentation strings. The record is supplied per
//! build and never mutated by the pipeline.

/// Browsability filter level for the visibility filter.
///
/// Applied against the [`crate::metadata::types::Browsability`] classification
/// on each declaration, independently of declared accessibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowsableFilterLevel {
    /// Document everything, including declarations hidden from browsers
    #[default]
    Everything,
    /// Hide `Never`-browsable declarations, keep advanced ones
    AdvancedOnly,
    /// Hide both `Never`-browsable and advanced declarations
    NothingHidden,
}

/// The build configuration record.
///
/// Boolean options follow the convention "does this build document X". The
/// free-text fields pass through to renderers unmodified.
#[derive(Debug, Clone)]
pub struct DocConfig {
    /// Document `internal` (assembly-visible) declarations
    pub document_internals: bool,
    /// Document `protected` declarations
    pub document_protected: bool,
    /// Document `private` declarations
    pub document_privates: bool,
    /// Treat `protected internal` as plain `protected` when deciding visibility
    pub document_protected_internal_as_protected: bool,
    /// Document members inherited from other documented types
    pub document_inherited_members: bool,
    /// Document members inherited from types outside the documented module set
    pub document_inherited_framework_members: bool,
    /// Document explicit interface implementations (marker-based, independent of
    /// their metadata-level private accessibility)
    pub document_explicit_interface_implementations: bool,
    /// Keep namespaces that end up with no documented types
    pub document_empty_namespaces: bool,
    /// Omit entire namespaces that have no summary (not an error)
    pub skip_namespaces_without_summaries: bool,
    /// Browsability filter level
    pub editor_browsable_filter: BrowsableFilterLevel,

    /// Report declarations without a summary
    pub show_missing_summaries: bool,
    /// Report declarations without remarks
    pub show_missing_remarks: bool,
    /// Report parameters without documentation
    pub show_missing_params: bool,
    /// Report value-returning members without `<returns>` documentation
    pub show_missing_returns: bool,
    /// Report properties without `<value>` documentation
    pub show_missing_values: bool,

    /// Copyright line, pass-through for renderers
    pub copyright_text: String,
    /// Feedback address, pass-through for renderers
    pub feedback_email_address: String,
}

impl Default for DocConfig {
    fn default() -> Self {
        Self {
            document_internals: false,
            document_protected: true,
            document_privates: false,
            document_protected_internal_as_protected: false,
            document_inherited_members: true,
            document_inherited_framework_members: false,
            document_explicit_interface_implementations: false,
            document_empty_namespaces: false,
            skip_namespaces_without_summaries: false,
            editor_browsable_filter: BrowsableFilterLevel::default(),
            show_missing_summaries: false,
            show_missing_remarks: false,
            show_missing_params: false,
            show_missing_returns: false,
            show_missing_values: false,
            copyright_text: String::new(),
            feedback_email_address: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DocConfig::default();
        assert!(config.document_protected);
        assert!(config.document_inherited_members);
        assert!(!config.document_privates);
        assert_eq!(
            config.editor_browsable_filter,
            BrowsableFilterLevel::Everything
        );
    }
}
