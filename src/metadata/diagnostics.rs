//! Diagnostics collection for documentation builds.
//!
//! This module provides types for collecting and reporting diagnostic messages
//! during a build. The pipeline is lenient by design: individual declarations with
//! unresolvable type references, declarations without documentation, or namespaces
//! without summaries are reported here but never abort the build.
//!
//! # Architecture
//!
//! One [`Diagnostics`] container is created per build invocation and shared across
//! the pipeline stages:
//! - **Type-reference encoder**: reports unresolvable type references
//! - **Doc-comment merger**: reports missing summaries, remarks, params and returns
//! - **Tree builder**: reports dropped namespaces and duplicate namespace summaries
//!
//! The container uses `boxcar::Vec` for lock-free append operations, so stages can
//! push entries through a shared reference without synchronization ceremony.
//!
//! # Usage Examples
//!
//! ```rust
//! use cildoc::metadata::diagnostics::{Diagnostics, DiagnosticCategory};
//! use std::sync::Arc;
//!
//! let diagnostics = Arc::new(Diagnostics::new());
//!
//! diagnostics.warning(
//!     DiagnosticCategory::TypeReference,
//!     "Unresolvable type reference 'Vendor.Widget' in Lib.Factory.Create",
//! );
//!
//! if diagnostics.has_warnings() {
//!     println!("{}", diagnostics.summary());
//! }
//! ```

use std::fmt::{self, Write};

/// Severity level of a diagnostic entry.
///
/// Determines how the diagnostic should be treated and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Informational message, not indicating a problem.
    ///
    /// Used for noting unusual but valid constructs, such as duplicate type
    /// names that are intentionally preserved across modules.
    Info,

    /// Warning about degraded output.
    ///
    /// The build continues, but some data is missing or a placeholder value
    /// was substituted (e.g. an unresolvable type reference).
    Warning,

    /// Error-level observation that did not abort the build.
    ///
    /// Reserved for conditions that renderers should surface prominently,
    /// such as a documentation source that matched no declaration at all.
    Error,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Info => write!(f, "INFO"),
            DiagnosticSeverity::Warning => write!(f, "WARN"),
            DiagnosticSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// Category indicating the source or type of diagnostic.
///
/// Helps classify diagnostics for filtering and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    /// Issues with module metadata.
    ///
    /// Examples: referenced modules that are not part of the documented set.
    Module,

    /// Issues with type-reference encoding.
    ///
    /// Examples: unresolvable type references encoded as placeholder sentinels.
    TypeReference,

    /// Issues with identifier construction.
    ///
    /// Examples: member names requiring character sanitization.
    Identifier,

    /// Issues with documentation comments.
    ///
    /// Examples: missing summaries, parameters documented under a wrong name.
    DocComment,

    /// Issues with namespace handling.
    ///
    /// Examples: namespaces dropped for lacking a summary, discarded duplicate
    /// namespace summaries.
    Namespace,

    /// Issues found during tree validation in lenient contexts.
    Validation,

    /// General build issues not fitting other categories.
    General,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Module => write!(f, "Module"),
            DiagnosticCategory::TypeReference => write!(f, "TypeReference"),
            DiagnosticCategory::Identifier => write!(f, "Identifier"),
            DiagnosticCategory::DocComment => write!(f, "DocComment"),
            DiagnosticCategory::Namespace => write!(f, "Namespace"),
            DiagnosticCategory::Validation => write!(f, "Validation"),
            DiagnosticCategory::General => write!(f, "General"),
        }
    }
}

/// A single diagnostic entry with context information.
///
/// Contains the severity, category, message, and optional identifier context
/// for a diagnostic reported during a documentation build.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level of this diagnostic.
    pub severity: DiagnosticSeverity,

    /// Category indicating the source of this diagnostic.
    pub category: DiagnosticCategory,

    /// Human-readable description of the issue.
    pub message: String,

    /// Optional identifier of the declaration the issue relates to.
    pub identifier: Option<String>,

    /// Optional name of the module the issue originated from.
    pub module: Option<String>,
}

impl Diagnostic {
    /// Creates a new diagnostic entry.
    ///
    /// # Arguments
    ///
    /// * `severity` - Severity level of the diagnostic
    /// * `category` - Category of the diagnostic source
    /// * `message` - Human-readable description
    pub fn new(
        severity: DiagnosticSeverity,
        category: DiagnosticCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            identifier: None,
            module: None,
        }
    }

    /// Adds the related declaration identifier to the diagnostic.
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Adds the originating module name to the diagnostic.
    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.category, self.message)?;

        if let Some(identifier) = &self.identifier {
            write!(f, " (id: {identifier})")?;
        }

        if let Some(module) = &self.module {
            write!(f, " (module: {module})")?;
        }

        Ok(())
    }
}

/// Container for collecting diagnostic entries during one build.
///
/// Uses `boxcar::Vec` internally so entries can be appended through a shared
/// reference. The container is created per build and discarded with it; there is
/// no cross-build state.
///
/// # Example
///
/// ```rust
/// use cildoc::metadata::diagnostics::{Diagnostics, DiagnosticCategory};
///
/// let diagnostics = Diagnostics::new();
/// diagnostics.info(DiagnosticCategory::Namespace, "Namespace 'Lib.Internal' dropped");
/// assert_eq!(diagnostics.count(), 1);
/// ```
#[derive(Debug)]
pub struct Diagnostics {
    entries: boxcar::Vec<Diagnostic>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    /// Creates a new empty diagnostics container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: boxcar::Vec::new(),
        }
    }

    /// Adds an informational diagnostic.
    pub fn info(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(DiagnosticSeverity::Info, category, message));
    }

    /// Adds a warning diagnostic.
    pub fn warning(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(
            DiagnosticSeverity::Warning,
            category,
            message,
        ));
    }

    /// Adds an error diagnostic.
    pub fn error(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(
            DiagnosticSeverity::Error,
            category,
            message,
        ));
    }

    /// Adds a diagnostic entry directly.
    ///
    /// Use this for diagnostics that need identifier or module context.
    pub fn push(&self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Returns true if any diagnostics have been collected.
    pub fn has_any(&self) -> bool {
        self.entries.count() > 0
    }

    /// Returns true if any error-level diagnostics have been collected.
    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, d)| d.severity == DiagnosticSeverity::Error)
    }

    /// Returns true if any warning-level diagnostics have been collected.
    pub fn has_warnings(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, d)| d.severity == DiagnosticSeverity::Warning)
    }

    /// Returns the total number of diagnostics.
    pub fn count(&self) -> usize {
        self.entries.count()
    }

    /// Returns the number of warning-level diagnostics.
    pub fn warning_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, d)| d.severity == DiagnosticSeverity::Warning)
            .count()
    }

    /// Returns an iterator over all diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().map(|(_, d)| d)
    }

    /// Returns diagnostics filtered by category.
    pub fn by_category(&self, category: DiagnosticCategory) -> Vec<&Diagnostic> {
        self.entries
            .iter()
            .filter(|(_, d)| d.category == category)
            .map(|(_, d)| d)
            .collect()
    }

    /// Formats a summary of all diagnostics for display.
    pub fn summary(&self) -> String {
        let mut output = String::new();

        let error_count = self
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Error)
            .count();
        let warning_count = self.warning_count();
        let info_count = self.count() - error_count - warning_count;

        let _ = writeln!(
            output,
            "Diagnostics: {} error(s), {} warning(s), {} info(s)",
            error_count, warning_count, info_count
        );

        for diag in self.iter() {
            let _ = writeln!(output, "  {diag}");
        }

        output
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_creation() {
        let diag = Diagnostic::new(
            DiagnosticSeverity::Warning,
            DiagnosticCategory::TypeReference,
            "Test message",
        );

        assert_eq!(diag.severity, DiagnosticSeverity::Warning);
        assert_eq!(diag.category, DiagnosticCategory::TypeReference);
        assert_eq!(diag.message, "Test message");
        assert!(diag.identifier.is_none());
        assert!(diag.module.is_none());
    }

    #[test]
    fn test_diagnostic_with_context() {
        let diag = Diagnostic::new(
            DiagnosticSeverity::Error,
            DiagnosticCategory::DocComment,
            "No declaration matched",
        )
        .with_identifier("M:Lib.Widget.Run")
        .with_module("Lib");

        assert_eq!(diag.identifier.as_deref(), Some("M:Lib.Widget.Run"));
        assert_eq!(diag.module.as_deref(), Some("Lib"));
    }

    #[test]
    fn test_diagnostics_container() {
        let diagnostics = Diagnostics::new();

        diagnostics.info(DiagnosticCategory::General, "Info message");
        diagnostics.warning(DiagnosticCategory::Namespace, "Warning message");
        diagnostics.error(DiagnosticCategory::Validation, "Error message");

        assert_eq!(diagnostics.count(), 3);
        assert_eq!(diagnostics.warning_count(), 1);
        assert!(diagnostics.has_errors());
        assert!(diagnostics.has_warnings());
        assert!(diagnostics.has_any());
    }

    #[test]
    fn test_diagnostics_by_category() {
        let diagnostics = Diagnostics::new();

        diagnostics.warning(DiagnosticCategory::TypeReference, "unresolved 1");
        diagnostics.warning(DiagnosticCategory::TypeReference, "unresolved 2");
        diagnostics.info(DiagnosticCategory::Namespace, "dropped");

        assert_eq!(
            diagnostics
                .by_category(DiagnosticCategory::TypeReference)
                .len(),
            2
        );
        assert_eq!(diagnostics.by_category(DiagnosticCategory::Namespace).len(), 1);
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::new(
            DiagnosticSeverity::Warning,
            DiagnosticCategory::TypeReference,
            "Unresolvable type",
        )
        .with_identifier("T:Vendor.Widget");

        let display = format!("{}", diag);
        assert!(display.contains("WARN"));
        assert!(display.contains("TypeReference"));
        assert!(display.contains("Unresolvable type"));
        assert!(display.contains("T:Vendor.Widget"));
    }
}
