use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Only three things are allowed to fail a documentation build: loading a module through a
/// [`crate::metadata::source::MetadataSource`], documentation XML that cannot be parsed at all,
/// and a [`crate::doctree::validation`] violation. Everything else (unresolvable type
/// references, missing documentation, empty namespaces) is reported through
/// [`crate::metadata::diagnostics::Diagnostics`] and never aborts the build.
///
/// # Examples
///
/// ```rust
/// use cildoc::{Error, doctree::doccomments::DocSource};
///
/// match DocSource::from_str("Lib", "<doc><members><member></doc>") {
///     Ok(_) => println!("parsed"),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed doc XML: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The input is damaged and could not be parsed.
    ///
    /// This error indicates that a documentation-comment XML file or a serialized
    /// documentation tree is corrupted or does not conform to the expected schema.
    /// The error includes the source location where the malformation was detected
    /// for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Provided input was empty.
    ///
    /// This error occurs when an empty file or buffer is provided where
    /// module metadata or documentation XML was expected.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur while reading module metadata
    /// or documentation-comment XML files from disk.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// A module requested from a metadata source is not available.
    ///
    /// The associated value names the module (or path) that could not be loaded.
    /// Unlike unresolvable type references, a missing input module is fatal.
    #[error("Failed to load module - {0}")]
    ModuleNotFound(String),

    /// Two sibling declarations from the same module produced the same identifier.
    ///
    /// This is a tree-validation failure and indicates a defect in the identifier
    /// builder, not in the input. Identifiers may legitimately collide across
    /// *different* modules; within one module they must be unique.
    #[error("Duplicate identifier '{identifier}' in module '{module}'")]
    DuplicateIdentifier {
        /// The identifier string that collided
        identifier: String,
        /// The module in which both declarations live
        module: String,
    },

    /// An inherited member carries no resolvable declaring-type identifier.
    ///
    /// Every member marked as inherited must be able to name the type it was
    /// inherited from, even when that type itself is excluded by the visibility
    /// filter. The associated value is the member identifier at fault.
    #[error("Inherited member '{0}' has no resolvable declaring type")]
    MissingDeclaringType(String),

    /// An overload group attached to the tree has no members left after filtering.
    ///
    /// Groups whose members were all filtered out must not be attached to the
    /// tree at all; finding one is a tree-builder defect. The associated value
    /// is the `Type.Name` key of the empty group.
    #[error("Overload group '{0}' has no members after filtering")]
    EmptyOverloadGroup(String),

    /// Generic error for miscellaneous failures.
    ///
    /// Used for errors that don't fit into other categories or for
    /// wrapping external library errors with additional context.
    #[error("{0}")]
    Error(String),
}
