//! Error kinds for veil operations

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// Categorizes errors so callers can match on the kind and decide how to
/// handle specific cases instead of string-sniffing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An unexpected error occurred - catch-all for unhandled cases
    Unexpected,

    /// The requested feature or operation is not supported
    Unsupported,

    /// Invalid argument passed to an operation
    InvalidArgument,

    // =========================================================================
    // Parse errors
    // =========================================================================
    /// The parser produced no tree for the input
    ParseFailed,

    /// Encoding error (invalid UTF-8, etc.)
    EncodingError,

    /// Tree-sitter grammar could not be loaded
    GrammarError,

    // =========================================================================
    // File/IO errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,

    /// Directory traversal failed
    TraversalFailed,

    // =========================================================================
    // Validation errors
    // =========================================================================
    /// Invariant violation inside the engine
    InvariantViolation,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Check if this error kind is retryable by default
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::IoFailed | ErrorKind::TraversalFailed)
    }
}
