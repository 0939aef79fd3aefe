//! Error types for clipboard writes and copy requests.

use thiserror::Error;

/// Errors from writing to the clipboard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    /// OSC 52 write to the terminal failed
    #[error("OSC 52 clipboard failed: {0}")]
    Osc52(String),

    /// System clipboard operation failed
    #[error("system clipboard failed: {0}")]
    System(String),
}

/// Errors from a copy request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CopyError {
    /// The key does not name a configured field
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// The clipboard rejected the write; no feedback was shown
    #[error("copy failed: {0}")]
    Clipboard(#[from] ClipboardError),
}

/// Result type for copy operations.
pub type Result<T> = std::result::Result<T, CopyError>;
