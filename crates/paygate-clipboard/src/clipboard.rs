//! Clipboard contract.

use crate::error::ClipboardError;
use async_trait::async_trait;

/// Destination for copied text.
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents with `text`.
    ///
    /// # Errors
    /// Returns error if no transport accepted the write.
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}
