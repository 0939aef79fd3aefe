//! System clipboard with a terminal fallback.
//!
//! Transports, in order:
//! 1. OSC 52 escape sequence, when stdout is a terminal (works over SSH)
//! 2. System clipboard via the `arboard` crate

use crate::clipboard::Clipboard;
use crate::error::ClipboardError;
use async_trait::async_trait;
use base64::Engine;
use std::io::{IsTerminal, Write};
use tracing::debug;

/// Clipboard backed by the terminal and the OS clipboard.
#[derive(Debug, Clone, Copy)]
pub struct SystemClipboard {
    osc52: bool,
}

impl SystemClipboard {
    /// Use OSC 52 when stdout is a terminal, the OS clipboard otherwise.
    #[must_use]
    pub fn new() -> Self {
        Self {
            osc52: std::io::stdout().is_terminal(),
        }
    }

    /// Only use the OS clipboard.
    #[must_use]
    pub fn system_only() -> Self {
        Self { osc52: false }
    }

    fn copy_osc52(text: &str) -> Result<(), ClipboardError> {
        let mut stdout = std::io::stdout();
        stdout
            .write_all(osc52_sequence(text).as_bytes())
            .map_err(|e| ClipboardError::Osc52(e.to_string()))?;
        stdout
            .flush()
            .map_err(|e| ClipboardError::Osc52(e.to_string()))?;
        Ok(())
    }

    fn copy_system(text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError::System(e.to_string()))?;

        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::System(e.to_string()))?;

        Ok(())
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.osc52 {
            match Self::copy_osc52(text) {
                Ok(()) => return Ok(()),
                Err(error) => debug!(%error, "OSC 52 copy failed, trying system clipboard"),
            }
        }

        Self::copy_system(text)
    }
}

/// OSC 52 format: `ESC ] 52 ; c ; <base64-data> ESC \`
///
/// `c` selects the system clipboard.
fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text);
    format!("\x1b]52;c;{encoded}\x1b\\")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osc52_sequence() {
        assert_eq!(osc52_sequence("PHAM TUNG"), "\x1b]52;c;UEhBTSBUVU5H\x1b\\");
    }

    #[test]
    fn test_osc52_sequence_multiline() {
        let sequence = osc52_sequence("a: 1\nb: 2");
        assert!(sequence.starts_with("\x1b]52;c;"));
        assert!(sequence.ends_with("\x1b\\"));
        assert!(!sequence[1..].contains('\n'));
    }

    #[test]
    fn test_system_only_disables_osc52() {
        assert!(!SystemClipboard::system_only().osc52);
    }
}
