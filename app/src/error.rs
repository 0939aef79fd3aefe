//! Error types for application commands.

use paygate_auth::ErrorKind;
use paygate_clipboard::CopyError;
use paygate_core::ConfigError;
use serde::Serialize;

/// Serializable error returned by commands.
///
/// Never carries field values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandError {
    /// Error code for front-end handling (e.g., "POPUP_BLOCKED")
    pub code: String,
    /// User-friendly error message
    pub message: String,
    /// Optional debugging context
    pub details: Option<serde_json::Value>,
}

impl CommandError {
    /// Create a new command error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Create a command error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
        }
    }

    /// The gated content is not visible to the current identity.
    pub fn access_denied() -> Self {
        Self::new(
            "ACCESS_DENIED",
            "Sign in with an authorized account to copy this information",
        )
    }
}

impl From<ErrorKind> for CommandError {
    fn from(kind: ErrorKind) -> Self {
        match &kind {
            ErrorKind::Unknown(provider_message) => Self::with_details(
                kind.code(),
                kind.user_message(),
                serde_json::json!({ "provider_message": provider_message }),
            ),
            _ => Self::new(kind.code(), kind.user_message()),
        }
    }
}

impl From<CopyError> for CommandError {
    fn from(err: CopyError) -> Self {
        match err {
            CopyError::UnknownField(key) => Self::with_details(
                "UNKNOWN_FIELD",
                format!("There is no field named '{key}'"),
                serde_json::json!({ "key": key }),
            ),
            CopyError::Clipboard(err) => Self::with_details(
                "CLIPBOARD_UNAVAILABLE",
                "Could not copy to the clipboard",
                serde_json::json!({ "reason": err.to_string() }),
            ),
        }
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        Self::new("CONFIG_ERROR", format!("Configuration error: {err}"))
    }
}
