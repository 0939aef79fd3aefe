//! Sign-in failure taxonomy.
//!
//! Providers report failures as free-form codes; everything above this crate
//! only ever sees the closed [`ErrorKind`] set.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Provider code for a popup request that was cancelled by a newer one.
pub const CODE_CANCELLED_POPUP_REQUEST: &str = "auth/cancelled-popup-request";
/// Provider code for a popup blocked by the environment.
pub const CODE_POPUP_BLOCKED: &str = "auth/popup-blocked";
/// Provider code for a popup closed before sign-in completed.
pub const CODE_POPUP_CLOSED_BY_USER: &str = "auth/popup-closed-by-user";
/// Provider code for a calling origin unknown to the provider.
pub const CODE_UNAUTHORIZED_DOMAIN: &str = "auth/unauthorized-domain";

/// Raw failure reported by an identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ProviderError {
    /// Provider-specific error code (e.g. `auth/popup-blocked`)
    pub code: String,
    /// Provider-supplied description
    pub message: String,
}

impl ProviderError {
    /// Create a provider error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Classified sign-in/sign-out failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum ErrorKind {
    /// A newer sign-in request interrupted an earlier one
    #[error("sign-in request was cancelled by another request")]
    ConcurrentRequestCancelled,

    /// The environment blocked the sign-in popup
    #[error("sign-in popup was blocked")]
    PopupBlocked,

    /// The user closed the popup before finishing
    #[error("sign-in popup was closed before completion")]
    PopupClosedByUser,

    /// The calling origin is not registered with the provider
    #[error("this domain is not authorized for sign-in")]
    UnauthorizedDomain,

    /// Any other provider failure; the message is for diagnostics only
    #[error("sign-in failed: {0}")]
    Unknown(String),
}

impl ErrorKind {
    /// Map a provider failure onto the closed taxonomy.
    #[must_use]
    pub fn classify(error: &ProviderError) -> Self {
        match error.code.as_str() {
            CODE_CANCELLED_POPUP_REQUEST => Self::ConcurrentRequestCancelled,
            CODE_POPUP_BLOCKED => Self::PopupBlocked,
            CODE_POPUP_CLOSED_BY_USER => Self::PopupClosedByUser,
            CODE_UNAUTHORIZED_DOMAIN => Self::UnauthorizedDomain,
            _ => Self::Unknown(error.message.clone()),
        }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConcurrentRequestCancelled => "CONCURRENT_REQUEST_CANCELLED",
            Self::PopupBlocked => "POPUP_BLOCKED",
            Self::PopupClosedByUser => "POPUP_CLOSED_BY_USER",
            Self::UnauthorizedDomain => "UNAUTHORIZED_DOMAIN",
            Self::Unknown(_) => "UNKNOWN",
        }
    }

    /// The one message shown to the user for this kind.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::ConcurrentRequestCancelled => {
                "Another sign-in was already in progress. Please try again."
            }
            Self::PopupBlocked => "The sign-in popup was blocked. Allow popups and try again.",
            Self::PopupClosedByUser => "Sign-in was cancelled before it finished.",
            Self::UnauthorizedDomain => "Sign-in is not enabled for this site.",
            Self::Unknown(_) => "Sign-in failed. Please try again.",
        }
    }
}

impl From<ProviderError> for ErrorKind {
    fn from(error: ProviderError) -> Self {
        Self::classify(&error)
    }
}
