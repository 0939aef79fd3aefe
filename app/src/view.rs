//! The three mutually exclusive views and their text rendering.

use crate::state::AppState;
use paygate_auth::AccessState;
use paygate_core::CopyKey;
use serde::Serialize;
use std::fmt;
use zeroize::Zeroizing;

/// A copy button and its current label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyButton {
    pub copied: bool,
    pub label: &'static str,
}

impl CopyButton {
    fn field(copied: bool) -> Self {
        Self {
            copied,
            label: if copied { "Copied!" } else { "Copy" },
        }
    }

    fn all(copied: bool) -> Self {
        Self {
            copied,
            label: if copied {
                "All Info Copied!"
            } else {
                "Copy All Info"
            },
        }
    }
}

/// One field row of the authorized view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRow {
    pub key: String,
    pub label: String,
    pub value: Zeroizing<String>,
    pub button: CopyButton,
}

/// What the front-end renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum AccessView {
    /// No session: the sign-in control, disabled while `busy`
    SignInPrompt {
        busy: bool,
        error: Option<String>,
    },
    /// The gated fields
    Authorized {
        title: String,
        identifier: String,
        fields: Vec<FieldRow>,
        copy_all: CopyButton,
    },
    /// Signed in with an account that is not allowed; offers sign-out
    Denied {
        identifier: Option<String>,
        message: String,
    },
}

impl AccessView {
    /// Build the view for the current state.
    pub fn build(state: &AppState) -> Self {
        let identity = state.gate.identity();

        match state.gate.current() {
            AccessState::Unauthenticated => Self::SignInPrompt {
                busy: state.sign_in.is_in_flight(),
                error: state
                    .sign_in
                    .last_error()
                    .map(|kind| kind.user_message().to_string()),
            },
            AccessState::Denied => {
                let identifier = identity.identifier().map(str::to_string);
                let message = match &identifier {
                    Some(id) => format!("{id} is not authorized to view this information."),
                    None => "This account is not authorized to view this information.".to_string(),
                };
                Self::Denied {
                    identifier,
                    message,
                }
            }
            AccessState::Allowed => {
                let fields = state
                    .tracker
                    .fields()
                    .iter()
                    .map(|field| FieldRow {
                        key: field.key().to_string(),
                        label: field.label().to_string(),
                        value: Zeroizing::new(field.value().to_string()),
                        button: CopyButton::field(
                            state.tracker.is_copied(&CopyKey::parse(field.key())),
                        ),
                    })
                    .collect();

                Self::Authorized {
                    title: state.config.general.title.clone(),
                    identifier: identity.identifier().unwrap_or_default().to_string(),
                    fields,
                    copy_all: CopyButton::all(state.tracker.is_copied(&CopyKey::Aggregate)),
                }
            }
        }
    }
}

impl fmt::Display for AccessView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignInPrompt { busy, error } => {
                if *busy {
                    writeln!(f, "Signing in...")?;
                } else {
                    writeln!(f, "Sign in to view this information: signin <email>")?;
                }
                if let Some(error) = error {
                    writeln!(f, "! {error}")?;
                }
            }
            Self::Authorized {
                title,
                identifier,
                fields,
                copy_all,
            } => {
                writeln!(f, "{title}")?;
                writeln!(f, "(signed in as {identifier})")?;
                for row in fields {
                    writeln!(
                        f,
                        "  {}: {}  [{}] copy {}",
                        row.label,
                        row.value.as_str(),
                        row.button.label,
                        row.key
                    )?;
                }
                writeln!(f, "  [{}] copy {}", copy_all.label, CopyKey::Aggregate)?;
            }
            Self::Denied { message, .. } => {
                writeln!(f, "Access denied. {message}")?;
                writeln!(f, "Sign out to use a different account: signout")?;
            }
        }
        Ok(())
    }
}
