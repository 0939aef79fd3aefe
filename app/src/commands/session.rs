//! Sign-in and session commands.

use crate::error::CommandError;
use crate::state::AppState;
use chrono::{DateTime, Utc};
use paygate_auth::{AccessState, ErrorKind, SignInOutcome, SignInStatus};
use serde::Serialize;
use tracing::{debug, info};

/// Response for session commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub access: AccessState,
    pub identifier: Option<String>,
    pub sign_in: SignInStatus,
    pub error: Option<ErrorKind>,
    pub error_message: Option<String>,
    pub last_signed_in_at: Option<DateTime<Utc>>,
}

impl SessionStatus {
    /// Snapshot the session part of `state`.
    pub fn capture(state: &AppState) -> Self {
        let identity = state.gate.identity();
        let error = state.sign_in.last_error();
        Self {
            access: state.gate.current(),
            identifier: identity.identifier().map(str::to_string),
            sign_in: state.sign_in.status(),
            error_message: error.as_ref().map(|kind| kind.user_message().to_string()),
            error,
            last_signed_in_at: state.sign_in.last_signed_in_at(),
        }
    }
}

/// Start a sign-in attempt.
///
/// Provider failures are reported in the returned status, not as errors.
pub async fn sign_in(state: &AppState) -> SessionStatus {
    match state.sign_in.begin_sign_in().await {
        SignInOutcome::SignedIn => info!(access = %state.gate.current(), "sign-in finished"),
        SignInOutcome::Failed(kind) => debug!(kind = kind.code(), "sign-in reported failure"),
        SignInOutcome::AlreadyInFlight => debug!("sign-in already running"),
    }
    SessionStatus::capture(state)
}

/// End the session.
pub async fn sign_out(state: &AppState) -> Result<SessionStatus, CommandError> {
    state.sign_in.sign_out().await?;
    Ok(SessionStatus::capture(state))
}

/// Current session status.
pub fn session_status(state: &AppState) -> SessionStatus {
    SessionStatus::capture(state)
}

/// Clear the last sign-in error.
pub fn dismiss_error(state: &AppState) -> SessionStatus {
    state.sign_in.dismiss_error();
    SessionStatus::capture(state)
}
