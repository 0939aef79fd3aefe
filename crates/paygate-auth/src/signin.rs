//! Sign-in lifecycle with a single in-flight attempt.

use crate::error::ErrorKind;
use crate::identity::IdentityPublisher;
use crate::provider::IdentityProvider;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Where the sign-in control currently stands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum SignInStatus {
    /// Ready for a new attempt
    #[default]
    Idle,
    /// A provider request is outstanding
    InFlight,
    /// The last attempt failed
    Failed(ErrorKind),
}

impl SignInStatus {
    /// Check if an attempt is outstanding.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }

    /// The failure of the last attempt, if it failed.
    #[must_use]
    pub fn error(&self) -> Option<&ErrorKind> {
        match self {
            Self::Failed(kind) => Some(kind),
            Self::Idle | Self::InFlight => None,
        }
    }
}

/// Result of a call to [`SignInController::begin_sign_in`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    /// The provider accepted the sign-in
    SignedIn,
    /// The provider rejected the sign-in
    Failed(ErrorKind),
    /// Another attempt was already outstanding; the provider was not called
    AlreadyInFlight,
}

#[derive(Debug, Default)]
struct ControllerState {
    status: SignInStatus,
    last_error: Option<ErrorKind>,
    last_signed_in_at: Option<DateTime<Utc>>,
}

/// Drives provider sign-in and sign-out.
///
/// At most one provider sign-in is outstanding at any time. The in-flight
/// flag is released when the attempt settles, and also when the attempt
/// future is dropped or the provider panics.
#[derive(Clone)]
pub struct SignInController {
    provider: Arc<dyn IdentityProvider>,
    publisher: IdentityPublisher,
    state: Arc<Mutex<ControllerState>>,
}

impl SignInController {
    /// Create a controller for `provider`.
    ///
    /// `publisher` is used to clear the identity after a successful sign-out.
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>, publisher: IdentityPublisher) -> Self {
        Self {
            provider,
            publisher,
            state: Arc::new(Mutex::new(ControllerState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        lock_state(&self.state)
    }

    /// Start a sign-in attempt unless one is already outstanding.
    pub async fn begin_sign_in(&self) -> SignInOutcome {
        let guard = {
            let mut state = self.lock();
            if state.status.is_in_flight() {
                debug!("sign-in already in flight, ignoring request");
                return SignInOutcome::AlreadyInFlight;
            }
            state.status = SignInStatus::InFlight;
            state.last_error = None;
            InFlightGuard::new(Arc::clone(&self.state))
        };

        info!(provider = self.provider.provider_id(), "sign-in started");

        match self.provider.sign_in().await {
            Ok(()) => {
                guard.succeed();
                info!(provider = self.provider.provider_id(), "sign-in completed");
                SignInOutcome::SignedIn
            }
            Err(error) => {
                let kind = ErrorKind::classify(&error);
                warn!(
                    provider = self.provider.provider_id(),
                    provider_code = %error.code,
                    kind = kind.code(),
                    "sign-in failed"
                );
                guard.fail(kind.clone());
                SignInOutcome::Failed(kind)
            }
        }
    }

    /// End the provider session.
    ///
    /// On success the identity is cleared right away. The sign-in status is
    /// left untouched either way; a failure is recorded as the last error.
    pub async fn sign_out(&self) -> Result<(), ErrorKind> {
        info!(provider = self.provider.provider_id(), "sign-out requested");

        match self.provider.sign_out().await {
            Ok(()) => {
                self.publisher.clear();
                info!(provider = self.provider.provider_id(), "signed out");
                Ok(())
            }
            Err(error) => {
                let kind = ErrorKind::classify(&error);
                warn!(
                    provider = self.provider.provider_id(),
                    provider_code = %error.code,
                    kind = kind.code(),
                    "sign-out failed"
                );
                self.lock().last_error = Some(kind.clone());
                Err(kind)
            }
        }
    }

    /// Clear a failed status so the prompt no longer shows the error.
    pub fn dismiss_error(&self) {
        let mut state = self.lock();
        if matches!(state.status, SignInStatus::Failed(_)) {
            state.status = SignInStatus::Idle;
        }
        state.last_error = None;
    }

    /// Current sign-in status.
    #[must_use]
    pub fn status(&self) -> SignInStatus {
        self.lock().status.clone()
    }

    /// Check if an attempt is outstanding.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.lock().status.is_in_flight()
    }

    /// Most recent sign-in or sign-out failure.
    #[must_use]
    pub fn last_error(&self) -> Option<ErrorKind> {
        self.lock().last_error.clone()
    }

    /// When the last successful sign-in completed.
    #[must_use]
    pub fn last_signed_in_at(&self) -> Option<DateTime<Utc>> {
        self.lock().last_signed_in_at
    }
}

impl fmt::Debug for SignInController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInController")
            .field("provider", &self.provider.provider_id())
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

fn lock_state(state: &Mutex<ControllerState>) -> MutexGuard<'_, ControllerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Releases the in-flight flag however the attempt ends.
struct InFlightGuard {
    state: Arc<Mutex<ControllerState>>,
    settled: bool,
}

impl InFlightGuard {
    fn new(state: Arc<Mutex<ControllerState>>) -> Self {
        Self {
            state,
            settled: false,
        }
    }

    fn succeed(mut self) {
        let mut state = lock_state(&self.state);
        state.status = SignInStatus::Idle;
        state.last_signed_in_at = Some(Utc::now());
        drop(state);
        self.settled = true;
    }

    fn fail(mut self, kind: ErrorKind) {
        let mut state = lock_state(&self.state);
        state.status = SignInStatus::Failed(kind.clone());
        state.last_error = Some(kind);
        drop(state);
        self.settled = true;
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = lock_state(&self.state);
        if state.status.is_in_flight() {
            warn!("sign-in attempt ended without a result, releasing in-flight flag");
            state.status = SignInStatus::Idle;
        }
    }
}
