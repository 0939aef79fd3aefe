//! Allowlist gate deciding what may be rendered.

use crate::identity::IdentityObserver;
use paygate_core::{Allowlist, Identity};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// What the current identity is allowed to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessState {
    /// No session: show the sign-in prompt
    Unauthenticated,
    /// Signed in but not on the allowlist: show the denial and sign-out
    Denied,
    /// Signed in and allowlisted: show the fields
    Allowed,
}

impl fmt::Display for AccessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Denied => "denied",
            Self::Allowed => "allowed",
        };
        f.write_str(label)
    }
}

/// Derive the access state from an identity and the allowlist.
///
/// A session without an identifier is denied.
#[must_use]
pub fn derive_access_state(identity: &Identity, allowlist: &Allowlist) -> AccessState {
    if !identity.is_present() {
        return AccessState::Unauthenticated;
    }

    match identity.identifier() {
        Some(identifier) if allowlist.contains(identifier) => AccessState::Allowed,
        _ => AccessState::Denied,
    }
}

/// Gate bound to a live identity cell and a fixed allowlist.
///
/// The state is derived from the cell on every read and never cached, so a
/// sign-out is reflected by the very next call.
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    identity: watch::Receiver<Identity>,
    allowlist: Arc<Allowlist>,
}

impl AuthorizationGate {
    /// Bind a gate to `observer`.
    #[must_use]
    pub fn new(observer: &IdentityObserver, allowlist: Allowlist) -> Self {
        Self {
            identity: observer.subscribe(),
            allowlist: Arc::new(allowlist),
        }
    }

    /// Current access state.
    #[must_use]
    pub fn current(&self) -> AccessState {
        derive_access_state(&self.identity.borrow(), &self.allowlist)
    }

    /// Check if the gated content may be shown right now.
    #[must_use]
    pub fn can_reveal(&self) -> bool {
        self.current() == AccessState::Allowed
    }

    /// The identity the current decision is based on.
    #[must_use]
    pub fn identity(&self) -> Identity {
        self.identity.borrow().clone()
    }

    /// The allowlist this gate checks against.
    #[must_use]
    pub fn allowlist(&self) -> &Allowlist {
        &self.allowlist
    }

    /// Wait for the next identity change and return the re-derived state.
    ///
    /// Returns `None` once the identity cell has been dropped.
    pub async fn changed(&mut self) -> Option<AccessState> {
        self.identity.changed().await.ok()?;
        let state = derive_access_state(&self.identity.borrow_and_update(), &self.allowlist);
        debug!(%state, "access state re-derived");
        Some(state)
    }
}
