//! Console identity provider.
//!
//! Stands in for a hosted provider's popup: the console supplies the account
//! to sign in with, and the provider validates it and publishes the session.

use async_trait::async_trait;
use paygate_auth::error::CODE_POPUP_CLOSED_BY_USER;
use paygate_auth::{IdentityProvider, IdentityPublisher, ProviderError};
use paygate_core::Identity;
use regex::Regex;
use std::sync::{Mutex, OnceLock, PoisonError};
use tracing::debug;

/// Provider code for a malformed email address.
pub const CODE_INVALID_EMAIL: &str = "auth/invalid-email";

/// Identity provider driven by console input.
#[derive(Debug)]
pub struct LocalIdentityProvider {
    publisher: IdentityPublisher,
    pending: Mutex<Option<String>>,
}

impl LocalIdentityProvider {
    /// Create a provider reporting sessions through `publisher`.
    #[must_use]
    pub fn new(publisher: IdentityPublisher) -> Self {
        Self {
            publisher,
            pending: Mutex::new(None),
        }
    }

    /// Choose the account the next sign-in uses.
    pub fn choose_account(&self, identifier: impl Into<String>) {
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(identifier.into());
    }

    fn take_pending(&self) -> Option<String> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_in(&self) -> Result<(), ProviderError> {
        let Some(identifier) = self.take_pending() else {
            return Err(ProviderError::new(
                CODE_POPUP_CLOSED_BY_USER,
                "no account was chosen",
            ));
        };

        if !is_valid_email(&identifier) {
            return Err(ProviderError::new(
                CODE_INVALID_EMAIL,
                "The email address is badly formatted.",
            ));
        }

        debug!(identifier = %identifier, "local provider accepted account");
        self.publisher.publish(Identity::signed_in(identifier));
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.publisher.clear();
        Ok(())
    }

    fn provider_id(&self) -> &str {
        "local"
    }
}

fn is_valid_email(candidate: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));
    regex.is_match(candidate)
}
