//! Identity provider contract.

use crate::error::ProviderError;
use async_trait::async_trait;

/// External identity provider (popup sign-in, session management).
///
/// Implementations report session changes through an
/// [`IdentityPublisher`](crate::IdentityPublisher) they were handed at
/// construction; the calls below only report whether the request itself
/// succeeded.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Run the provider's interactive sign-in flow.
    ///
    /// # Errors
    /// Returns the provider's error code and message on failure.
    async fn sign_in(&self) -> Result<(), ProviderError>;

    /// End the provider session.
    ///
    /// # Errors
    /// Returns the provider's error code and message on failure.
    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Short name used in logs.
    fn provider_id(&self) -> &str;
}
