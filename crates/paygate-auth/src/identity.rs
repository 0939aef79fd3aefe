//! Observable cell holding the current identity.

use crate::error::ProviderError;
use paygate_core::Identity;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Read side of the identity cell.
///
/// Holds the identity most recently reported by the provider. It exposes no
/// mutation; changes go through an [`IdentityPublisher`].
#[derive(Debug, Clone)]
pub struct IdentityObserver {
    tx: Arc<watch::Sender<Identity>>,
}

impl IdentityObserver {
    /// Create an observer with no session.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Identity::absent());
        Self { tx: Arc::new(tx) }
    }

    /// Get the current identity.
    #[must_use]
    pub fn current(&self) -> Identity {
        self.tx.borrow().clone()
    }

    /// Subscribe to identity changes.
    ///
    /// The receiver starts with the current value marked as seen.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Identity> {
        self.tx.subscribe()
    }

    /// Handle allowed to change the identity.
    #[must_use]
    pub fn publisher(&self) -> IdentityPublisher {
        IdentityPublisher {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl Default for IdentityObserver {
    fn default() -> Self {
        Self::new()
    }
}

/// Write side of the identity cell, handed to provider integrations.
#[derive(Debug, Clone)]
pub struct IdentityPublisher {
    tx: Arc<watch::Sender<Identity>>,
}

impl IdentityPublisher {
    /// Replace the identity. Subscribers are only woken if it changed.
    pub fn publish(&self, identity: Identity) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == identity {
                false
            } else {
                *current = identity;
                true
            }
        });

        if changed {
            let present = self.tx.borrow().is_present();
            info!(
                present,
                subscribers = self.tx.receiver_count(),
                "identity changed"
            );
        }
    }

    /// Drop the session.
    pub fn clear(&self) {
        self.publish(Identity::absent());
    }

    /// Publish the outcome of reading the provider's session.
    ///
    /// An unreachable provider counts as no session.
    pub fn publish_result(&self, result: Result<Identity, ProviderError>) {
        match result {
            Ok(identity) => self.publish(identity),
            Err(error) => {
                warn!(code = %error.code, "identity source unreachable, treating as signed out");
                self.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observer_starts_absent() {
        let observer = IdentityObserver::new();
        assert_eq!(observer.current(), Identity::absent());
    }

    #[test]
    fn test_publish_updates_current() {
        let observer = IdentityObserver::new();
        let publisher = observer.publisher();

        publisher.publish(Identity::signed_in("tung.42@gmail.com"));
        assert_eq!(observer.current().identifier(), Some("tung.42@gmail.com"));

        publisher.clear();
        assert!(!observer.current().is_present());
    }

    #[test]
    fn test_unreachable_source_fails_closed() {
        let observer = IdentityObserver::new();
        let publisher = observer.publisher();
        publisher.publish(Identity::signed_in("tung.42@gmail.com"));

        publisher.publish_result(Err(ProviderError::new("auth/network-request-failed", "offline")));
        assert_eq!(observer.current(), Identity::absent());
    }

    #[tokio::test]
    async fn test_subscribers_notified_on_change() {
        let observer = IdentityObserver::new();
        let mut rx = observer.subscribe();
        let publisher = observer.publisher();

        publisher.publish(Identity::signed_in("eve@example.com"));
        rx.changed().await.expect("observer alive");
        assert_eq!(rx.borrow_and_update().identifier(), Some("eve@example.com"));
    }

    #[tokio::test]
    async fn test_republishing_same_identity_does_not_notify() {
        let observer = IdentityObserver::new();
        let mut rx = observer.subscribe();
        let publisher = observer.publisher();

        publisher.clear();
        assert!(!rx.has_changed().expect("observer alive"));

        publisher.publish(Identity::signed_in("eve@example.com"));
        assert!(rx.has_changed().expect("observer alive"));
        rx.borrow_and_update();

        publisher.publish(Identity::signed_in("eve@example.com"));
        assert!(!rx.has_changed().expect("observer alive"));
    }
}
