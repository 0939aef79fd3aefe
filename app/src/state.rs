//! Application state management.

use paygate_auth::{
    AuthorizationGate, IdentityObserver, IdentityProvider, IdentityPublisher, SignInController,
};
use paygate_clipboard::{Clipboard, CopyFeedbackTracker};
use paygate_core::{AppConfig, ConfigResult};
use std::sync::Arc;
use tracing::info;

/// State shared by all commands.
#[derive(Debug)]
pub struct AppState {
    /// Loaded configuration
    pub config: AppConfig,
    /// Current identity cell
    pub observer: IdentityObserver,
    /// Allowlist gate over `observer`
    pub gate: AuthorizationGate,
    /// Sign-in lifecycle
    pub sign_in: SignInController,
    /// Copy feedback per field
    pub tracker: CopyFeedbackTracker,
}

impl AppState {
    /// Wire the components from `config`.
    ///
    /// `make_provider` receives the publisher the provider must report
    /// session changes through.
    ///
    /// # Errors
    /// Returns error if the configuration does not validate.
    pub fn new<F>(
        config: AppConfig,
        clipboard: Arc<dyn Clipboard>,
        make_provider: F,
    ) -> ConfigResult<Self>
    where
        F: FnOnce(IdentityPublisher) -> Arc<dyn IdentityProvider>,
    {
        config.validate()?;

        let fields = Arc::new(config.field_set()?);
        let allowlist = config.allowlist();
        info!(
            fields = fields.len(),
            allowlisted = allowlist.len(),
            window_ms = config.feedback.window_ms,
            "building application state"
        );

        let observer = IdentityObserver::new();
        let provider = make_provider(observer.publisher());
        let sign_in = SignInController::new(provider, observer.publisher());
        let gate = AuthorizationGate::new(&observer, allowlist);
        let tracker =
            CopyFeedbackTracker::with_window(fields, clipboard, config.feedback.window());

        Ok(Self {
            config,
            observer,
            gate,
            sign_in,
            tracker,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::LocalIdentityProvider;
    use paygate_auth::AccessState;
    use paygate_clipboard::SystemClipboard;
    use paygate_core::FieldConfig;

    fn build(config: AppConfig) -> ConfigResult<AppState> {
        AppState::new(config, Arc::new(SystemClipboard::system_only()), |publisher| {
            Arc::new(LocalIdentityProvider::new(publisher))
        })
    }

    #[test]
    fn test_appstate_new() {
        let state = build(AppConfig::default()).expect("default config is valid");
        assert_eq!(state.gate.current(), AccessState::Unauthenticated);
        assert_eq!(state.tracker.fields().len(), 3);
        assert_eq!(state.tracker.window().as_millis(), 3000);
        assert!(!state.sign_in.is_in_flight());
    }

    #[test]
    fn test_appstate_rejects_invalid_config() {
        let mut config = AppConfig::default();
        config
            .fields
            .push(FieldConfig::new("bankName", "Bank Name (again)", "x"));
        assert!(build(config).is_err());
    }
}
