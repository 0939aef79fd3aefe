//! PayGate Application Shell
//!
//! Wires configuration, the identity provider and the clipboard into
//! [`state::AppState`] and drives it from a console.
//! Core logic lives in the `crates/` directory.

pub mod commands;
pub mod console;
pub mod error;
pub mod provider;
pub mod state;
pub mod view;

use anyhow::Context;
use paygate_clipboard::SystemClipboard;
use paygate_core::AppConfig;
use provider::LocalIdentityProvider;
use state::AppState;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;

/// Initialize tracing subscriber for logging
///
/// Logs go to stderr so they never mix with the console view on stdout.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,paygate=debug"));

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// Run the console application until the input ends or `quit`.
///
/// # Errors
/// Returns error if the configuration cannot be loaded or the console
/// streams fail.
pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting PayGate v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load_with_env().context("failed to load configuration")?;

    let mut local = None;
    let state = AppState::new(config, Arc::new(SystemClipboard::new()), |publisher| {
        let provider = Arc::new(LocalIdentityProvider::new(publisher));
        local = Some(Arc::clone(&provider));
        provider
    })
    .context("invalid configuration")?;
    let provider = local.context("identity provider was not built")?;

    let mut gate = state.gate.clone();
    let watcher = tokio::spawn(async move {
        while let Some(access) = gate.changed().await {
            info!(%access, "access state changed");
        }
    });

    let result = console::run_console(
        &state,
        &provider,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await;

    watcher.abort();
    info!("PayGate stopped");
    result
}
