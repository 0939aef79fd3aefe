//! Field copy and view commands.

use crate::error::CommandError;
use crate::state::AppState;
use crate::view::AccessView;
use paygate_core::CopyKey;
use serde::Serialize;
use tokio::time::Instant;
use tracing::warn;

/// Response for the `copy_field` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyFeedback {
    pub key: String,
    pub copied: bool,
    pub remaining_ms: Option<u64>,
}

/// Copy one field, or every field with the aggregate key.
///
/// Only allowed while the gate shows the fields.
pub async fn copy_field(state: &AppState, key: &str) -> Result<CopyFeedback, CommandError> {
    if !state.gate.can_reveal() {
        warn!(key, access = %state.gate.current(), "copy refused, fields are not visible");
        return Err(CommandError::access_denied());
    }

    let key = CopyKey::parse(key);
    let copy_state = state.tracker.copy(&key).await?;
    let remaining_ms = copy_state
        .remaining(Instant::now())
        .map(|left| u64::try_from(left.as_millis()).unwrap_or(u64::MAX));

    Ok(CopyFeedback {
        key: key.to_string(),
        copied: copy_state.copied,
        remaining_ms,
    })
}

/// The view the front-end should show right now.
pub fn access_view(state: &AppState) -> AccessView {
    AccessView::build(state)
}
