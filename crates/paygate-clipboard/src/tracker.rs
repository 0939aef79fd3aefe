//! Per-field "copied" feedback with automatic expiry.

use crate::clipboard::Clipboard;
use crate::error::{CopyError, Result};
use paygate_core::{CopyKey, FieldSet};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Default length of the feedback window.
pub const DEFAULT_FEEDBACK_WINDOW: Duration = Duration::from_millis(3000);

/// Feedback state of one copy key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyState {
    /// Whether the "copied" indicator is on
    pub copied: bool,
    /// When the indicator turns off
    pub expires_at: Option<Instant>,
}

impl CopyState {
    fn active(expires_at: Instant) -> Self {
        Self {
            copied: true,
            expires_at: Some(expires_at),
        }
    }

    /// The state as seen at `now`: a passed deadline reads as not copied.
    #[must_use]
    pub fn at(self, now: Instant) -> Self {
        match self.expires_at {
            Some(deadline) if self.copied && now < deadline => self,
            _ => Self::default(),
        }
    }

    /// Time left in the window at `now`.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.at(now)
            .expires_at
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

#[derive(Debug, Default)]
struct Entry {
    state: CopyState,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

type Entries = Arc<Mutex<HashMap<CopyKey, Entry>>>;

/// Tracks which fields were copied recently.
///
/// Every key has its own window. A new copy of a key aborts that key's
/// pending expiry and starts a fresh window; other keys are not affected.
#[derive(Clone)]
pub struct CopyFeedbackTracker {
    fields: Arc<FieldSet>,
    clipboard: Arc<dyn Clipboard>,
    window: Duration,
    entries: Entries,
}

impl CopyFeedbackTracker {
    /// Create a tracker with the default 3 second window.
    #[must_use]
    pub fn new(fields: Arc<FieldSet>, clipboard: Arc<dyn Clipboard>) -> Self {
        Self::with_window(fields, clipboard, DEFAULT_FEEDBACK_WINDOW)
    }

    /// Create a tracker with a custom window.
    #[must_use]
    pub fn with_window(
        fields: Arc<FieldSet>,
        clipboard: Arc<dyn Clipboard>,
        window: Duration,
    ) -> Self {
        Self {
            fields,
            clipboard,
            window,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The feedback window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// The fields this tracker copies from.
    #[must_use]
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Copy the text for `key` and start its feedback window.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// - `CopyError::UnknownField` if `key` names no configured field
    /// - `CopyError::Clipboard` if the write failed; the key's state is left as it was
    pub async fn copy(&self, key: &CopyKey) -> Result<CopyState> {
        let text = self
            .fields
            .text_for(key)
            .ok_or_else(|| CopyError::UnknownField(key.to_string()))?;

        if let Err(error) = self.clipboard.write_text(&text).await {
            warn!(%key, %error, "clipboard write failed");
            return Err(error.into());
        }

        let expires_at = Instant::now() + self.window;
        let mut entries = lock_entries(&self.entries);
        let entry = entries.entry(key.clone()).or_default();

        entry.generation += 1;
        if let Some(timer) = entry.timer.take() {
            timer.abort();
        }
        entry.state = CopyState::active(expires_at);
        entry.timer = Some(spawn_expiry(
            Arc::clone(&self.entries),
            key.clone(),
            entry.generation,
            expires_at,
        ));

        debug!(%key, window_ms = self.window.as_millis(), "copy feedback started");
        Ok(entry.state)
    }

    /// Feedback state of `key` right now.
    #[must_use]
    pub fn state(&self, key: &CopyKey) -> CopyState {
        let now = Instant::now();
        lock_entries(&self.entries)
            .get(key)
            .map(|entry| entry.state.at(now))
            .unwrap_or_default()
    }

    /// Check if `key` shows the "copied" indicator.
    #[must_use]
    pub fn is_copied(&self, key: &CopyKey) -> bool {
        self.state(key).copied
    }

    /// Every copy key with its current state, fields first, aggregate last.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(CopyKey, CopyState)> {
        let now = Instant::now();
        let entries = lock_entries(&self.entries);
        self.fields
            .copy_keys()
            .into_iter()
            .map(|key| {
                let state = entries
                    .get(&key)
                    .map(|entry| entry.state.at(now))
                    .unwrap_or_default();
                (key, state)
            })
            .collect()
    }
}

impl fmt::Debug for CopyFeedbackTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyFeedbackTracker")
            .field("fields", &self.fields.len())
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

fn lock_entries(
    entries: &Mutex<HashMap<CopyKey, Entry>>,
) -> MutexGuard<'_, HashMap<CopyKey, Entry>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Turn `key` off at `deadline` unless a newer copy replaced this window.
fn spawn_expiry(
    entries: Entries,
    key: CopyKey,
    generation: u64,
    deadline: Instant,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep_until(deadline).await;

        let mut entries = lock_entries(&entries);
        if let Some(entry) = entries.get_mut(&key) {
            if entry.generation == generation {
                entry.state = CopyState::default();
                entry.timer = None;
                debug!(%key, "copy feedback expired");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClipboardError;
    use async_trait::async_trait;
    use paygate_core::Field;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::time::sleep;

    #[derive(Default)]
    struct RecordingClipboard {
        writes: Mutex<Vec<String>>,
        fail: AtomicBool,
    }

    impl RecordingClipboard {
        fn writes(&self) -> Vec<String> {
            self.writes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Clipboard for RecordingClipboard {
        async fn write_text(&self, text: &str) -> std::result::Result<(), ClipboardError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(ClipboardError::System("permission denied".to_string()));
            }
            self.writes.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn bank_fields() -> Arc<FieldSet> {
        Arc::new(
            FieldSet::new(vec![
                Field::new("bankName", "Bank Name", "TECHCOMBANK"),
                Field::new("accountNumber", "Account Number", "19027906069012"),
                Field::new("beneficiaryName", "Beneficiary Name", "PHAM TUNG"),
            ])
            .expect("valid field set"),
        )
    }

    fn tracker() -> (Arc<RecordingClipboard>, CopyFeedbackTracker) {
        let clipboard = Arc::new(RecordingClipboard::default());
        let tracker = CopyFeedbackTracker::new(bank_fields(), clipboard.clone());
        (clipboard, tracker)
    }

    fn key(name: &str) -> CopyKey {
        CopyKey::parse(name)
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_sets_flag_and_expires() {
        let (clipboard, tracker) = tracker();
        let account = key("accountNumber");

        let state = tracker.copy(&account).await.expect("copy");
        assert!(state.copied);
        assert!(tracker.is_copied(&account));
        assert_eq!(clipboard.writes(), vec!["19027906069012".to_string()]);

        sleep(Duration::from_millis(2999)).await;
        assert!(tracker.is_copied(&account));

        sleep(Duration::from_millis(1)).await;
        assert!(!tracker.is_copied(&account));
        assert_eq!(tracker.state(&account), CopyState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_recopy_restarts_window() {
        let (_clipboard, tracker) = tracker();
        let bank = key("bankName");

        tracker.copy(&bank).await.expect("first copy");
        sleep(Duration::from_millis(1000)).await;
        tracker.copy(&bank).await.expect("second copy");

        sleep(Duration::from_millis(2500)).await;
        assert!(tracker.is_copied(&bank), "still on at t+3500");

        sleep(Duration::from_millis(500)).await;
        assert!(!tracker.is_copied(&bank), "off at t+4000");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_timer_does_not_clobber_newer_window() {
        let (_clipboard, tracker) = tracker();
        let bank = key("bankName");

        tracker.copy(&bank).await.expect("first copy");
        sleep(Duration::from_millis(1000)).await;
        tracker.copy(&bank).await.expect("second copy");

        // First window's deadline passes here.
        sleep(Duration::from_millis(2100)).await;
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert!(tracker.is_copied(&bank));

        let raw = lock_entries(&tracker.entries)
            .get(&bank)
            .map(|entry| (entry.state.copied, entry.generation))
            .expect("entry exists");
        assert_eq!(raw, (true, 2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_have_independent_windows() {
        let (_clipboard, tracker) = tracker();
        let bank = key("bankName");
        let account = key("accountNumber");

        tracker.copy(&bank).await.expect("copy bank");
        sleep(Duration::from_millis(1000)).await;
        tracker.copy(&account).await.expect("copy account");

        sleep(Duration::from_millis(2000)).await;
        assert!(!tracker.is_copied(&bank));
        assert!(tracker.is_copied(&account));
        assert!(!tracker.is_copied(&CopyKey::Aggregate));
    }

    #[tokio::test(start_paused = true)]
    async fn test_aggregate_copies_all_fields_in_order() {
        let (clipboard, tracker) = tracker();

        tracker.copy(&CopyKey::Aggregate).await.expect("copy all");
        assert_eq!(
            clipboard.writes(),
            vec![
                "Bank Name: TECHCOMBANK\nAccount Number: 19027906069012\nBeneficiary Name: PHAM TUNG"
                    .to_string()
            ]
        );
        assert!(tracker.is_copied(&CopyKey::Aggregate));
        assert!(!tracker.is_copied(&key("bankName")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clipboard_failure_leaves_state_untouched() {
        let (clipboard, tracker) = tracker();
        let bank = key("bankName");

        clipboard.fail.store(true, Ordering::SeqCst);
        let err = tracker.copy(&bank).await.expect_err("write fails");
        assert!(matches!(err, CopyError::Clipboard(_)));
        assert!(!tracker.is_copied(&bank));

        clipboard.fail.store(false, Ordering::SeqCst);
        tracker.copy(&bank).await.expect("copy");
        let before = tracker.state(&bank);

        sleep(Duration::from_millis(500)).await;
        clipboard.fail.store(true, Ordering::SeqCst);
        tracker.copy(&bank).await.expect_err("write fails");
        assert_eq!(tracker.state(&bank), before, "window not restarted");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_field_is_rejected_without_write() {
        let (clipboard, tracker) = tracker();

        let err = tracker.copy(&key("iban")).await.expect_err("unknown field");
        assert_eq!(err, CopyError::UnknownField("iban".to_string()));
        assert!(clipboard.writes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_task_resets_entry() {
        let (_clipboard, tracker) = tracker();
        let bank = key("bankName");

        tracker.copy(&bank).await.expect("copy");
        sleep(Duration::from_millis(3100)).await;

        let entries = lock_entries(&tracker.entries);
        let entry = entries.get(&bank).expect("entry exists");
        assert!(!entry.state.copied);
        assert!(entry.timer.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_lists_every_key() {
        let (_clipboard, tracker) = tracker();
        tracker.copy(&key("beneficiaryName")).await.expect("copy");

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot[3].0, CopyKey::Aggregate);
        let copied: Vec<_> = snapshot
            .iter()
            .filter(|(_, state)| state.copied)
            .map(|(key, _)| key.as_str())
            .collect();
        assert_eq!(copied, vec!["beneficiaryName"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_window_and_remaining() {
        let clipboard = Arc::new(RecordingClipboard::default());
        let tracker =
            CopyFeedbackTracker::with_window(bank_fields(), clipboard, Duration::from_millis(500));
        let bank = key("bankName");

        let state = tracker.copy(&bank).await.expect("copy");
        assert_eq!(
            state.remaining(Instant::now()),
            Some(Duration::from_millis(500))
        );

        sleep(Duration::from_millis(500)).await;
        assert!(!tracker.is_copied(&bank));
        assert_eq!(tracker.state(&bank).remaining(Instant::now()), None);
    }
}
