//! PayGate Clipboard - copying gated fields with transient feedback.
//!
//! [`CopyFeedbackTracker`] writes a field (or all fields at once) through a
//! [`Clipboard`] and keeps a "copied" flag per key that turns itself off after
//! the feedback window. [`SystemClipboard`] is the production clipboard.
//!
//! Copied text is never logged.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod clipboard;
pub mod error;
pub mod system;
pub mod tracker;

pub use clipboard::Clipboard;
pub use error::{ClipboardError, CopyError, Result};
pub use system::SystemClipboard;
pub use tracker::{CopyFeedbackTracker, CopyState, DEFAULT_FEEDBACK_WINDOW};
