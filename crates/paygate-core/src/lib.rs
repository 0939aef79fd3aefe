//! PayGate Core - Foundation crate for the PayGate access gate.
//!
//! This crate provides the shared data model, error handling and
//! configuration management that the other PayGate crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared domain types (`Identity`, `Allowlist`, `FieldSet`, `CopyKey`)
//!
//! # Example
//!
//! ```rust
//! use paygate_core::{AppConfig, CopyKey};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let fields = config.field_set()?;
//!
//! let text = fields.text_for(&CopyKey::Aggregate).expect("aggregate is always available");
//! assert!(text.starts_with("Bank Name: "));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AccessConfig, AppConfig, FeedbackConfig, FieldConfig, GeneralConfig};
pub use error::{ConfigError, ConfigResult, GateError, Result};
pub use types::{Allowlist, CopyKey, Field, FieldSet, Identity, AGGREGATE_KEY};
