//! Configuration management for PayGate.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use crate::types::{Allowlist, Field, FieldSet};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use zeroize::Zeroizing;

/// Main application configuration.
///
/// This is loaded from `~/.config/paygate/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General application settings
    pub general: GeneralConfig,
    /// Who may see the gated fields
    pub access: AccessConfig,
    /// Copy feedback settings
    pub feedback: FeedbackConfig,
    /// The gated fields, in display order
    pub fields: Vec<FieldConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            access: AccessConfig::default(),
            feedback: FeedbackConfig::default(),
            fields: default_fields(),
        }
    }
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults if
    /// the file does not exist.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();

        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `PAYGATE_FEEDBACK_WINDOW_MS`: Override the copy feedback window
    /// - `PAYGATE_ALLOWLIST`: Comma-separated allowlist replacing the configured one
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `PAYGATE_*` environment overrides on top of the current values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PAYGATE_FEEDBACK_WINDOW_MS") {
            if let Ok(window_ms) = val.parse() {
                self.feedback.window_ms = window_ms;
                tracing::debug!("Override feedback.window_ms from env: {}", window_ms);
            }
        }

        if let Ok(val) = std::env::var("PAYGATE_ALLOWLIST") {
            self.access.allowlist = parse_allowlist(&val);
            tracing::debug!(
                "Override access.allowlist from env: {} entries",
                self.access.allowlist.len()
            );
        }
    }

    /// Check the configuration for values the gate cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.feedback.window_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "feedback.window_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        self.field_set()?;
        Ok(())
    }

    /// Build the validated field set.
    pub fn field_set(&self) -> ConfigResult<FieldSet> {
        let fields = self
            .fields
            .iter()
            .map(|field| Field::new(&field.key, &field.label, field.value.as_str()))
            .collect();

        FieldSet::new(fields).map_err(|e| ConfigError::InvalidValue {
            field: "fields".to_string(),
            reason: e.to_string(),
        })
    }

    /// Build the allowlist.
    #[must_use]
    pub fn allowlist(&self) -> Allowlist {
        self.access.allowlist.iter().cloned().collect()
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(Self::config_path()?)
    }

    /// Save configuration to an explicit path.
    pub fn save_to(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let config_dir = path.parent().ok_or_else(|| ConfigError::InvalidValue {
            field: "config_path".to_string(),
            reason: "no parent directory".to_string(),
        })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/paygate/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "paygate", "paygate").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn parse_allowlist(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Heading shown above the gated fields
    pub title: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            title: "Bank Information of Pham Tung".to_string(),
        }
    }
}

/// Access control settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Identifiers allowed to see the fields, matched exactly
    pub allowlist: Vec<String>,
}

/// Copy feedback settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// How long a "copied" indicator stays on, in milliseconds
    pub window_ms: u64,
}

impl FeedbackConfig {
    /// The feedback window as a `Duration`.
    #[must_use]
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self { window_ms: 3000 }
    }
}

/// One gated field as written in the config file.
#[derive(Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Stable key used by copy commands
    pub key: String,
    /// Human-readable label
    pub label: String,
    /// The gated value, wiped on drop
    pub value: Zeroizing<String>,
}

impl FieldConfig {
    /// Create a field entry.
    pub fn new(key: impl Into<String>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            value: Zeroizing::new(value.into()),
        }
    }
}

impl std::fmt::Debug for FieldConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldConfig")
            .field("key", &self.key)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

fn default_fields() -> Vec<FieldConfig> {
    vec![
        FieldConfig::new("bankName", "Bank Name", "TECHCOMBANK"),
        FieldConfig::new("accountNumber", "Account Number", "19027906069012"),
        FieldConfig::new("beneficiaryName", "Beneficiary Name", "PHAM TUNG"),
    ]
}
