//! Shared types used across PayGate.
//!
//! This module defines the identity, allowlist and field models that the
//! gate, the sign-in controller and the copy tracker operate on.

use crate::error::{GateError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use zeroize::Zeroizing;

/// Reserved copy key addressing the "all fields" aggregate.
pub const AGGREGATE_KEY: &str = "aggregate";

/// The signed-in user as reported by the identity provider.
///
/// `present` tracks whether a session exists at all. A provider may report a
/// session without an identifier (e.g. an anonymous account), which is why
/// the two are kept separate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Whether a session exists
    pub present: bool,
    /// Email-like identifier of the session, if the provider supplied one
    pub identifier: Option<String>,
}

impl Identity {
    /// No session.
    #[must_use]
    pub fn absent() -> Self {
        Self::default()
    }

    /// A session identified by `identifier`.
    #[must_use]
    pub fn signed_in(identifier: impl Into<String>) -> Self {
        Self {
            present: true,
            identifier: Some(identifier.into()),
        }
    }

    /// A session the provider could not attach an identifier to.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            present: true,
            identifier: None,
        }
    }

    /// Check if a session exists.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.present
    }

    /// Get the identifier, only when a session exists.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        if self.present {
            self.identifier.as_deref()
        } else {
            None
        }
    }
}

/// Immutable set of identifiers allowed to see the gated fields.
///
/// Membership is exact string equality: no case folding and no trimming.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Allowlist(HashSet<String>);

impl Allowlist {
    /// Build an allowlist from identifiers.
    pub fn new<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(identifiers.into_iter().map(Into::into).collect())
    }

    /// Check if `identifier` is on the list.
    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.0.contains(identifier)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the list is empty (nobody is allowed).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Allowlist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// A single piece of gated information.
///
/// The value is wiped from memory on drop and never printed by `Debug`.
#[derive(Clone)]
pub struct Field {
    key: String,
    label: String,
    value: Zeroizing<String>,
}

impl Field {
    /// Create a new field.
    pub fn new(key: impl Into<String>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            value: Zeroizing::new(value.into()),
        }
    }

    /// Stable key used to address the field.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The gated value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Ordered, validated set of fields.
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    fields: Vec<Field>,
}

impl FieldSet {
    /// Build a field set, preserving declaration order.
    ///
    /// # Errors
    /// Returns `GateError::Validation` if a key or label is empty, a key is
    /// repeated, or a key collides with [`AGGREGATE_KEY`].
    pub fn new(fields: Vec<Field>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if field.key.trim().is_empty() {
                return Err(GateError::Validation("field key must not be empty".to_string()));
            }
            if field.label.trim().is_empty() {
                return Err(GateError::Validation(format!(
                    "field '{}' must have a label",
                    field.key
                )));
            }
            if field.key == AGGREGATE_KEY {
                return Err(GateError::Validation(format!(
                    "field key '{AGGREGATE_KEY}' is reserved for the aggregate"
                )));
            }
            if !seen.insert(field.key.as_str()) {
                return Err(GateError::Validation(format!(
                    "duplicate field key '{}'",
                    field.key
                )));
            }
        }
        Ok(Self { fields })
    }

    /// Iterate over the fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.key == key)
    }

    /// Every key that can be copied: each field, then the aggregate.
    #[must_use]
    pub fn copy_keys(&self) -> Vec<CopyKey> {
        self.fields
            .iter()
            .map(|field| CopyKey::Field(field.key.clone()))
            .chain(std::iter::once(CopyKey::Aggregate))
            .collect()
    }

    /// All fields rendered as `"<label>: <value>"` lines joined by `\n`.
    #[must_use]
    pub fn aggregate_text(&self) -> Zeroizing<String> {
        let mut text = Zeroizing::new(String::new());
        for (index, field) in self.fields.iter().enumerate() {
            if index > 0 {
                text.push('\n');
            }
            text.push_str(&field.label);
            text.push_str(": ");
            text.push_str(&field.value);
        }
        text
    }

    /// Text to put on the clipboard for `key`, or `None` for an unknown field.
    #[must_use]
    pub fn text_for(&self, key: &CopyKey) -> Option<Zeroizing<String>> {
        match key {
            CopyKey::Field(name) => self
                .get(name)
                .map(|field| Zeroizing::new(field.value.to_string())),
            CopyKey::Aggregate => Some(self.aggregate_text()),
        }
    }
}

/// Addresses one copy target: a configured field or the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CopyKey {
    /// A single configured field
    Field(String),
    /// Every field at once
    Aggregate,
}

impl CopyKey {
    /// Parse a key, mapping [`AGGREGATE_KEY`] to the aggregate.
    #[must_use]
    pub fn parse(key: &str) -> Self {
        if key == AGGREGATE_KEY {
            Self::Aggregate
        } else {
            Self::Field(key.to_string())
        }
    }

    /// The key as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Field(name) => name,
            Self::Aggregate => AGGREGATE_KEY,
        }
    }
}

impl From<String> for CopyKey {
    fn from(key: String) -> Self {
        Self::parse(&key)
    }
}

impl From<&str> for CopyKey {
    fn from(key: &str) -> Self {
        Self::parse(key)
    }
}

impl From<CopyKey> for String {
    fn from(key: CopyKey) -> Self {
        key.as_str().to_string()
    }
}

impl fmt::Display for CopyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
