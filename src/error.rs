//! Crate-wide error type.

use crate::preference::PreferenceKind;

/// Error returned by preference parsing, storage writes, and config loading.
#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    /// A raw value is outside the closed domain of its preference kind.
    #[error("invalid {kind} value: {value:?}")]
    InvalidValue { kind: PreferenceKind, value: String },
    /// A raw preference name is not one of the known kinds.
    #[error("unknown preference: {0:?}")]
    UnknownPreference(String),
    /// The key-value backend rejected a write.
    #[error("storage error: {0}")]
    Storage(String),
    /// Configuration JSON could not be parsed.
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

impl PreferenceError {
    pub(crate) fn invalid(kind: PreferenceKind, value: &str) -> Self {
        Self::InvalidValue { kind, value: value.to_owned() }
    }
}
