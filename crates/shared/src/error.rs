//! Error taxonomy shared by the storage, state and color layers.

use uuid::Uuid;

/// Failure reported by a key-value storage backend
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage quota exceeded writing '{key}': {needed} bytes needed, {available} available")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },
}

/// Failure of a state-store operation.
///
/// `Persist` is reported after the in-memory mutation has already been
/// applied, so the session state stays correct even when the write fails.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to persist state: {0}")]
    Persist(#[from] StorageError),

    #[error("Failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Template title and body are required")]
    IncompleteTemplate,

    #[error("No {what} at position {index}")]
    OutOfRange { what: &'static str, index: usize },

    #[error("No {what} with id {id}")]
    NotFound { what: &'static str, id: Uuid },
}

impl StateError {
    /// True when the operation took effect in memory but could not be saved
    pub fn is_persist_failure(&self) -> bool {
        matches!(self, StateError::Persist(_) | StateError::Serialize(_))
    }
}

/// Rejected or partially applied color edit
#[derive(Debug, thiserror::Error)]
pub enum ColorError {
    #[error("'{0}' is not a #RRGGBB color")]
    InvalidHex(String),

    #[error("{channel} channel '{value}' is not an integer between 0 and 255")]
    InvalidChannel { channel: char, value: String },

    #[error(transparent)]
    State(#[from] StateError),
}
