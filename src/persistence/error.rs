//! Store and slot errors

use thiserror::Error;

/// Failure reported by a `KeyValueStore` backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage is not available")]
    Unavailable,

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage contents are malformed: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("storage rejected the operation: {0}")]
    Rejected(String),
}

/// Which side of the slot binding failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Slot unreadable or content unparseable
    Load,
    /// Slot unwritable or value unserializable
    Save,
}

/// Failure while moving a typed value in or out of a slot
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to read slot `{key}`: {source}")]
    Read {
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to parse slot `{key}`: {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize value for slot `{key}`: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write slot `{key}`: {source}")]
    Write {
        key: String,
        #[source]
        source: StoreError,
    },
}

impl PersistError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PersistError::Read { .. } | PersistError::Parse { .. } => FailureKind::Load,
            PersistError::Serialize { .. } | PersistError::Write { .. } => FailureKind::Save,
        }
    }

    /// Slot key the failure relates to
    pub fn key(&self) -> &str {
        match self {
            PersistError::Read { key, .. }
            | PersistError::Parse { key, .. }
            | PersistError::Serialize { key, .. }
            | PersistError::Write { key, .. } => key,
        }
    }
}
