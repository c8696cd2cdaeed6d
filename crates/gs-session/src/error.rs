//! Error types for session persistence

use crate::state::StateKey;
use std::path::PathBuf;

/// Errors raised by session store adapters
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error reading or writing the backing file
    #[error("io error on session store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored document could not be (de)serialized
    #[error("session state serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Value kind does not fit the addressed field
    #[error("type mismatch for '{key}': expected {expected}, got {actual}")]
    TypeMismatch {
        key: StateKey,
        expected: &'static str,
        actual: &'static str,
    },
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Host string outside the supported set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown domain: '{0}'")]
pub struct UnknownDomain(pub String);

/// Result alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
