//! Error types for guest session orchestration

use crate::config::ConfigError;
use gs_session::StoreError;

/// Errors surfaced by a [`GuestSession`](crate::GuestSession)
///
/// Reconciliation and gating never fail; only the store and configuration
/// collaborators can.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Session store read or write failed
    #[error("session store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
