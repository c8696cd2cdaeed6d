//! Guest Session State
//!
//! Session-scoped state model and persistence adapters.
//!
//! # Overview
//!
//! - **SessionState**: the persisted record (editorial toggles, domain, guest credentials)
//! - **SessionStore**: synchronous get/set contract over one record
//! - **MemoryStore** / **FileStore**: process-local and JSON-file adapters
//!
//! # Example
//!
//! ```rust
//! use gs_session::{Domain, FieldValue, MemoryStore, SessionStore, StateKey};
//!
//! let store = MemoryStore::new();
//! store.seed_defaults(Domain::Contentful).unwrap();
//! store.set(StateKey::Preview, Some(FieldValue::Bool(true))).unwrap();
//!
//! assert!(store.snapshot().unwrap().preview);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod file;
pub mod state;
pub mod store;

// Re-exports
pub use error::{Result, StoreError, UnknownDomain};
pub use file::{FileStore, DEFAULT_STORAGE_KEY};
pub use state::{AccessToken, Domain, FieldValue, SessionState, StateKey};
pub use store::{MemoryStore, SessionStore};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for session state
    pub use crate::{
        AccessToken, Domain, FieldValue, FileStore, MemoryStore, SessionState, SessionStore,
        StateKey, StoreError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
