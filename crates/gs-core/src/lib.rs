//! Guest Session Core
//!
//! Ties the session store, reconciler and client gate together behind a
//! single event entry point: on every query change, reconcile the query
//! into the store, then decide whether a guest client is available.
//!
//! # Example
//!
//! ```rust
//! use gs_client::GraphqlClientFactory;
//! use gs_core::{GuestSession, SessionConfig};
//! use gs_reconcile::QueryParams;
//! use gs_session::MemoryStore;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = GuestSession::start(
//!     SessionConfig::new(),
//!     MemoryStore::new(),
//!     GraphqlClientFactory::new(),
//! )?;
//!
//! let update = session.on_query_change(&QueryParams::parse("space_id=abc&delivery_token=tok"))?;
//! assert!(update.view.has_client());
//!
//! let update = session.on_query_change(&QueryParams::parse("reset"))?;
//! assert!(!update.view.has_client());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod session;

// Re-exports for convenience
pub use config::{ConfigError, SessionConfig};
pub use error::{Result, SessionError};
pub use session::{GuestSession, SessionUpdate, SessionView};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with guest sessions
    pub use crate::{GuestSession, SessionConfig, SessionUpdate, SessionView};
    pub use gs_client::{ClientDecision, ClientFactory, GraphqlClientFactory};
    pub use gs_reconcile::QueryParams;
    pub use gs_session::{FileStore, MemoryStore, SessionState, SessionStore};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
