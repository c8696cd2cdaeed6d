//! Guest Session Reconciliation
//!
//! Classifies incoming query parameters and reconciles them with the
//! persisted session state.
//!
//! # Example
//!
//! ```rust
//! use gs_reconcile::{QueryParams, Reconciler};
//! use gs_session::SessionState;
//!
//! let params = QueryParams::parse("space_id=abc&delivery_token=tok&preview=true");
//! let result = Reconciler::new().reconcile(&params, &SessionState::new());
//!
//! assert_eq!(result.state.space_id.as_deref(), Some("abc"));
//! assert!(result.state.preview);
//! ```

#![warn(missing_docs)]

pub mod classify;
pub mod log;
pub mod query;
pub mod reconciler;

// Re-exports
pub use classify::{
    classify, is_recognized, ParamCategory, EDITORIAL_KEYS, OPTIONAL_GUEST_KEYS,
    REQUIRED_GUEST_KEYS,
};
pub use log::{KeyOutcome, Mutation, MutationLog, Outcome, SkipReason};
pub use query::QueryParams;
pub use reconciler::{Reconciler, Reconciliation, DEFAULT_RESET_PARAM};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for reconciliation
    pub use crate::{
        classify, Mutation, MutationLog, ParamCategory, QueryParams, Reconciler, Reconciliation,
        SkipReason,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
