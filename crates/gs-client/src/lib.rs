//! Guest Client Gate
//!
//! Decides whether a guest session may talk to the content API and builds
//! the client when it may.
//!
//! # Example
//!
//! ```rust
//! use gs_client::{ClientFactory, ClientGate, GraphqlClientFactory};
//! use gs_session::SessionState;
//!
//! let state = SessionState::new().with_guest("abc", "tok");
//! let decision = ClientGate::new().decide(&state, false);
//!
//! let args = decision.constructor_args().unwrap();
//! assert_eq!(args.endpoint, "https://graphql.contentful.com/content/v1/spaces/abc/");
//!
//! let client = GraphqlClientFactory::new().create(args).unwrap();
//! assert!(client.is_authenticated());
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod factory;
pub mod gate;

// Re-exports
pub use error::{ClientError, Result};
pub use factory::{ClientFactory, GraphqlClient, GraphqlClientFactory, GraphqlError, GraphqlResponse};
pub use gate::{ClientDecision, ClientGate, ConstructorArgs};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
