//! Client gate
//!
//! Decides from a session snapshot whether a downstream client may be
//! constructed. The decision is recomputed from live state on every call;
//! nothing is cached between calls.

use gs_session::{AccessToken, Domain, SessionState};
use url::Url;

/// Arguments handed to a [`ClientFactory`](crate::ClientFactory)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorArgs {
    /// GraphQL endpoint URL
    pub endpoint: String,
    /// Bearer credential; `None` when preview mode has no preview token
    pub token: Option<AccessToken>,
}

impl ConstructorArgs {
    /// Content API endpoint for a space on a host variant
    ///
    /// `space_id` is percent-encoded as a single path segment.
    #[must_use]
    pub fn endpoint_for(domain: Domain, space_id: &str) -> String {
        let base = format!("https://graphql.{domain}/content/v1/spaces/");
        let Ok(mut url) = Url::parse(&base) else {
            return base;
        };
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(space_id).push("");
        }
        url.into()
    }

    /// `Authorization` header value, if a token is present
    #[must_use]
    pub fn authorization(&self) -> Option<String> {
        self.token
            .as_ref()
            .map(|token| format!("Bearer {}", token.expose()))
    }

    /// Request headers in send order
    #[must_use]
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = Vec::with_capacity(2);
        if let Some(auth) = self.authorization() {
            headers.push(("Authorization", auth));
        }
        headers.push(("Content-Type", "application/json".to_string()));
        headers
    }
}

/// Outcome of the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientDecision {
    /// Guest credentials missing or reset in progress
    Unavailable {
        /// Editorial preview toggle
        preview: bool,
        /// Debug-overlay toggle
        xray: bool,
    },
    /// A client may be built from `args`
    Available {
        /// Editorial preview toggle
        preview: bool,
        /// Debug-overlay toggle
        xray: bool,
        /// Client constructor arguments
        args: ConstructorArgs,
    },
}

impl ClientDecision {
    /// Editorial preview toggle
    #[inline]
    #[must_use]
    pub fn preview(&self) -> bool {
        match self {
            ClientDecision::Unavailable { preview, .. } | ClientDecision::Available { preview, .. } => *preview,
        }
    }

    /// Debug-overlay toggle
    #[inline]
    #[must_use]
    pub fn xray(&self) -> bool {
        match self {
            ClientDecision::Unavailable { xray, .. } | ClientDecision::Available { xray, .. } => *xray,
        }
    }

    /// Check if a client may be built
    #[inline]
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, ClientDecision::Available { .. })
    }

    /// Constructor arguments when available
    #[inline]
    #[must_use]
    pub fn constructor_args(&self) -> Option<&ConstructorArgs> {
        match self {
            ClientDecision::Available { args, .. } => Some(args),
            ClientDecision::Unavailable { .. } => None,
        }
    }
}

/// Pure decision function over session state
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientGate;

impl ClientGate {
    /// Create gate
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Decide client availability
    ///
    /// `reset_present` is whether the reset signal is in the current query.
    /// The credential is `preview_token` in preview mode, `delivery_token`
    /// otherwise; a missing preview token still yields `Available`.
    #[must_use]
    pub fn decide(&self, state: &SessionState, reset_present: bool) -> ClientDecision {
        let SessionState { preview, xray, .. } = *state;

        if reset_present || !state.has_required_guest() {
            tracing::debug!(reset_present, "client unavailable");
            return ClientDecision::Unavailable { preview, xray };
        }

        let Some(space_id) = state.space_id.as_deref() else {
            return ClientDecision::Unavailable { preview, xray };
        };

        let token = if preview {
            state.preview_token.clone()
        } else {
            state.delivery_token.clone()
        };

        if token.is_none() {
            tracing::debug!("preview mode without preview token; client has no credential");
        }

        ClientDecision::Available {
            preview,
            xray,
            args: ConstructorArgs {
                endpoint: ConstructorArgs::endpoint_for(state.domain, space_id),
                token,
            },
        }
    }
}
