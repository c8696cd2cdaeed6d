//! Output rendering for the CLI
//!
//! Tokens never reach the output; only whether a credential is present.

use gs_client::GraphqlClient;
use gs_core::SessionUpdate;
use gs_reconcile::MutationLog;
use gs_session::SessionState;
use serde_json::{json, Value};
use std::fmt::Write as _;

/// Printable summary of a client handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClientSummary {
    pub(crate) endpoint: String,
    pub(crate) authenticated: bool,
}

impl From<&GraphqlClient> for ClientSummary {
    fn from(client: &GraphqlClient) -> Self {
        Self {
            endpoint: client.endpoint().to_string(),
            authenticated: client.is_authenticated(),
        }
    }
}

/// Printable summary of one reconciliation event
#[derive(Debug, Clone)]
pub(crate) struct UpdateSummary {
    pub(crate) preview: bool,
    pub(crate) xray: bool,
    pub(crate) reset: bool,
    pub(crate) client: Option<ClientSummary>,
    pub(crate) client_error: Option<String>,
    pub(crate) log: Vec<String>,
}

impl UpdateSummary {
    pub(crate) fn new(update: &SessionUpdate<GraphqlClient>) -> Self {
        Self {
            preview: update.view.preview,
            xray: update.view.xray,
            reset: update.reset,
            client: update.view.client.as_ref().map(ClientSummary::from),
            client_error: update.client_error.as_ref().map(ToString::to_string),
            log: log_lines(&update.log),
        }
    }

    pub(crate) fn to_json(&self) -> Value {
        json!({
            "preview": self.preview,
            "xray": self.xray,
            "reset": self.reset,
            "client": self.client.as_ref().map(|c| json!({
                "endpoint": c.endpoint,
                "authenticated": c.authenticated,
            })),
            "client_error": self.client_error,
            "log": self.log,
        })
    }

    pub(crate) fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "preview: {}", self.preview);
        let _ = writeln!(out, "xray:    {}", self.xray);
        match (&self.client, &self.client_error) {
            (Some(c), _) => {
                let _ = writeln!(out, "client:  {} ({})", c.endpoint, if c.authenticated { "authenticated" } else { "no credential" });
            }
            (None, Some(e)) => {
                let _ = writeln!(out, "client:  unavailable ({e})");
            }
            (None, None) => {
                let _ = writeln!(out, "client:  unavailable");
            }
        }
        if self.reset {
            let _ = writeln!(out, "reset:   guest session cleared");
        }
        for line in &self.log {
            let _ = writeln!(out, "  {line}");
        }
        out
    }
}

pub(crate) fn log_lines(log: &MutationLog) -> Vec<String> {
    log.iter().map(ToString::to_string).collect()
}

/// Persisted state with tokens masked
pub(crate) fn state_json(state: &SessionState) -> Value {
    serde_json::to_value(state.redacted()).unwrap_or(Value::Null)
}

pub(crate) fn state_text(state: &SessionState) -> String {
    let redacted = state.redacted();
    let mut out = String::new();
    let _ = writeln!(out, "preview:        {}", redacted.preview);
    let _ = writeln!(out, "xray:           {}", redacted.xray);
    let _ = writeln!(out, "domain:         {}", redacted.domain);
    let show = |v: Option<&str>| v.unwrap_or("-").to_string();
    let _ = writeln!(out, "space_id:       {}", show(redacted.space_id.as_deref()));
    let _ = writeln!(out, "delivery_token: {}", show(redacted.delivery_token.as_ref().map(|t| t.expose())));
    let _ = writeln!(out, "preview_token:  {}", show(redacted.preview_token.as_ref().map(|t| t.expose())));
    out
}
