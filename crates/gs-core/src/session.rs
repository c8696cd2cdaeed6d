//! Guest session
//!
//! Owns the session store and runs one reconcile-then-decide cycle per
//! query change:
//! 1. Snapshot the store
//! 2. Reconcile the query against the snapshot
//! 3. Write the applied mutations to the store, key by key
//! 4. Re-read the store and run the client gate
//! 5. Build the client when the gate allows it

use crate::config::SessionConfig;
use crate::error::Result;
use gs_client::{ClientDecision, ClientError, ClientFactory, ClientGate};
use gs_reconcile::{MutationLog, QueryParams, Reconciler};
use gs_session::{SessionState, SessionStore};

/// What the UI layer consumes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView<C> {
    /// Editorial preview toggle
    pub preview: bool,
    /// Debug-overlay toggle
    pub xray: bool,
    /// Client handle, present only for a complete guest session
    pub client: Option<C>,
}

impl<C> SessionView<C> {
    /// Check if a client is available
    #[inline]
    #[must_use]
    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }
}

/// Full result of one query-change event
#[derive(Debug)]
pub struct SessionUpdate<C> {
    /// UI-facing view
    pub view: SessionView<C>,
    /// Gate decision the view was derived from
    pub decision: ClientDecision,
    /// Per-key outcomes of the reconciliation pass
    pub log: MutationLog,
    /// Whether the pass took the reset branch
    pub reset: bool,
    /// Factory failure, if the gate allowed a client but it could not be built
    pub client_error: Option<ClientError>,
}

/// Session-scoped guest state with its reconciler and client gate
#[derive(Debug)]
pub struct GuestSession<S, F> {
    config: SessionConfig,
    store: S,
    factory: F,
    reconciler: Reconciler,
    gate: ClientGate,
    last_query: Option<QueryParams>,
}

impl<S, F> GuestSession<S, F>
where
    S: SessionStore,
    F: ClientFactory,
{
    /// Start a session, seeding store defaults if no record exists yet
    ///
    /// # Errors
    /// Store write failures while seeding.
    pub fn start(config: SessionConfig, store: S, factory: F) -> Result<Self> {
        let seeded = store.seed_defaults(config.default_domain)?;
        tracing::info!(
            storage_key = %config.storage_key,
            domain = %config.default_domain,
            seeded,
            "guest session started"
        );

        Ok(Self {
            reconciler: config.reconciler(),
            gate: ClientGate::new(),
            config,
            store,
            factory,
            last_query: None,
        })
    }

    /// Handle a query-change event
    ///
    /// # Errors
    /// Store read/write failures. Invalid parameters never produce errors.
    pub fn on_query_change(&mut self, params: &QueryParams) -> Result<SessionUpdate<F::Client>> {
        let current = self.store.snapshot()?;
        let reconciliation = self.reconciler.reconcile(params, &current);
        reconciliation.apply_to(&self.store)?;
        self.last_query = Some(params.clone());

        let state = self.store.snapshot()?;
        let decision = self.gate.decide(&state, reconciliation.reset);
        let (client, client_error) = self.build_client(&decision);

        Ok(SessionUpdate {
            view: SessionView {
                preview: decision.preview(),
                xray: decision.xray(),
                client,
            },
            decision,
            log: reconciliation.log,
            reset: reconciliation.reset,
            client_error,
        })
    }

    /// Handle a query observation, skipping the pass if nothing changed
    ///
    /// # Errors
    /// Same as [`GuestSession::on_query_change`].
    pub fn observe(&mut self, params: &QueryParams) -> Result<Option<SessionUpdate<F::Client>>> {
        if self.last_query.as_ref() == Some(params) {
            tracing::trace!("query unchanged; no reconciliation");
            return Ok(None);
        }
        self.on_query_change(params).map(Some)
    }

    /// Current view without reconciling
    ///
    /// The reset signal of the last observed query still forces the client
    /// to be unavailable.
    ///
    /// # Errors
    /// Store read failures.
    pub fn view(&self) -> Result<SessionView<F::Client>> {
        let decision = self.decision()?;
        let (client, _) = self.build_client(&decision);
        Ok(SessionView {
            preview: decision.preview(),
            xray: decision.xray(),
            client,
        })
    }

    /// Current gate decision from live state
    ///
    /// # Errors
    /// Store read failures.
    pub fn decision(&self) -> Result<ClientDecision> {
        let state = self.store.snapshot()?;
        let reset = self
            .last_query
            .as_ref()
            .is_some_and(|q| self.reconciler.is_reset(q));
        Ok(self.gate.decide(&state, reset))
    }

    /// Current persisted state
    ///
    /// # Errors
    /// Store read failures.
    pub fn state(&self) -> Result<SessionState> {
        Ok(self.store.snapshot()?)
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Client factory
    #[inline]
    #[must_use]
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// End the session, dropping the stored record
    ///
    /// # Errors
    /// Store write failures.
    pub fn end(self) -> Result<()> {
        self.store.clear()?;
        tracing::info!(storage_key = %self.config.storage_key, "guest session ended");
        Ok(())
    }

    fn build_client(&self, decision: &ClientDecision) -> (Option<F::Client>, Option<ClientError>) {
        let Some(args) = decision.constructor_args() else {
            return (None, None);
        };
        match self.factory.create(args) {
            Ok(client) => (Some(client), None),
            Err(e) => {
                tracing::warn!(error = %e, "guest client could not be built");
                (None, Some(e))
            }
        }
    }
}
