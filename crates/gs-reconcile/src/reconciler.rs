//! Guest session reconciliation
//!
//! A pass takes one immutable [`QueryParams`] snapshot and the current
//! [`SessionState`] and computes the next state plus a [`MutationLog`].
//!
//! # Rules
//! 1. Reset parameter present: unset every guest field, nothing else.
//! 2. Unrecognized parameters are skipped.
//! 3. Editorial: literal `true` / `false` only; other literals are skipped.
//! 4. Guest: written only when every required-guest parameter is present;
//!    an incomplete group leaves every guest field untouched.
//! 5. With a complete group, optional-guest fields whose parameter is absent
//!    are unset. A present but empty value is stored as given.
//!
//! Required-guest fields are never pruned outside of reset.

use crate::classify::{self, ParamCategory, EDITORIAL_KEYS, OPTIONAL_GUEST_KEYS, REQUIRED_GUEST_KEYS};
use crate::log::{Mutation, MutationLog, SkipReason};
use crate::query::QueryParams;
use gs_session::{FieldValue, SessionState, SessionStore, StateKey};

/// Default name of the reset parameter
pub const DEFAULT_RESET_PARAM: &str = "reset";

/// Result of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// State after the pass
    pub state: SessionState,
    /// Per-key outcomes in pass order
    pub log: MutationLog,
    /// Whether the pass took the reset branch
    pub reset: bool,
}

impl Reconciliation {
    /// Write every applied mutation to `store`, key by key
    ///
    /// Returns the number of writes.
    ///
    /// # Errors
    /// Stops at the first store write error.
    pub fn apply_to(&self, store: &dyn SessionStore) -> gs_session::Result<usize> {
        let mut writes = 0;
        for mutation in self.log.mutations() {
            mutation.apply_to(store)?;
            writes += 1;
        }
        Ok(writes)
    }

    /// Split into state and log
    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (SessionState, MutationLog) {
        (self.state, self.log)
    }
}

/// Reconciler of query parameters against session state
#[derive(Debug, Clone)]
pub struct Reconciler {
    reset_param: String,
}

impl Reconciler {
    /// Create reconciler using [`DEFAULT_RESET_PARAM`]
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With custom reset parameter name
    #[inline]
    #[must_use]
    pub fn with_reset_param(mut self, name: impl Into<String>) -> Self {
        self.reset_param = name.into();
        self
    }

    /// Name of the reset parameter
    #[inline]
    #[must_use]
    pub fn reset_param(&self) -> &str {
        &self.reset_param
    }

    /// Check if the reset signal is present (value ignored)
    #[inline]
    #[must_use]
    pub fn is_reset(&self, params: &QueryParams) -> bool {
        params.contains(&self.reset_param)
    }

    /// Run one pass
    ///
    /// Never fails; invalid or partial input becomes a skipped entry.
    #[must_use]
    pub fn reconcile(&self, params: &QueryParams, current: &SessionState) -> Reconciliation {
        let mut pass = Pass {
            state: current.clone(),
            log: MutationLog::new(),
        };

        if self.is_reset(params) {
            for key in REQUIRED_GUEST_KEYS.into_iter().chain(OPTIONAL_GUEST_KEYS) {
                pass.apply(key.as_str(), Mutation::unset(key));
            }
            tracing::info!(param = %self.reset_param, "reset signal present; guest session cleared");
            return pass.finish(true);
        }

        for (name, _) in params.iter() {
            if classify::classify(name) == ParamCategory::Unrecognized {
                pass.log.skipped(name, SkipReason::Unrecognized);
            }
        }

        for key in EDITORIAL_KEYS {
            if let Some(raw) = params.get(key.as_str()) {
                match parse_bool(raw) {
                    Some(b) => pass.apply(key.as_str(), Mutation::set(key, FieldValue::Bool(b))),
                    None => pass.log.skipped(key.as_str(), SkipReason::InvalidBoolean),
                }
            }
        }

        let missing: Vec<&str> = REQUIRED_GUEST_KEYS
            .iter()
            .map(StateKey::as_str)
            .filter(|name| !params.contains(name))
            .collect();
        let group_complete = missing.is_empty();

        for key in REQUIRED_GUEST_KEYS {
            if let Some(raw) = params.get(key.as_str()) {
                if group_complete {
                    pass.set_string(key, raw);
                } else {
                    pass.log.skipped(key.as_str(), SkipReason::IncompleteRequiredGroup);
                }
            }
        }

        for key in OPTIONAL_GUEST_KEYS {
            let raw = params.get(key.as_str());
            if !group_complete {
                if raw.is_some() {
                    pass.log.skipped(key.as_str(), SkipReason::IncompleteRequiredGroup);
                }
                continue;
            }
            match raw {
                None => pass.apply(key.as_str(), Mutation::unset(key)),
                Some(raw) => pass.set_string(key, raw),
            }
        }

        let guest_supplied = params
            .iter()
            .any(|(name, _)| classify::classify(name).is_guest());
        if guest_supplied && !group_complete {
            tracing::warn!(missing = ?missing, "incomplete guest parameters; guest fields left unchanged");
        }

        pass.finish(false)
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self {
            reset_param: DEFAULT_RESET_PARAM.to_string(),
        }
    }
}

/// Working state of a single pass
struct Pass {
    state: SessionState,
    log: MutationLog,
}

impl Pass {
    fn apply(&mut self, param: &str, mutation: Mutation) {
        // Mutations built here always match their key's kind.
        if let Err(e) = mutation.apply_to_state(&mut self.state) {
            tracing::error!(error = %e, "reconciler produced ill-typed mutation");
            return;
        }
        tracing::debug!(param, mutation = %mutation, "applied");
        self.log.applied(param, mutation);
    }

    fn set_string(&mut self, key: StateKey, raw: &str) {
        if let Some(value) = FieldValue::string_for(key, raw) {
            self.apply(key.as_str(), Mutation::set(key, value));
        }
    }

    fn finish(self, reset: bool) -> Reconciliation {
        tracing::info!(
            applied = self.log.applied_count(),
            skipped = self.log.skipped_count(),
            reset,
            "reconciliation pass complete"
        );
        Reconciliation {
            state: self.state,
            log: self.log,
            reset,
        }
    }
}

/// Tolerant boolean literal parsing
#[inline]
fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gs_session::{AccessToken, Domain, MemoryStore};
    use pretty_assertions::assert_eq;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs.iter().copied().collect()
    }

    fn full_state() -> SessionState {
        SessionState::new()
            .with_guest("abc", "tok1")
            .with_preview_token("ptok")
            .with_preview(true)
            .with_xray(true)
    }

    #[test]
    fn reset_clears_guest_and_keeps_editorial() {
        let result = Reconciler::new().reconcile(&params(&[("reset", "1")]), &full_state());

        assert!(result.reset);
        assert_eq!(
            result.state,
            SessionState::new().with_preview(true).with_xray(true)
        );
        assert_eq!(result.log.applied_count(), 3);
    }

    #[test]
    fn reset_short_circuits_other_params() {
        let query = params(&[
            ("reset", ""),
            ("space_id", "new"),
            ("delivery_token", "new"),
            ("xray", "false"),
        ]);
        let result = Reconciler::new().reconcile(&query, &full_state());

        assert_eq!(result.state.space_id, None);
        assert!(result.state.xray);
    }

    #[test]
    fn custom_reset_param() {
        let reconciler = Reconciler::new().with_reset_param("logout");
        let plain = reconciler.reconcile(&params(&[("reset", "1")]), &full_state());
        assert!(!plain.reset);
        assert!(plain.state.space_id.is_some());

        let custom = reconciler.reconcile(&params(&[("logout", "1")]), &full_state());
        assert!(custom.reset);
        assert!(!custom.state.has_any_guest());
    }

    #[test]
    fn boolean_coercion() {
        let r = Reconciler::new();
        let base = SessionState::new().with_xray(true);

        assert!(r.reconcile(&params(&[("preview", "true")]), &base).state.preview);
        assert!(!r.reconcile(&params(&[("xray", "false")]), &base).state.xray);

        let maybe = r.reconcile(&params(&[("preview", "maybe"), ("xray", "1")]), &base);
        assert_eq!(maybe.state, base);
        assert_eq!(maybe.log.skipped_count(), 2);
    }

    #[test]
    fn single_required_param_is_ignored() {
        let r = Reconciler::new();
        let prior = SessionState::new().with_guest("old", "old-tok");

        let only_space = r.reconcile(&params(&[("space_id", "new")]), &prior);
        assert_eq!(only_space.state.space_id.as_deref(), Some("old"));
        assert_eq!(
            only_space.log.skips().collect::<Vec<_>>(),
            vec![("space_id", SkipReason::IncompleteRequiredGroup)]
        );

        let only_token = r.reconcile(&params(&[("delivery_token", "new")]), &SessionState::new());
        assert_eq!(only_token.state.delivery_token, None);
        assert_eq!(only_token.state.space_id, None);
    }

    #[test]
    fn complete_group_is_written() {
        let query = params(&[("space_id", "abc"), ("delivery_token", "tok1"), ("preview_token", "ptok")]);
        let result = Reconciler::new().reconcile(&query, &SessionState::new());

        assert_eq!(result.state, SessionState::new().with_guest("abc", "tok1").with_preview_token("ptok"));
    }

    #[test]
    fn optional_without_group_is_skipped_not_written() {
        let result = Reconciler::new().reconcile(&params(&[("preview_token", "ptok")]), &SessionState::new());
        assert_eq!(result.state.preview_token, None);
        assert_eq!(
            result.log.skips().collect::<Vec<_>>(),
            vec![("preview_token", SkipReason::IncompleteRequiredGroup)]
        );
    }

    #[test]
    fn absent_optional_is_pruned_with_complete_group() {
        let query = params(&[("space_id", "abc"), ("delivery_token", "tok1"), ("preview", "true")]);
        let result = Reconciler::new().reconcile(&query, &full_state());

        assert_eq!(result.state.preview_token, None);
        assert_eq!(result.state.space_id.as_deref(), Some("abc"));
        assert_eq!(result.state.delivery_token, Some(AccessToken::new("tok1")));
    }

    #[test]
    fn incomplete_group_keeps_optional() {
        let r = Reconciler::new();

        let toggled = r.reconcile(&params(&[("preview", "true")]), &full_state());
        assert_eq!(toggled.state.preview_token, Some(AccessToken::new("ptok")));

        let navigated = r.reconcile(&QueryParams::new(), &full_state());
        assert_eq!(navigated.state, full_state());
        assert!(navigated.log.is_empty());

        // dropping a required param does not prune either
        let partial = r.reconcile(&params(&[("space_id", "abc")]), &full_state());
        assert_eq!(partial.state, full_state());
    }

    #[test]
    fn empty_optional_is_stored_as_given() {
        let query = params(&[("space_id", "abc"), ("delivery_token", "tok1"), ("preview_token", "")]);
        let result = Reconciler::new().reconcile(&query, &full_state());
        assert_eq!(result.state.preview_token, Some(AccessToken::new("")));
    }

    #[test]
    fn unrecognized_params_never_touch_state() {
        let query = params(&[("domain", "flinkly.com"), ("utm_source", "mail")]);
        let prior = SessionState::new().with_domain(Domain::ContentfulEu);
        let result = Reconciler::new().reconcile(&query, &prior);

        assert_eq!(result.state, prior);
        assert!(result.log.skips().all(|(_, reason)| reason == SkipReason::Unrecognized));
        assert_eq!(result.log.skips().count(), 2);
    }

    #[test]
    fn scenario_guest_with_preview() {
        let query = params(&[("space_id", "abc"), ("delivery_token", "tok1"), ("preview", "true")]);
        let result = Reconciler::new().reconcile(&query, &SessionState::new());

        assert_eq!(
            result.state,
            SessionState {
                preview: true,
                xray: false,
                domain: Domain::Contentful,
                space_id: Some("abc".into()),
                delivery_token: Some(AccessToken::new("tok1")),
                preview_token: None,
            }
        );
    }

    #[test]
    fn applying_log_to_store_matches_computed_state() {
        let prior = full_state();
        let store = MemoryStore::with_state(prior.clone());
        let query = params(&[("space_id", "xyz"), ("delivery_token", "tok2"), ("xray", "false")]);

        let result = Reconciler::new().reconcile(&query, &prior);
        let writes = result.apply_to(&store).unwrap();

        assert_eq!(writes, result.log.applied_count());
        assert_eq!(store.snapshot().unwrap(), result.state);
    }
}
