//! Per-key outcome log of a reconciliation pass

use gs_session::{FieldValue, SessionState, SessionStore, StateKey};
use std::fmt;

/// Single store write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    /// Target field
    pub key: StateKey,
    /// New value; `None` unsets the field
    pub value: Option<FieldValue>,
}

impl Mutation {
    /// Set `key` to `value`
    #[inline]
    #[must_use]
    pub fn set(key: StateKey, value: FieldValue) -> Self {
        Self {
            key,
            value: Some(value),
        }
    }

    /// Unset `key`
    #[inline]
    #[must_use]
    pub fn unset(key: StateKey) -> Self {
        Self { key, value: None }
    }

    /// Check if this mutation deletes the field
    #[inline]
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.value.is_none()
    }

    /// Write to a store
    ///
    /// # Errors
    /// Propagates the store's write error.
    pub fn apply_to(&self, store: &dyn SessionStore) -> gs_session::Result<()> {
        store.set(self.key, self.value.clone())
    }

    /// Write to an in-memory record
    ///
    /// # Errors
    /// [`gs_session::StoreError::TypeMismatch`] if the value does not fit the key.
    pub fn apply_to_state(&self, state: &mut SessionState) -> gs_session::Result<()> {
        state.set(self.key, self.value.clone())
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            None => write!(f, "unset {}", self.key),
            Some(FieldValue::Bool(b)) => write!(f, "set {}={b}", self.key),
            Some(FieldValue::Domain(d)) => write!(f, "set {}={d}", self.key),
            Some(FieldValue::Text(s)) => write!(f, "set {}={s}", self.key),
            Some(FieldValue::Token(_)) => write!(f, "set {}=***", self.key),
        }
    }
}

/// Why a parameter was not written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Name outside every recognized category
    Unrecognized,
    /// Editorial value other than the literals `true` / `false`
    InvalidBoolean,
    /// Guest parameter supplied without the full required group
    IncompleteRequiredGroup,
}

impl SkipReason {
    /// Short machine-readable name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Unrecognized => "unrecognized",
            SkipReason::InvalidBoolean => "invalid_boolean",
            SkipReason::IncompleteRequiredGroup => "incomplete_required_group",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result for one parameter or field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A mutation was written
    Applied(Mutation),
    /// Nothing was written
    Skipped(SkipReason),
}

/// Outcome tagged with the parameter name it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyOutcome {
    /// Parameter name (or field name for reset and pruning)
    pub param: String,
    /// What happened
    pub outcome: Outcome,
}

impl fmt::Display for KeyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Applied(m) => write!(f, "{m}"),
            Outcome::Skipped(reason) => write!(f, "skip {} ({reason})", self.param),
        }
    }
}

/// Ordered log of a reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationLog {
    entries: Vec<KeyOutcome>,
}

impl MutationLog {
    /// Create empty log
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an applied mutation
    pub fn applied(&mut self, param: impl Into<String>, mutation: Mutation) {
        self.entries.push(KeyOutcome {
            param: param.into(),
            outcome: Outcome::Applied(mutation),
        });
    }

    /// Record a skipped parameter
    pub fn skipped(&mut self, param: impl Into<String>, reason: SkipReason) {
        self.entries.push(KeyOutcome {
            param: param.into(),
            outcome: Outcome::Skipped(reason),
        });
    }

    /// All entries in pass order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &KeyOutcome> {
        self.entries.iter()
    }

    /// Applied mutations in pass order
    pub fn mutations(&self) -> impl Iterator<Item = &Mutation> {
        self.entries.iter().filter_map(|e| match &e.outcome {
            Outcome::Applied(m) => Some(m),
            Outcome::Skipped(_) => None,
        })
    }

    /// Skipped parameters with their reasons
    pub fn skips(&self) -> impl Iterator<Item = (&str, SkipReason)> {
        self.entries.iter().filter_map(|e| match e.outcome {
            Outcome::Skipped(reason) => Some((e.param.as_str(), reason)),
            Outcome::Applied(_) => None,
        })
    }

    /// Number of applied mutations
    #[must_use]
    pub fn applied_count(&self) -> usize {
        self.mutations().count()
    }

    /// Number of skipped parameters
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.skips().count()
    }

    /// Check if nothing was written
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.applied_count() == 0
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the log has no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a MutationLog {
    type Item = &'a KeyOutcome;
    type IntoIter = std::slice::Iter<'a, KeyOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
