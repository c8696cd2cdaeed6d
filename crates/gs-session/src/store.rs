//! Session store contract and in-memory adapter
//!
//! A store holds one [`SessionState`] record for the lifetime of a session.
//! Reads and writes are synchronous; writing `None` deletes a field.

use crate::error::Result;
use crate::state::{Domain, FieldValue, SessionState, StateKey};
use parking_lot::RwLock;
use std::fmt::Debug;
use std::sync::Arc;

/// Session-scoped key-value state container
///
/// Implementations must keep the record alive across view transitions
/// within one session; surviving a process restart is optional.
pub trait SessionStore: Send + Sync + Debug {
    /// Current record, or the default record if nothing was seeded yet
    ///
    /// # Errors
    /// Adapter-specific read failures.
    fn snapshot(&self) -> Result<SessionState>;

    /// Read a single field
    ///
    /// # Errors
    /// Adapter-specific read failures.
    fn get(&self, key: StateKey) -> Result<Option<FieldValue>> {
        Ok(self.snapshot()?.get(key))
    }

    /// Write a single field; `None` deletes it
    ///
    /// # Errors
    /// Type mismatch for the key, or adapter-specific write failures.
    fn set(&self, key: StateKey, value: Option<FieldValue>) -> Result<()>;

    /// Seed `preview=false`, `xray=false` and `domain` if no record exists
    ///
    /// Returns `true` when the record was created by this call.
    ///
    /// # Errors
    /// Adapter-specific write failures.
    fn seed_defaults(&self, domain: Domain) -> Result<bool>;

    /// Drop the whole record (session end)
    ///
    /// # Errors
    /// Adapter-specific write failures.
    fn clear(&self) -> Result<()>;
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn snapshot(&self) -> Result<SessionState> {
        (**self).snapshot()
    }

    fn get(&self, key: StateKey) -> Result<Option<FieldValue>> {
        (**self).get(key)
    }

    fn set(&self, key: StateKey, value: Option<FieldValue>) -> Result<()> {
        (**self).set(key, value)
    }

    fn seed_defaults(&self, domain: Domain) -> Result<bool> {
        (**self).seed_defaults(domain)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: RwLock<Option<SessionState>>,
}

impl MemoryStore {
    /// Create empty (unseeded) store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create store already holding `state`
    #[inline]
    #[must_use]
    pub fn with_state(state: SessionState) -> Self {
        Self {
            record: RwLock::new(Some(state)),
        }
    }

    /// Check if a record exists
    #[inline]
    #[must_use]
    pub fn is_seeded(&self) -> bool {
        self.record.read().is_some()
    }
}

impl SessionStore for MemoryStore {
    fn snapshot(&self) -> Result<SessionState> {
        Ok(self.record.read().clone().unwrap_or_default())
    }

    fn set(&self, key: StateKey, value: Option<FieldValue>) -> Result<()> {
        let mut record = self.record.write();
        record.get_or_insert_with(SessionState::default).set(key, value)
    }

    fn seed_defaults(&self, domain: Domain) -> Result<bool> {
        let mut record = self.record.write();
        if record.is_some() {
            return Ok(false);
        }
        *record = Some(SessionState::new().with_domain(domain));
        Ok(true)
    }

    fn clear(&self) -> Result<()> {
        *self.record.write() = None;
        Ok(())
    }
}
