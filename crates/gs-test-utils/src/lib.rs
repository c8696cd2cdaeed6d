//! Testing utilities for the guest session workspace
//!
//! Shared fixtures, a recording client factory and a store that fails on demand.

#![allow(missing_docs)]

use gs_client::{ClientError, ClientFactory, ConstructorArgs};
use gs_reconcile::QueryParams;
use gs_session::{Domain, FieldValue, MemoryStore, SessionState, SessionStore, StateKey, StoreError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

pub const SPACE_ID: &str = "abc";
pub const DELIVERY_TOKEN: &str = "tok1";
pub const PREVIEW_TOKEN: &str = "ptok";

pub fn query(pairs: &[(&str, &str)]) -> QueryParams {
    pairs.iter().copied().collect()
}

pub fn guest_query() -> QueryParams {
    query(&[("space_id", SPACE_ID), ("delivery_token", DELIVERY_TOKEN)])
}

pub fn full_guest_query() -> QueryParams {
    guest_query().with("preview_token", PREVIEW_TOKEN)
}

pub fn full_guest_state() -> SessionState {
    SessionState::new()
        .with_guest(SPACE_ID, DELIVERY_TOKEN)
        .with_preview_token(PREVIEW_TOKEN)
        .with_preview(true)
        .with_xray(true)
}

/// Client stand-in: the constructor arguments it was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubClient {
    pub args: ConstructorArgs,
}

/// Factory recording every construction
#[derive(Debug, Default)]
pub struct RecordingFactory {
    created: Mutex<Vec<ConstructorArgs>>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> Vec<ConstructorArgs> {
        self.created.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.created.lock().len()
    }
}

impl ClientFactory for RecordingFactory {
    type Client = StubClient;

    fn create(&self, args: &ConstructorArgs) -> Result<StubClient, ClientError> {
        self.created.lock().push(args.clone());
        Ok(StubClient { args: args.clone() })
    }
}

/// Memory store whose writes can be made to fail
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::io_error(
                "flaky-store",
                std::io::Error::new(std::io::ErrorKind::Other, "write refused"),
            ));
        }
        Ok(())
    }
}

impl SessionStore for FlakyStore {
    fn snapshot(&self) -> Result<SessionState, StoreError> {
        self.inner.snapshot()
    }

    fn set(&self, key: StateKey, value: Option<FieldValue>) -> Result<(), StoreError> {
        self.check()?;
        self.inner.set(key, value)
    }

    fn seed_defaults(&self, domain: Domain) -> Result<bool, StoreError> {
        self.check()?;
        self.inner.seed_defaults(domain)
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.check()?;
        self.inner.clear()
    }
}
