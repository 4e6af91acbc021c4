//! Expectation-matching mock client for nogres.
//!
//! Register the queries you expect, in order, then run the code under test
//! against [`MockClient`]. Each query is checked against the next pending
//! expectation and answered with its canned rows or error; `done()` verifies
//! nothing was left unconsumed.
//!
//! # Modules
//!
//! - [`expectation`]: `Pattern`, `Returns`, `Expectation` and parameter constraints
//! - [`store`]: the FIFO expectation queue
//! - [`matching`]: statement and deep parameter matching
//! - [`client`]: the `MockClient` itself
//! - [`events`]: notification / notice listener passthrough
//! - [`config`]: `MockConfig`

use std::sync::{Mutex, MutexGuard, PoisonError};

pub mod client;
pub mod config;
pub mod events;
pub mod expectation;
pub mod matching;
pub mod store;

pub use client::MockClient;
pub use config::MockConfig;
pub use events::{ClientEvent, EventEmitter, EventKind, ListenerId, Notification};
pub use expectation::{
    AnyParams, Expectation, ExpectationHandle, IntoParamConstraint, Pattern, Returns,
};
pub use store::ExpectationStore;

/// Lock a mutex, recovering the data if a panicking test poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
