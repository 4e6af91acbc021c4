//! Core types and traits for nogres.
//!
//! `nogres-core` is the **foundation layer** of the workspace. It defines the
//! data types the mock client trades in and the contract it shares with real
//! drivers.
//!
//! # Role In The Architecture
//!
//! - **Contract layer**: `Connection` is implemented by both `MockClient`
//!   (`nogres-client`) and `MockPool` (`nogres-pool`).
//! - **Data model**: `Value`, `Row`, `Statement`, `Params` and `QueryResult`
//!   describe query inputs and outputs.
//! - **Errors**: `Error` is the full failure taxonomy; `ConfiguredError` carries
//!   caller-registered errors back out unchanged.
//! - **Structured concurrency**: re-exports `Cx` and `Outcome` from asupersync so
//!   every operation has the same shape as a real async driver call.
//!
//! Most users should depend on the `nogres` facade instead.

// Re-export asupersync primitives for structured concurrency
pub use asupersync::{Cx, Outcome};

pub mod connection;
pub mod error;
pub mod query;
pub mod row;
pub mod value;

pub use connection::{Connection, settle};
pub use error::{ConfiguredError, Error, Result};
pub use query::{BoundQuery, Params, QueryConfig, QueryResult, Statement};
pub use row::Row;
pub use value::Value;
