//! The client contract shared by the mock client and the mock pool.
//!
//! Code under test that is generic over [`Connection`] can be handed either a
//! real driver adapter or the nogres double without changes.

use std::future::Future;

use asupersync::{Cx, Outcome};

use crate::error::{Error, Result};
use crate::query::{Params, QueryResult, Statement};

/// An asynchronous database client.
pub trait Connection: Send + Sync {
    /// Establish the connection.
    fn connect(&self, cx: &Cx) -> impl Future<Output = Outcome<(), Error>> + Send;

    /// Run a statement and return its rows.
    fn query(
        &self,
        cx: &Cx,
        statement: Statement,
        params: Params,
    ) -> impl Future<Output = Outcome<QueryResult, Error>> + Send;
}

/// Convert a synchronous result into the `Outcome` an async operation resolves to.
pub fn settle<T>(result: Result<T>) -> Outcome<T, Error> {
    match result {
        Ok(value) => Outcome::Ok(value),
        Err(e) => Outcome::Err(e),
    }
}
