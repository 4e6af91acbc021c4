//! Pool-shaped facade for nogres.
//!
//! A real pool hands out connections from a set; `MockPool` owns exactly one
//! [`MockClient`] for its whole life and forwards every call to it. Code that
//! takes a pool can therefore be tested with the same expectations as code
//! that takes a client.
//!
//! # Example
//!
//! ```ignore
//! let pool = MockPool::new();
//! pool.expect("SELECT 1", AnyParams)?;
//!
//! // Like a real pool, `query` connects the client first.
//! let result = pool.query(&cx, "SELECT 1", Params::none()).await;
//! pool.done()?;
//! pool.end_with(|| ());
//! ```

use std::future::{self, Future};

use asupersync::{Cx, Outcome};
use nogres_client::{
    ExpectationHandle, IntoParamConstraint, MockClient, MockConfig, Pattern, Returns,
};
use nogres_core::{
    BoundQuery, ConfiguredError, Connection, Error, Params, QueryResult, Result, Statement, settle,
};

/// A connection pool double backed by a single mock client.
#[derive(Debug, Default)]
pub struct MockPool {
    client: MockClient,
}

impl MockPool {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            client: MockClient::with_config(config),
        }
    }

    /// The single client every call is forwarded to.
    pub fn client(&self) -> &MockClient {
        &self.client
    }

    pub fn connect(&self, cx: &Cx) -> impl Future<Output = Outcome<(), Error>> + Send {
        self.client.connect(cx)
    }

    pub fn connect_with<F, R>(&self, cx: &Cx, callback: F) -> impl Future<Output = R>
    where
        F: FnOnce(Result<()>) -> R,
    {
        self.client.connect_with(cx, callback)
    }

    /// Run a statement on the pool's client, connecting it first if configured to.
    pub fn query<S, P>(
        &self,
        _cx: &Cx,
        statement: S,
        params: P,
    ) -> impl Future<Output = Outcome<QueryResult, Error>> + Send
    where
        S: Into<Statement>,
        P: Into<Params>,
    {
        future::ready(settle(
            self.checkout_and_query(statement.into().bind(params.into())),
        ))
    }

    pub fn query_with<S, P, F, R>(
        &self,
        _cx: &Cx,
        statement: S,
        params: P,
        callback: F,
    ) -> impl Future<Output = R>
    where
        S: Into<Statement>,
        P: Into<Params>,
        F: FnOnce(Result<QueryResult>) -> R,
    {
        future::ready(callback(
            self.checkout_and_query(statement.into().bind(params.into())),
        ))
    }

    pub fn expect<P, C>(&self, pattern: P, params: C) -> Result<ExpectationHandle>
    where
        P: Into<Pattern>,
        C: IntoParamConstraint,
    {
        self.client.expect(pattern, params)
    }

    pub fn expect_with<P, C, R>(&self, pattern: P, params: C, returns: R) -> Result<ExpectationHandle>
    where
        P: Into<Pattern>,
        C: IntoParamConstraint,
        R: Into<Returns>,
    {
        self.client.expect_with(pattern, params, returns)
    }

    pub fn error_on_connect(&self, error: impl Into<ConfiguredError>) {
        self.client.error_on_connect(error);
    }

    pub fn done(&self) -> Result<()> {
        self.client.done()
    }

    pub fn reset(&self) {
        self.client.reset();
    }

    pub fn expectations(&self) -> Vec<ExpectationHandle> {
        self.client.expectations()
    }

    pub fn expectation_count(&self) -> usize {
        self.client.expectation_count()
    }

    /// Shut the pool down. There is nothing to release, so this always succeeds.
    pub fn end(&self, _cx: &Cx) -> impl Future<Output = Outcome<(), Error>> + Send {
        future::ready(Outcome::Ok(()))
    }

    /// Shut the pool down, invoking `callback` immediately.
    pub fn end_with<F, R>(&self, callback: F) -> R
    where
        F: FnOnce() -> R,
    {
        tracing::debug!("Mock pool ended");
        callback()
    }

    fn checkout_and_query(&self, query: BoundQuery) -> Result<QueryResult> {
        if self.client.config().pool_connects_on_query {
            self.client.resolve_connect()?;
        }
        self.client.resolve_query(query)
    }
}

impl Connection for MockPool {
    fn connect(&self, _cx: &Cx) -> impl Future<Output = Outcome<(), Error>> + Send {
        future::ready(settle(self.client.resolve_connect()))
    }

    fn query(
        &self,
        _cx: &Cx,
        statement: Statement,
        params: Params,
    ) -> impl Future<Output = Outcome<QueryResult, Error>> + Send {
        future::ready(settle(self.checkout_and_query(statement.bind(params))))
    }
}
