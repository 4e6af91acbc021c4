//! The expectation-matching mock client.
//!
//! `MockClient` has the shape of an async database client: `connect`,
//! `query`, event listeners. Instead of talking to a server it pops the next
//! registered expectation for every query and answers with that
//! expectation's canned rows or error.
//!
//! Every operation comes in two flavors:
//!
//! - `connect` / `query` return a future resolving to an `Outcome`.
//! - `connect_with` / `query_with` hand the result to a callback and return a
//!   future resolving to whatever the callback returned. Errors go to the
//!   callback, never into the future.
//!
//! In both cases the outcome is decided when the method is called; the future
//! is already complete.
//!
//! # Example
//!
//! ```ignore
//! let client = MockClient::new();
//! client.expect_with(
//!     Pattern::regex("(?i)^SELECT")?,
//!     [2],
//!     Row::from_pairs([("firstname", "Jayne"), ("lastname", "Cobb")]),
//! )?;
//!
//! client.connect(&cx).await;
//! let result = client.query(&cx, "SELECT firstname, lastname FROM customer WHERE id = $1", [2]).await;
//! client.done()?;
//! ```

use std::future::{self, Future};
use std::sync::Mutex;

use asupersync::{Cx, Outcome};
use nogres_core::{
    BoundQuery, ConfiguredError, Connection, Error, Params, QueryResult, Result, Statement, settle,
};

use crate::config::MockConfig;
use crate::events::{ClientEvent, EventEmitter, EventKind, ListenerId, Notification};
use crate::expectation::{ExpectationHandle, IntoParamConstraint, Pattern, Returns};
use crate::lock;
use crate::matching;
use crate::store::ExpectationStore;

#[derive(Debug)]
struct ClientState {
    connected: bool,
    connect_error: Option<ConfiguredError>,
    store: ExpectationStore,
}

/// A database client double driven by registered expectations.
#[derive(Debug)]
pub struct MockClient {
    // One lock guards connection state and the queue. A query holds it from
    // dequeue through response, so concurrent callers on the same client can
    // never interleave steps of a match.
    state: Mutex<ClientState>,
    events: EventEmitter,
    config: MockConfig,
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClient {
    /// Create a disconnected client with no expectations.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        let state = ClientState {
            connected: config.start_connected,
            connect_error: config.connect_error.clone(),
            store: ExpectationStore::new(),
        };
        Self {
            state: Mutex::new(state),
            events: EventEmitter::new(),
            config,
        }
    }

    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    // ==================== Driver-shaped operations ====================

    /// Connect, or fail with the armed connect error.
    pub fn connect(&self, _cx: &Cx) -> impl Future<Output = Outcome<(), Error>> + Send {
        future::ready(settle(self.resolve_connect()))
    }

    /// Connect and pass the result to `callback`.
    pub fn connect_with<F, R>(&self, _cx: &Cx, callback: F) -> impl Future<Output = R>
    where
        F: FnOnce(Result<()>) -> R,
    {
        future::ready(callback(self.resolve_connect()))
    }

    /// Run a statement against the next expectation.
    ///
    /// `statement` is either bare text (parameters from `params`) or a
    /// [`QueryConfig`](nogres_core::QueryConfig) whose `values` take precedence.
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
            self.resolve_query(statement.into().bind(params.into())),
        ))
    }

    /// Run a statement and pass the result to `callback`.
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
            self.resolve_query(statement.into().bind(params.into())),
        ))
    }

    /// Close the client: it becomes disconnected and an `End` event is emitted.
    pub fn end(&self, _cx: &Cx) -> impl Future<Output = Outcome<(), Error>> + Send {
        lock(&self.state).connected = false;
        tracing::debug!("Mock client ended");
        self.events.emit(&ClientEvent::End);
        future::ready(Outcome::Ok(()))
    }

    /// Synchronous core of `connect`.
    pub fn resolve_connect(&self) -> Result<()> {
        let mut state = lock(&self.state);
        if let Some(error) = state.connect_error.clone() {
            state.connected = false;
            tracing::warn!(%error, "Connect failed with configured error");
            return Err(Error::Configured(error));
        }
        if !state.connected {
            tracing::debug!("Mock client connected");
        }
        state.connected = true;
        Ok(())
    }

    /// Synchronous core of `query`: dequeue, match, respond.
    #[tracing::instrument(level = "debug", skip_all, fields(sql = %query.text))]
    pub fn resolve_query(&self, query: BoundQuery) -> Result<QueryResult> {
        let mut state = lock(&self.state);
        if !state.connected {
            tracing::warn!("Query issued before connect");
            return Err(Error::NotConnected);
        }

        let Some(expectation) = state.store.dequeue_next() else {
            tracing::warn!("Query issued with no pending expectation");
            return Err(Error::UnexpectedQuery {
                sql: query.text,
                expected: None,
            });
        };

        matching::evaluate(&expectation, query)
    }

    // ==================== Mock configuration ====================

    /// Register an expectation that succeeds with no rows.
    pub fn expect<P, C>(&self, pattern: P, params: C) -> Result<ExpectationHandle>
    where
        P: Into<Pattern>,
        C: IntoParamConstraint,
    {
        self.expect_with(pattern, params, Returns::empty())
    }

    /// Register an expectation with explicit rows or an error to return.
    ///
    /// Fails immediately with `Error::Configuration` if `params` is neither
    /// absent nor a sequence.
    pub fn expect_with<P, C, R>(&self, pattern: P, params: C, returns: R) -> Result<ExpectationHandle>
    where
        P: Into<Pattern>,
        C: IntoParamConstraint,
        R: Into<Returns>,
    {
        lock(&self.state)
            .store
            .enqueue(pattern.into(), params, returns.into())
    }

    /// Make every following `connect` fail with `error`.
    pub fn error_on_connect(&self, error: impl Into<ConfiguredError>) {
        lock(&self.state).connect_error = Some(error.into());
    }

    pub fn clear_connect_error(&self) {
        lock(&self.state).connect_error = None;
    }

    /// Fail unless every expectation has been consumed.
    pub fn done(&self) -> Result<()> {
        lock(&self.state).store.assert_drained()
    }

    /// Drop all pending expectations.
    pub fn reset(&self) {
        let discarded = lock(&self.state).store.clear();
        tracing::debug!(discarded, "Reset expectations");
    }

    pub fn is_connected(&self) -> bool {
        lock(&self.state).connected
    }

    /// Pending expectations, head first.
    pub fn expectations(&self) -> Vec<ExpectationHandle> {
        lock(&self.state).store.snapshot()
    }

    pub fn expectation_count(&self) -> usize {
        lock(&self.state).store.count()
    }

    // ==================== Events ====================

    pub fn events(&self) -> &EventEmitter {
        &self.events
    }

    pub fn on<F>(&self, kind: EventKind, handler: F) -> ListenerId
    where
        F: FnMut(&ClientEvent) + Send + 'static,
    {
        self.events.on(kind, handler)
    }

    pub fn once<F>(&self, kind: EventKind, handler: F) -> ListenerId
    where
        F: FnMut(&ClientEvent) + Send + 'static,
    {
        self.events.once(kind, handler)
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    pub fn emit(&self, event: impl Into<ClientEvent>) -> bool {
        self.events.emit(&event.into())
    }

    /// Simulate a `NOTIFY` on `channel`.
    pub fn notify(&self, channel: impl Into<String>, payload: impl Into<String>) -> bool {
        self.emit(Notification::new(channel, payload))
    }
}

impl Connection for MockClient {
    fn connect(&self, _cx: &Cx) -> impl Future<Output = Outcome<(), Error>> + Send {
        future::ready(settle(self.resolve_connect()))
    }

    fn query(
        &self,
        _cx: &Cx,
        statement: Statement,
        params: Params,
    ) -> impl Future<Output = Outcome<QueryResult, Error>> + Send {
        future::ready(settle(self.resolve_query(statement.bind(params))))
    }
}
