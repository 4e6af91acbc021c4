//! nogres: a deterministic test double for asynchronous database clients.
//!
//! Register the queries your code is expected to run, in order, with their
//! parameters and canned results. Then run the code against a [`MockClient`]
//! or [`MockPool`] in place of the real driver. Every query is checked against
//! the next expectation; mismatches fail with a descriptive [`Error`], and
//! [`MockClient::done`] reports anything left unconsumed.
//!
//! # Example
//!
//! ```ignore
//! use nogres::prelude::*;
//!
//! async fn fetch_customer<C: Connection>(cx: &Cx, db: &C, id: i64) -> Option<String> {
//!     let statement = Statement::from("SELECT firstname, lastname FROM customer WHERE id = $1");
//!     let Outcome::Ok(result) = db.query(cx, statement, Params::from([id])).await else {
//!         return None;
//!     };
//!     let row = result.rows.first()?;
//!     Some(format!("{} {}", row.get("firstname")?.as_str()?, row.get("lastname")?.as_str()?))
//! }
//!
//! let client = MockClient::new();
//! client.expect_with(
//!     Pattern::regex(r"(?i)SELECT firstname, lastname FROM customer WHERE id = \$1")?,
//!     [2_i64],
//!     Row::from_pairs([("firstname", "Jayne"), ("lastname", "Cobb")]),
//! )?;
//! client.connect(&cx).await;
//! assert_eq!(fetch_customer(&cx, &client, 2).await.as_deref(), Some("Jayne Cobb"));
//! client.done()?;
//! ```
//!
//! # Crates
//!
//! - `nogres-core`: values, rows, statements, errors, the `Connection` trait
//! - `nogres-client`: expectations, matching and `MockClient`
//! - `nogres-pool`: `MockPool`

pub use nogres_client::{
    AnyParams, ClientEvent, EventEmitter, EventKind, Expectation, ExpectationHandle,
    ExpectationStore, IntoParamConstraint, ListenerId, MockClient, MockConfig, Notification,
    Pattern, Returns, matching,
};
pub use nogres_core::{
    BoundQuery, ConfiguredError, Connection, Cx, Error, Outcome, Params, QueryConfig,
    QueryResult, Result, Row, Statement, Value,
};
pub use nogres_pool::MockPool;

/// Everything needed to write a test against the double.
pub mod prelude {
    pub use crate::{
        AnyParams, ClientEvent, ConfiguredError, Connection, Cx, Error, EventKind, ListenerId,
        MockClient, MockConfig, MockPool, Notification, Outcome, Params, Pattern, QueryConfig,
        QueryResult, Returns, Row, Statement, Value,
    };
}
