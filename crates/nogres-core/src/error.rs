//! Error types for the nogres test double.
//!
//! Setup mistakes (`Configuration`) are returned synchronously from the call
//! that made them. Everything else is a runtime query error and travels
//! through the `Outcome` of the operation or the caller's callback.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Result alias used across the nogres crates.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every failure the mock client or pool can report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A malformed setup call, e.g. a parameter constraint that is not a sequence.
    #[error("{0}")]
    Configuration(String),

    /// A query was issued before a successful connect.
    #[error("Attempted to query when client not connected")]
    NotConnected,

    /// No expectation was pending, or the statement did not match the pattern.
    #[error("Unexpected query \"{sql}\".{}", expected_suffix(.expected))]
    UnexpectedQuery {
        /// Statement text as submitted.
        sql: String,
        /// Description of the expected pattern, absent when the queue was empty.
        expected: Option<String>,
    },

    /// The submitted parameters did not match the expectation's constraint.
    #[error("Unexpected params for query \"{sql}\".\nExpected {expected}, got {actual}.")]
    UnexpectedParams {
        sql: String,
        /// Constraint rendered as JSON.
        expected: String,
        /// Submitted parameters rendered as JSON, or `nothing` when absent.
        actual: String,
    },

    /// `done()` was called while expectations were still pending.
    #[error("Unresolved expectations: {listing}")]
    UnresolvedExpectations {
        remaining: usize,
        /// Pretty-printed JSON listing of every pending expectation.
        listing: String,
    },

    /// An error value the caller registered, surfaced as-is.
    #[error(transparent)]
    Configured(#[from] ConfiguredError),
}

#[allow(clippy::ref_option)]
fn expected_suffix(expected: &Option<String>) -> String {
    expected
        .as_ref()
        .map(|e| format!("\nExpected {e}"))
        .unwrap_or_default()
}

impl Error {
    /// The caller-registered error, if this is one.
    pub fn configured(&self) -> Option<&ConfiguredError> {
        match self {
            Error::Configured(e) => Some(e),
            _ => None,
        }
    }

    /// True for errors raised by setup calls rather than by queries.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}

/// A caller-supplied error value, shared rather than copied.
///
/// Expectations and armed connect errors hold one of these. When it is
/// delivered the same allocation is handed back, so a test can check identity
/// with [`ConfiguredError::ptr_eq`] or recover its own type with
/// [`ConfiguredError::downcast_ref`].
#[derive(Debug, Clone)]
pub struct ConfiguredError {
    inner: Arc<dyn StdError + Send + Sync>,
}

impl ConfiguredError {
    /// Wrap an arbitrary error.
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(error),
        }
    }

    /// Wrap a plain message.
    pub fn message(message: impl Into<String>) -> Self {
        let boxed: Box<dyn StdError + Send + Sync> = message.into().into();
        Self {
            inner: Arc::from(boxed),
        }
    }

    /// True if both handles point at the same underlying error.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn get_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.inner
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }
}

impl fmt::Display for ConfiguredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner, f)
    }
}

impl StdError for ConfiguredError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source()
    }
}

impl From<&str> for ConfiguredError {
    fn from(message: &str) -> Self {
        Self::message(message)
    }
}

impl From<String> for ConfiguredError {
    fn from(message: String) -> Self {
        Self::message(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("disk on fire")]
    struct Custom;

    #[test]
    fn test_unexpected_query_messages() {
        let none = Error::UnexpectedQuery {
            sql: "SELECT 1".into(),
            expected: None,
        };
        assert_eq!(none.to_string(), "Unexpected query \"SELECT 1\".");

        let literal = Error::UnexpectedQuery {
            sql: "SELECT 1".into(),
            expected: Some("\"SELECT 2\"".into()),
        };
        assert_eq!(
            literal.to_string(),
            "Unexpected query \"SELECT 1\".\nExpected \"SELECT 2\""
        );
    }

    #[test]
    fn test_unexpected_params_message() {
        let err = Error::UnexpectedParams {
            sql: "X".into(),
            expected: "[1]".into(),
            actual: "[2]".into(),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected params for query \"X\".\nExpected [1], got [2]."
        );
    }

    #[test]
    fn test_configured_error_is_shared() {
        let original = ConfiguredError::new(Custom);
        let err: Error = original.clone().into();
        let surfaced = err.configured().unwrap();
        assert!(surfaced.ptr_eq(&original));
        assert!(surfaced.downcast_ref::<Custom>().is_some());
        assert_eq!(err.to_string(), "disk on fire");
    }

    #[test]
    fn test_distinct_messages_are_not_identical() {
        let a = ConfiguredError::from("boom");
        let b = ConfiguredError::from("boom");
        assert!(!a.ptr_eq(&b));
        assert_eq!(a.to_string(), b.to_string());
    }
}
