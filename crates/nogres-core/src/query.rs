//! Statement inputs and query results.
//!
//! Drivers accept a statement either as bare text plus a separate parameter
//! list, or as a config record carrying both. [`Statement::bind`] folds both
//! shapes into one [`BoundQuery`] before any matching happens.

use crate::row::Row;
use crate::value::Value;

/// A statement with its parameters attached, in a single record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryConfig {
    /// Statement text.
    pub text: String,
    /// Parameters. When present they take precedence over positional params.
    pub values: Option<Vec<Value>>,
}

impl QueryConfig {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            values: None,
        }
    }

    /// Attach parameter values.
    pub fn values<I, T>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }
}

/// The two calling conventions for a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Bare statement text; parameters come from the positional argument.
    Text(String),
    /// A `{ text, values }` record.
    Config(QueryConfig),
}

impl Statement {
    /// Statement text regardless of shape.
    pub fn text(&self) -> &str {
        match self {
            Statement::Text(text) => text,
            Statement::Config(config) => &config.text,
        }
    }

    /// Normalize with the positional parameters.
    ///
    /// A config record's `values` win over `params` when both are present.
    pub fn bind(self, params: Params) -> BoundQuery {
        match self {
            Statement::Text(text) => BoundQuery {
                text,
                params: params.into_inner(),
            },
            Statement::Config(QueryConfig { text, values }) => BoundQuery {
                text,
                params: values.or_else(|| params.into_inner()),
            },
        }
    }
}

impl From<&str> for Statement {
    fn from(text: &str) -> Self {
        Statement::Text(text.to_string())
    }
}

impl From<String> for Statement {
    fn from(text: String) -> Self {
        Statement::Text(text)
    }
}

impl From<&String> for Statement {
    fn from(text: &String) -> Self {
        Statement::Text(text.clone())
    }
}

impl From<QueryConfig> for Statement {
    fn from(config: QueryConfig) -> Self {
        Statement::Config(config)
    }
}

/// Positional parameters for a query.
///
/// Absent parameters (`Params::none()`) are not the same as an empty list
/// (`Params::empty()`); expectations tell the two apart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Params(Option<Vec<Value>>);

impl Params {
    /// No parameters supplied at all.
    pub fn none() -> Self {
        Self(None)
    }

    /// An explicit, empty parameter list.
    pub fn empty() -> Self {
        Self(Some(Vec::new()))
    }

    pub fn as_slice(&self) -> Option<&[Value]> {
        self.0.as_deref()
    }

    pub fn into_inner(self) -> Option<Vec<Value>> {
        self.0
    }
}

impl<T: Into<Value>> From<Vec<T>> for Params {
    fn from(values: Vec<T>) -> Self {
        Self(Some(values.into_iter().map(Into::into).collect()))
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Params {
    fn from(values: [T; N]) -> Self {
        Self(Some(values.into_iter().map(Into::into).collect()))
    }
}

impl From<&[Value]> for Params {
    fn from(values: &[Value]) -> Self {
        Self(Some(values.to_vec()))
    }
}

impl<T: Into<Value>> From<Option<Vec<T>>> for Params {
    fn from(values: Option<Vec<T>>) -> Self {
        values.map_or_else(Self::none, Self::from)
    }
}

/// A statement normalized to its text and (possibly absent) parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundQuery {
    pub text: String,
    pub params: Option<Vec<Value>>,
}

/// Result of a successful query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryResult {
    /// Returned rows.
    pub rows: Vec<Row>,
    /// Always `rows.len()`.
    pub row_count: usize,
}

impl QueryResult {
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let row_count = rows.len();
        Self { rows, row_count }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
