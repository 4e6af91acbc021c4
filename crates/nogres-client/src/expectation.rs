//! Expectation records.
//!
//! An expectation pairs a statement [`Pattern`] with an optional parameter
//! constraint and the canned [`Returns`] for the query that matches it.

use std::fmt;
use std::sync::Arc;

use nogres_core::{ConfiguredError, Error, Params, Result, Row, Value};
use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// How an expectation recognizes its statement.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Exact text equality.
    Literal(String),
    /// The statement must match the regular expression.
    Regex(Regex),
}

impl Pattern {
    /// Compile a regular-expression pattern.
    pub fn regex(source: &str) -> Result<Self> {
        Regex::new(source).map(Pattern::Regex).map_err(|e| {
            Error::Configuration(format!("Invalid statement pattern /{source}/: {e}"))
        })
    }

    pub fn matches(&self, sql: &str) -> bool {
        match self {
            Pattern::Literal(text) => text == sql,
            Pattern::Regex(re) => re.is_match(sql),
        }
    }

    /// Pattern source text (the literal, or the regex source).
    pub fn as_str(&self) -> &str {
        match self {
            Pattern::Literal(text) => text,
            Pattern::Regex(re) => re.as_str(),
        }
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, Pattern::Regex(_))
    }

    /// Human-readable description used in mismatch errors.
    pub fn describe(&self) -> String {
        match self {
            Pattern::Literal(text) => format!("\"{text}\""),
            Pattern::Regex(re) => format!("a regular expression matching {}", Slashed(re)),
        }
    }
}

struct Slashed<'a>(&'a Regex);

impl fmt::Display for Slashed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.0.as_str())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Literal(text) => f.write_str(text),
            Pattern::Regex(re) => fmt::Display::fmt(&Slashed(re), f),
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.is_regex() == other.is_regex() && self.as_str() == other.as_str()
    }
}

impl From<&str> for Pattern {
    fn from(text: &str) -> Self {
        Pattern::Literal(text.to_string())
    }
}

impl From<String> for Pattern {
    fn from(text: String) -> Self {
        Pattern::Literal(text)
    }
}

impl From<Regex> for Pattern {
    fn from(re: Regex) -> Self {
        Pattern::Regex(re)
    }
}

impl From<&Regex> for Pattern {
    fn from(re: &Regex) -> Self {
        Pattern::Regex(re.clone())
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// What a matched query produces.
#[derive(Debug, Clone)]
pub enum Returns {
    /// Succeed with these rows.
    Rows(Vec<Row>),
    /// Fail with exactly this error.
    Error(ConfiguredError),
}

impl Returns {
    pub fn empty() -> Self {
        Returns::Rows(Vec::new())
    }

    /// Fail with a plain message.
    pub fn error(error: impl Into<ConfiguredError>) -> Self {
        Returns::Error(error.into())
    }

    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            Returns::Rows(rows) => Some(rows),
            Returns::Error(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&ConfiguredError> {
        match self {
            Returns::Error(e) => Some(e),
            Returns::Rows(_) => None,
        }
    }
}

impl Default for Returns {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<Row>> for Returns {
    fn from(rows: Vec<Row>) -> Self {
        Returns::Rows(rows)
    }
}

impl From<&[Row]> for Returns {
    fn from(rows: &[Row]) -> Self {
        Returns::Rows(rows.to_vec())
    }
}

impl<const N: usize> From<[Row; N]> for Returns {
    fn from(rows: [Row; N]) -> Self {
        Returns::Rows(rows.into())
    }
}

impl From<Row> for Returns {
    fn from(row: Row) -> Self {
        Returns::Rows(vec![row])
    }
}

impl From<ConfiguredError> for Returns {
    fn from(error: ConfiguredError) -> Self {
        Returns::Error(error)
    }
}

impl Serialize for Returns {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Returns::Rows(rows) => rows.serialize(serializer),
            Returns::Error(e) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", &e.to_string())?;
                map.end()
            }
        }
    }
}

/// One registered expectation.
#[derive(Debug, serde::Serialize)]
pub struct Expectation {
    pattern: Pattern,
    params: Option<Vec<Value>>,
    returns: Returns,
}

/// Shared handle to a registered expectation.
///
/// Returned by `expect` so tests can reuse the normalized fields in their
/// own assertions.
pub type ExpectationHandle = Arc<Expectation>;

impl Expectation {
    pub fn new(pattern: Pattern, params: Option<Vec<Value>>, returns: Returns) -> Self {
        Self {
            pattern,
            params,
            returns,
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// The parameter constraint; `None` accepts any parameters.
    pub fn params(&self) -> Option<&[Value]> {
        self.params.as_deref()
    }

    pub fn returns(&self) -> &Returns {
        &self.returns
    }
}

/// Conversion into a parameter constraint.
///
/// `None`-like inputs accept any parameters; sequences require an exact
/// match. Dynamically typed inputs (`Value`, `serde_json::Value`) that are
/// neither null nor a sequence are rejected with `Error::Configuration`.
pub trait IntoParamConstraint {
    fn into_param_constraint(self) -> Result<Option<Vec<Value>>>;
}

/// Accept any parameters, including none.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyParams;

impl IntoParamConstraint for AnyParams {
    fn into_param_constraint(self) -> Result<Option<Vec<Value>>> {
        Ok(None)
    }
}

impl IntoParamConstraint for Params {
    fn into_param_constraint(self) -> Result<Option<Vec<Value>>> {
        Ok(self.into_inner())
    }
}

impl<T: Into<Value>> IntoParamConstraint for Vec<T> {
    fn into_param_constraint(self) -> Result<Option<Vec<Value>>> {
        Ok(Some(self.into_iter().map(Into::into).collect()))
    }
}

impl<T: Into<Value>, const N: usize> IntoParamConstraint for [T; N] {
    fn into_param_constraint(self) -> Result<Option<Vec<Value>>> {
        Ok(Some(self.into_iter().map(Into::into).collect()))
    }
}

impl IntoParamConstraint for &[Value] {
    fn into_param_constraint(self) -> Result<Option<Vec<Value>>> {
        Ok(Some(self.to_vec()))
    }
}

impl<T: Into<Value>> IntoParamConstraint for Option<Vec<T>> {
    fn into_param_constraint(self) -> Result<Option<Vec<Value>>> {
        Ok(self.map(|values| values.into_iter().map(Into::into).collect()))
    }
}

impl IntoParamConstraint for Value {
    fn into_param_constraint(self) -> Result<Option<Vec<Value>>> {
        match self {
            Value::Null => Ok(None),
            Value::Array(items) => Ok(Some(items)),
            other => Err(Error::Configuration(format!(
                "Unexpected params: {other}.  Should be an array."
            ))),
        }
    }
}

impl IntoParamConstraint for serde_json::Value {
    fn into_param_constraint(self) -> Result<Option<Vec<Value>>> {
        Value::from(self).into_param_constraint()
    }
}
