//! The matching algorithm.
//!
//! Given the expectation at the head of the queue and a normalized query,
//! decide the query's outcome: statement check, then parameter check, then
//! the expectation's canned result.

use nogres_core::{BoundQuery, Error, QueryResult, Result, Value};

use crate::expectation::{Expectation, Returns};

/// Structural equality between two values.
///
/// Numbers compare by value whatever their width (`Int(1)` equals
/// `BigInt(1)` and `Double(1.0)`), other variants must agree exactly, arrays
/// are compared element by element at every depth, and `Json` values never
/// compare equal.
#[allow(clippy::float_cmp)]
pub fn values_equal(a: &Value, b: &Value) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Double(x), Value::Double(y)) => x == y,
        (Value::Double(d), other) | (other, Value::Double(d)) => {
            other.as_i64().is_some_and(|i| i as f64 == *d)
        }
        (Value::Text(x), Value::Text(y)) => x == y,
        (Value::Bytes(x), Value::Bytes(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => sequences_equal(x, y),
        _ => false,
    }
}

/// Equal length and [`values_equal`] at every position.
pub fn sequences_equal(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
}

/// Check submitted parameters against a present constraint.
///
/// Absent parameters never satisfy a constraint, not even an empty one.
pub fn params_match(submitted: Option<&[Value]>, constraint: &[Value]) -> bool {
    submitted.is_some_and(|params| sequences_equal(params, constraint))
}

/// Render a parameter list for error messages.
pub fn render_params(params: Option<&[Value]>) -> String {
    match params {
        Some(values) => {
            serde_json::Value::Array(values.iter().map(Value::to_json).collect()).to_string()
        }
        None => "nothing".to_string(),
    }
}

/// Resolve `query` against the (already dequeued) `expectation`.
pub fn evaluate(expectation: &Expectation, query: BoundQuery) -> Result<QueryResult> {
    let BoundQuery { text, params } = query;

    if !expectation.pattern().matches(&text) {
        tracing::warn!(sql = %text, expected = %expectation.pattern(), "Statement mismatch");
        return Err(Error::UnexpectedQuery {
            sql: text,
            expected: Some(expectation.pattern().describe()),
        });
    }

    if let Some(constraint) = expectation.params() {
        if !params_match(params.as_deref(), constraint) {
            let expected = render_params(Some(constraint));
            let actual = render_params(params.as_deref());
            tracing::warn!(sql = %text, %expected, %actual, "Parameter mismatch");
            return Err(Error::UnexpectedParams {
                sql: text,
                expected,
                actual,
            });
        }
    }

    match expectation.returns() {
        Returns::Error(e) => {
            tracing::trace!(sql = %text, "Matched; returning configured error");
            Err(Error::Configured(e.clone()))
        }
        Returns::Rows(rows) => {
            tracing::trace!(sql = %text, rows = rows.len(), "Matched");
            Ok(QueryResult::from_rows(rows.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expectation::Pattern;
    use nogres_core::{ConfiguredError, Row};

    fn bound(text: &str, params: Option<Vec<Value>>) -> BoundQuery {
        BoundQuery {
            text: text.to_string(),
            params,
        }
    }

    #[test]
    fn test_nested_arrays_compare_every_position() {
        let a = Value::from(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        let b = Value::from(vec![vec![1, 2, 3], vec![4, 5, 9]]);
        assert!(values_equal(&a, &a.clone()));
        assert!(!values_equal(&a, &b));
    }

    #[test]
    fn test_differing_variants_are_unequal() {
        assert!(!values_equal(&Value::Text("1".into()), &Value::Int(1)));
        assert!(!values_equal(&Value::Null, &Value::Bool(false)));
        assert!(!values_equal(&Value::Bool(true), &Value::Int(1)));
    }

    #[test]
    fn test_numbers_compare_by_value() {
        assert!(values_equal(&Value::Int(1), &Value::BigInt(1)));
        assert!(values_equal(&Value::BigInt(2), &Value::Int(2)));
        assert!(values_equal(&Value::Double(3.0), &Value::Int(3)));
        assert!(!values_equal(&Value::BigInt(3), &Value::Double(3.5)));
        assert!(!values_equal(&Value::Int(1), &Value::BigInt(2)));

        let from_json = Value::from(serde_json::json!([2, [3]]));
        let from_rust = Value::from(vec![Value::Int(2), Value::from([3_i32])]);
        assert!(values_equal(&from_json, &from_rust));
    }

    #[test]
    fn test_nan_and_json_never_equal() {
        assert!(!values_equal(&Value::Double(f64::NAN), &Value::Double(f64::NAN)));
        let obj = Value::Json(serde_json::json!({"a": 1}));
        assert!(!values_equal(&obj, &obj.clone()));
    }

    #[test]
    fn test_absent_params_never_match() {
        let empty: &[Value] = &[];
        let one = [Value::Int(1)];
        assert!(!params_match(None, empty));
        assert!(params_match(Some(empty), empty));
        assert!(!params_match(Some(&one[..]), empty));
    }

    #[test]
    fn test_length_mismatch() {
        assert!(!sequences_equal(&[Value::Int(1)], &[Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn test_render_params() {
        assert_eq!(render_params(None), "nothing");
        let params = [Value::Int(1), Value::Text("a".into())];
        assert_eq!(render_params(Some(&params[..])), r#"[1,"a"]"#);
    }

    #[test]
    fn test_evaluate_statement_mismatch() {
        let e = Expectation::new(Pattern::from("SELECT 2"), None, Returns::empty());
        let err = evaluate(&e, bound("SELECT 1", None)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unexpected query \"SELECT 1\".\nExpected \"SELECT 2\""
        );
    }

    #[test]
    fn test_evaluate_regex_mismatch() {
        let e = Expectation::new(Pattern::regex("^UPDATE").unwrap(), None, Returns::empty());
        let err = evaluate(&e, bound("SELECT 1", None)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unexpected query \"SELECT 1\".\nExpected a regular expression matching /^UPDATE/"
        );
    }

    #[test]
    fn test_evaluate_params_mismatch_message() {
        let e = Expectation::new(Pattern::from("X"), Some(vec![Value::Int(1)]), Returns::empty());
        let err = evaluate(&e, bound("X", Some(vec![Value::Int(2)]))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unexpected params for query \"X\".\nExpected [1], got [2]."
        );
    }

    #[test]
    fn test_evaluate_returns_copy_of_rows() {
        let e = Expectation::new(
            Pattern::from("X"),
            None,
            Returns::from(Row::new().with("id", 1)),
        );
        let mut first = evaluate(&e, bound("X", None)).unwrap();
        first.rows[0].set("id", 99);
        let second = evaluate(&e, bound("X", Some(vec![]))).unwrap();
        assert_eq!(second.rows[0].get("id"), Some(&Value::Int(1)));
        assert_eq!(second.row_count, 1);
    }

    #[test]
    fn test_evaluate_configured_error_is_same_value() {
        let boom = ConfiguredError::from("boom");
        let e = Expectation::new(Pattern::from("X"), None, Returns::Error(boom.clone()));
        let err = evaluate(&e, bound("X", None)).unwrap_err();
        assert!(err.configured().unwrap().ptr_eq(&boom));
    }
}
