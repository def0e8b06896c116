//! Predicate matching for document scans
//!
//! Evaluates a recursive query expression against one document. A query is
//! a JSON object whose keys are either the `$or` combinator (an array of
//! sub-queries, any of which may match) or field names mapped to operator
//! objects. Field predicates AND together. No type coercion.
//!
//! Two behaviors are load-bearing and intentionally preserved from the
//! system this engine is compatible with:
//!
//! - Reaching `$or` returns its verdict immediately; sibling keys after it
//!   in iteration order are never evaluated.
//! - A null `$gt` operand compares against numeric zero.

use serde_json::Value;

use super::errors::{QueryError, QueryResult};

/// The logical-or combinator key.
pub const OR: &str = "$or";

/// Checks whether `document` satisfies `query`.
///
/// An empty (or non-object) query matches everything. A field that is
/// absent from the document leaves its predicate satisfied.
pub fn matches(query: &Value, document: &Value) -> QueryResult<bool> {
    let Some(clauses) = query.as_object() else {
        // No keys to evaluate.
        return Ok(true);
    };

    for (key, clause) in clauses {
        if key == OR {
            let branches = clause.as_array().ok_or_else(QueryError::or_expects_array)?;
            for branch in branches {
                if matches(branch, document)? {
                    return Ok(true);
                }
            }
            // The $or verdict is the verdict: remaining sibling keys are
            // not evaluated.
            return Ok(false);
        }

        if clause.is_array() {
            return Err(QueryError::predicate_is_array(key));
        }

        if let Some(field_value) = document.get(key) {
            if !evaluate(clause, field_value) {
                return Ok(false);
            }
        }
    }

    Ok(true)
}

/// Evaluates one operator object against a field value.
///
/// Only the first recognized operator key is consulted, in the order
/// `$eq`, `$neq`, `$gt`. Anything else evaluates to false.
pub fn evaluate(operators: &Value, field_value: &Value) -> bool {
    let Some(obj) = operators.as_object() else {
        return false;
    };

    if let Some(operand) = obj.get("$eq") {
        return field_value == operand;
    }
    if let Some(operand) = obj.get("$neq") {
        return field_value != operand;
    }
    if let Some(operand) = obj.get("$gt") {
        let zero = Value::from(0);
        let bound = if operand.is_null() { &zero } else { operand };
        return greater_than(field_value, bound);
    }

    false
}

/// Strictly-typed ordering: numbers compare numerically, strings
/// lexicographically, every other pairing is false.
fn greater_than(actual: &Value, bound: &Value) -> bool {
    match (actual, bound) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(af), Some(bf)) = (a.as_f64(), b.as_f64()) {
                return af > bf;
            }
            if let (Some(ai), Some(bi)) = (a.as_i64(), b.as_i64()) {
                return ai > bi;
            }
            false
        }
        (Value::String(a), Value::String(b)) => a > b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_eq_match() {
        let doc = json!({"type": "post"});

        assert!(matches(&json!({"type": {"$eq": "post"}}), &doc).unwrap());
        assert!(!matches(&json!({"type": {"$eq": "comment"}}), &doc).unwrap());
    }

    #[test]
    fn test_eq_no_coercion() {
        let doc = json!({"value": 123});

        assert!(!matches(&json!({"value": {"$eq": "123"}}), &doc).unwrap());
        assert!(matches(&json!({"value": {"$eq": 123}}), &doc).unwrap());
    }

    #[test]
    fn test_neq_match() {
        let doc = json!({"type": "post"});

        assert!(matches(&json!({"type": {"$neq": "comment"}}), &doc).unwrap());
        assert!(!matches(&json!({"type": {"$neq": "post"}}), &doc).unwrap());
    }

    #[test]
    fn test_gt_numbers_and_strings() {
        assert!(matches(&json!({"age": {"$gt": 18}}), &json!({"age": 25})).unwrap());
        assert!(!matches(&json!({"age": {"$gt": 25}}), &json!({"age": 25})).unwrap());
        assert!(matches(&json!({"name": {"$gt": "a"}}), &json!({"name": "b"})).unwrap());
        assert!(!matches(&json!({"age": {"$gt": "18"}}), &json!({"age": 25})).unwrap());
    }

    #[test]
    fn test_gt_null_operand_means_zero() {
        assert!(matches(&json!({"n": {"$gt": null}}), &json!({"n": 1})).unwrap());
        assert!(!matches(&json!({"n": {"$gt": null}}), &json!({"n": -1})).unwrap());
    }

    #[test]
    fn test_unrecognized_operator_is_false() {
        let doc = json!({"age": 25});
        assert!(!matches(&json!({"age": {"$lt": 30}}), &doc).unwrap());
        assert!(!matches(&json!({"age": {}}), &doc).unwrap());
    }

    #[test]
    fn test_first_recognized_operator_wins() {
        // $eq fails, $neq would pass: only $eq is consulted.
        let doc = json!({"age": 25});
        assert!(!matches(&json!({"age": {"$eq": 30, "$neq": 30}}), &doc).unwrap());
    }

    #[test]
    fn test_absent_field_is_satisfied() {
        let doc = json!({"name": "Alice"});
        assert!(matches(&json!({"age": {"$eq": 30}}), &doc).unwrap());
    }

    #[test]
    fn test_empty_query_matches() {
        assert!(matches(&json!({}), &json!({"a": 1})).unwrap());
    }

    #[test]
    fn test_all_field_predicates_must_hold() {
        let doc = json!({"age": 25, "active": true});

        assert!(matches(
            &json!({"age": {"$gt": 18}, "active": {"$eq": true}}),
            &doc
        )
        .unwrap());
        assert!(!matches(
            &json!({"age": {"$gt": 18}, "active": {"$eq": false}}),
            &doc
        )
        .unwrap());
    }

    #[test]
    fn test_or_any_branch() {
        let doc = json!({"type": "comment"});
        let query = json!({"$or": [
            {"type": {"$eq": "comment"}},
            {"type": {"$eq": "post"}},
        ]});

        assert!(matches(&query, &doc).unwrap());
        assert!(!matches(&query, &json!({"type": "other"})).unwrap());
    }

    #[test]
    fn test_or_short_circuits_siblings() {
        // "$or" sorts before "type"; its verdict returns immediately, so
        // the failing sibling predicate is never evaluated.
        let doc = json!({"type": "comment"});
        let query = json!({
            "$or": [{"type": {"$eq": "comment"}}],
            "type": {"$eq": "post"},
        });

        assert!(matches(&query, &doc).unwrap());
    }

    #[test]
    fn test_or_requires_array() {
        let result = matches(&json!({"$or": {"type": {"$eq": "x"}}}), &json!({}));
        assert_eq!(result, Err(QueryError::or_expects_array()));
    }

    #[test]
    fn test_predicate_must_not_be_array() {
        let result = matches(&json!({"type": ["post"]}), &json!({"type": "post"}));
        assert!(matches!(result, Err(QueryError::InvalidShape(_))));
    }

    #[test]
    fn test_nested_or() {
        let doc = json!({"a": 1, "b": 2});
        let query = json!({"$or": [
            {"$or": [{"a": {"$eq": 9}}, {"b": {"$eq": 2}}]},
        ]});
        assert!(matches(&query, &doc).unwrap());
    }
}
