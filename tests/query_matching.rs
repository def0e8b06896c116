//! Query Matching Tests
//!
//! Cross-component tests for `find`: predicate semantics over a primary
//! scan, including the behaviors preserved for compatibility:
//! - `$or` returns its verdict immediately, skipping later siblings
//! - a null `$gt` operand compares against zero
//! - absent document fields leave their predicate satisfied

use quilldb::db::{Database, DbError, InMemoryMetadataStore};
use quilldb::store::{Key, MemoryProvider};
use serde_json::json;

type MemDb = Database<MemoryProvider, InMemoryMetadataStore>;

// =============================================================================
// Helper Functions
// =============================================================================

fn seeded_db() -> MemDb {
    let mut db = Database::in_memory();
    db.open().unwrap();
    db.insert(1, json!({"id": 1, "type": "post"})).unwrap();
    db.insert(2, json!({"id": 2, "type": "comment"})).unwrap();
    db.insert(3, json!({"id": 3, "type": "other"})).unwrap();
    db
}

fn find_keys(db: &MemDb, query: serde_json::Value) -> Vec<Key> {
    db.find(query)
        .unwrap()
        .map(|entry| entry.unwrap().0)
        .collect()
}

// =============================================================================
// Combinator Tests
// =============================================================================

/// The $or scenario: comment-or-post yields keys 1 and 2 in key order.
#[test]
fn test_or_selects_matching_documents_in_key_order() {
    let db = seeded_db();
    let query = json!({"$or": [
        {"type": {"$eq": "comment"}},
        {"type": {"$eq": "post"}},
    ]});

    assert_eq!(find_keys(&db, query), vec![Key::from(1), Key::from(2)]);
}

/// Reaching $or ends evaluation: a failing sibling after it is ignored.
#[test]
fn test_or_verdict_skips_remaining_siblings() {
    let db = seeded_db();
    // "$or" iterates before "type"; the type predicate would reject
    // every matched document but is never consulted.
    let query = json!({
        "$or": [{"type": {"$eq": "comment"}}],
        "type": {"$eq": "post"},
    });

    assert_eq!(find_keys(&db, query), vec![Key::from(2)]);
}

/// A failing $or with no matching branch rejects the document.
#[test]
fn test_or_with_no_matching_branch_rejects() {
    let db = seeded_db();
    let query = json!({"$or": [{"type": {"$eq": "video"}}]});
    assert!(find_keys(&db, query).is_empty());
}

// =============================================================================
// Field Predicate Tests
// =============================================================================

/// Field predicates AND together across the query object.
#[test]
fn test_field_predicates_conjoin() {
    let db = seeded_db();
    let query = json!({"id": {"$gt": 1}, "type": {"$neq": "other"}});
    assert_eq!(find_keys(&db, query), vec![Key::from(2)]);
}

/// A field absent from the document leaves its predicate satisfied.
#[test]
fn test_absent_field_is_permissive() {
    let db = seeded_db();
    let query = json!({"missing": {"$eq": "anything"}});
    assert_eq!(
        find_keys(&db, query),
        vec![Key::from(1), Key::from(2), Key::from(3)]
    );
}

/// Empty query matches everything.
#[test]
fn test_empty_query_matches_all() {
    let db = seeded_db();
    assert_eq!(find_keys(&db, json!({})).len(), 3);
}

/// Null $gt operand compares against numeric zero.
#[test]
fn test_gt_null_operand_reads_as_zero() {
    let mut db = Database::in_memory();
    db.open().unwrap();
    db.insert("pos", json!({"n": 5})).unwrap();
    db.insert("neg", json!({"n": -5})).unwrap();

    let keys = find_keys(&db, json!({"n": {"$gt": null}}));
    assert_eq!(keys, vec![Key::from("pos")]);
}

// =============================================================================
// Shape Error Tests
// =============================================================================

/// A non-array $or fails the whole sequence with a query error.
#[test]
fn test_or_non_array_raises_shape_error() {
    let db = seeded_db();
    let mut results = db.find(json!({"$or": {"type": {"$eq": "post"}}})).unwrap();

    let first = results.next().unwrap();
    assert!(matches!(first, Err(DbError::Query(_))));
    assert!(results.next().is_none());
}

/// An array field predicate fails the same way.
#[test]
fn test_array_predicate_raises_shape_error() {
    let db = seeded_db();
    let mut results = db.find(json!({"type": ["post"]})).unwrap();
    assert!(matches!(results.next().unwrap(), Err(DbError::Query(_))));
}
