//! Index-backed search
//!
//! Resolves an equality or prefix query against one index's posting
//! lists, then resolves the accumulated primary keys into documents.
//! When both branches are supplied, both run — `$eq` first — and their
//! key lists are concatenated, not intersected; duplicates across
//! postings are kept. Results come back in accumulation order (posting
//! order), not primary-store order.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::index::{posting_collection, Postings};
use crate::observability::Logger;
use crate::store::{Key, KvStore, StoreProvider, StoreResult};

/// One search request against a named index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Exact-value lookup; a miss contributes nothing.
    #[serde(rename = "$eq", default, skip_serializing_if = "Option::is_none")]
    pub eq: Option<Value>,

    /// Prefix lookup over lexicographically ordered posting keys.
    #[serde(
        rename = "$startsWith",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub starts_with: Option<String>,
}

impl SearchQuery {
    /// Exact-match query.
    pub fn eq(value: impl Into<Value>) -> Self {
        Self {
            eq: Some(value.into()),
            starts_with: None,
        }
    }

    /// Prefix query.
    pub fn starts_with(prefix: impl Into<String>) -> Self {
        Self {
            eq: None,
            starts_with: Some(prefix.into()),
        }
    }

    /// Adds the prefix branch to an existing query.
    pub fn and_starts_with(mut self, prefix: impl Into<String>) -> Self {
        self.starts_with = Some(prefix.into());
        self
    }
}

/// Resolves search queries through posting collections.
pub struct SearchEngine;

impl SearchEngine {
    /// Runs `query` against the named index.
    ///
    /// The posting collection is opened for the duration of the lookup
    /// and released before the primary multi-get. An index with no
    /// postings (including a name never created) yields an empty result.
    pub fn search<P: StoreProvider>(
        provider: &P,
        primary: &P::Store,
        index: &str,
        query: &SearchQuery,
    ) -> StoreResult<Vec<Value>> {
        let postings = Postings::new(provider.open(&posting_collection(index))?);

        let mut hits: Vec<Key> = Vec::new();
        if let Some(value) = &query.eq {
            if let Some(entry) = Key::from_json(value) {
                hits.extend(postings.list(&entry)?);
            }
        }
        if let Some(prefix) = &query.starts_with {
            hits.extend(postings.scan_prefix(prefix)?);
        }
        drop(postings);

        Logger::trace(
            "SEARCH",
            &[("index", index), ("hits", &hits.len().to_string())],
        );

        if hits.is_empty() {
            return Ok(Vec::new());
        }

        // Stale postings may reference keys the primary store no longer
        // holds; those resolve to nothing.
        let documents = primary.get_many(&hits)?;
        Ok(documents.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_deserializes_operator_names() {
        let query: SearchQuery =
            serde_json::from_value(json!({"$eq": "Node", "$startsWith": "No"})).unwrap();
        assert_eq!(query.eq, Some(json!("Node")));
        assert_eq!(query.starts_with.as_deref(), Some("No"));
    }

    #[test]
    fn test_empty_query_is_empty_result() {
        let provider = crate::store::MemoryProvider::new();
        let primary = provider.open("primary").unwrap();

        let docs = SearchEngine::search(&provider, &primary, "titles", &SearchQuery::default())
            .unwrap();
        assert!(docs.is_empty());
    }
}
