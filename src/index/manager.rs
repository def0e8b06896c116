//! Index Manager for quilldb
//!
//! Creates and rebuilds named secondary indexes. A build is a full,
//! additive pass: scan the entire primary collection in key order, project
//! the indexed field from each document, and append the document's primary
//! key to the matching posting list unless it is already a member. Calling
//! it again on an unchanged primary store changes nothing, so re-creating
//! an index is an idempotent rebuild rather than an error.
//!
//! Posting collections are opened through the provider per call and
//! released before returning; nothing is cached across calls.

use crate::db::metadata::{Metadata, MetadataStore};
use crate::observability::Logger;
use crate::store::{Key, KvStore, StoreProvider, StoreResult};

use super::def::{IndexDef, IndexKind};
use super::errors::IndexResult;
use super::postings::Postings;

/// Derives the posting-collection name for an index.
pub fn posting_collection(index: &str) -> String {
    format!("index_{}", index)
}

/// Appends any missing postings for `field` from a full scan of the
/// primary collection. Returns how many postings were appended.
pub fn rebuild<P, S>(primary: &P, postings: &mut Postings<S>, field: &str) -> StoreResult<usize>
where
    P: KvStore + ?Sized,
    S: KvStore,
{
    let mut appended = 0;
    for (primary_key, document) in primary.scan()? {
        // Documents without the field, or with a value that is not a key
        // (null, arrays, objects), contribute no posting.
        let Some(value) = document.get(field) else {
            continue;
        };
        let Some(entry) = Key::from_json(value) else {
            continue;
        };
        if postings.append(&entry, &primary_key)? {
            appended += 1;
        }
    }
    Ok(appended)
}

/// Builds indexes and records their definitions in metadata.
pub struct IndexManager;

impl IndexManager {
    /// Creates (or rebuilds) the named index.
    ///
    /// Parses the kind, runs the full build against the primary
    /// collection, records the definition in `metadata`, and flushes the
    /// metadata artifact. The posting handle is synced and released
    /// before returning.
    pub fn create<P, M>(
        provider: &P,
        meta_store: &M,
        metadata: &mut Metadata,
        primary: &P::Store,
        name: &str,
        field: &str,
        kind: &str,
    ) -> IndexResult<()>
    where
        P: StoreProvider,
        M: MetadataStore,
    {
        let kind: IndexKind = kind.parse()?;

        let mut postings = Postings::new(provider.open(&posting_collection(name))?);
        let appended = rebuild(primary, &mut postings, field)?;
        postings.sync()?;
        drop(postings);

        metadata.indexes.insert(
            name.to_string(),
            IndexDef {
                field: field.to_string(),
                kind,
            },
        );
        meta_store.flush(metadata)?;

        Logger::info(
            "INDEX_CREATE",
            &[
                ("index", name),
                ("field", field),
                ("kind", kind.as_str()),
                ("appended", &appended.to_string()),
            ],
        );
        Ok(())
    }

    /// Rebuilds every registered index, once each.
    pub fn rebuild_all<P>(provider: &P, primary: &P::Store, metadata: &Metadata) -> IndexResult<()>
    where
        P: StoreProvider,
    {
        for (name, def) in &metadata.indexes {
            let mut postings = Postings::new(provider.open(&posting_collection(name))?);
            let appended = rebuild(primary, &mut postings, &def.field)?;
            postings.sync()?;

            Logger::trace(
                "INDEX_REBUILD",
                &[("index", name), ("appended", &appended.to_string())],
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryProvider;
    use serde_json::json;

    fn seeded_primary(provider: &MemoryProvider) -> crate::store::MemoryStore {
        let mut primary = provider.open("primary").unwrap();
        primary
            .put(&Key::from(1), &json!({"title": "Node JS Basics", "stars": 4}))
            .unwrap();
        primary
            .put(&Key::from(2), &json!({"title": "Node Advanced", "stars": 5}))
            .unwrap();
        primary
            .put(&Key::from(3), &json!({"stars": 4}))
            .unwrap();
        primary
    }

    #[test]
    fn test_rebuild_projects_field() {
        let provider = MemoryProvider::new();
        let primary = seeded_primary(&provider);

        let mut postings = Postings::new(provider.open("index_titles").unwrap());
        let appended = rebuild(&primary, &mut postings, "title").unwrap();

        assert_eq!(appended, 2);
        assert_eq!(
            postings.list(&Key::from("Node JS Basics")).unwrap(),
            vec![Key::from(1)]
        );
        // Document 3 has no title and contributes nothing.
        assert!(postings.scan_prefix("Node").unwrap().len() == 2);
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let provider = MemoryProvider::new();
        let primary = seeded_primary(&provider);

        let mut postings = Postings::new(provider.open("index_stars").unwrap());
        assert_eq!(rebuild(&primary, &mut postings, "stars").unwrap(), 3);
        assert_eq!(rebuild(&primary, &mut postings, "stars").unwrap(), 0);

        assert_eq!(
            postings.list(&Key::from(4)).unwrap(),
            vec![Key::from(1), Key::from(3)]
        );
    }

    #[test]
    fn test_create_records_definition() {
        let provider = MemoryProvider::new();
        let primary = seeded_primary(&provider);
        let meta_store = crate::db::metadata::InMemoryMetadataStore::new();
        let mut metadata = Metadata::default();

        IndexManager::create(
            &provider,
            &meta_store,
            &mut metadata,
            &primary,
            "titles",
            "title",
            "text",
        )
        .unwrap();

        let def = metadata.indexes.get("titles").unwrap();
        assert_eq!(def.field, "title");
        assert_eq!(def.kind, IndexKind::Text);
        assert_eq!(meta_store.load().unwrap(), Some(metadata));
    }

    #[test]
    fn test_create_rejects_unknown_kind() {
        let provider = MemoryProvider::new();
        let primary = seeded_primary(&provider);
        let meta_store = crate::db::metadata::InMemoryMetadataStore::new();
        let mut metadata = Metadata::default();

        let result = IndexManager::create(
            &provider,
            &meta_store,
            &mut metadata,
            &primary,
            "titles",
            "title",
            "geo",
        );
        assert!(matches!(
            result,
            Err(super::super::errors::IndexError::InvalidKind(_))
        ));
        assert!(metadata.indexes.is_empty());
    }
}
