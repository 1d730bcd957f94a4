//! In-process engine
//!
//! Collections are vectors kept in insertion order behind a single lock.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::store::{Document, Filter, RecordStore, StoreResult, UpdateOutcome};

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn engine(&self) -> &'static str {
        "memory"
    }

    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default())
    }

    async fn insert_one(&self, collection: &str, doc: Document) -> StoreResult<()> {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .push(doc);
        Ok(())
    }

    async fn insert_many(&self, collection: &str, docs: Vec<Document>) -> StoreResult<()> {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .extend(docs);
        Ok(())
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        changes: Document,
        upsert: bool,
    ) -> StoreResult<UpdateOutcome> {
        let mut collections = self.collections.write();
        let docs = collections.entry(collection.to_string()).or_default();

        if let Some(doc) = docs.iter_mut().find(|d| filter.matches(d)) {
            let modified = changes.iter().any(|(k, v)| doc.get(k) != Some(v));
            doc.extend(changes);
            return Ok(UpdateOutcome {
                matched_count: 1,
                modified_count: u64::from(modified),
                upserted: false,
            });
        }

        if !upsert {
            return Ok(UpdateOutcome::default());
        }

        let mut doc = filter.seed_document();
        doc.extend(changes);
        docs.push(doc);
        Ok(UpdateOutcome {
            matched_count: 0,
            modified_count: 0,
            upserted: true,
        })
    }
}
