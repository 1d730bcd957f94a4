//! Record Store boundary
//!
//! Every entity lives in its own collection of JSON documents, addressed by a
//! domain id field (`food_id`, `menu_id`, ...). Engines implement
//! [`RecordStore`]; handlers talk to the time-budgeted [`Store`] handle.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::memory::MemoryStore;
use super::pipeline::Pipeline;
use crate::AppError;

/// A stored record
pub type Document = serde_json::Map<String, Value>;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{operation} on {collection} exceeded {budget:?}")]
    Timeout {
        operation: &'static str,
        collection: String,
        budget: Duration,
    },

    #[error("Database error: {0}")]
    Backend(String),

    #[error("Malformed record: {0}")]
    Decode(String),

    #[error("Invalid field path: {0}")]
    InvalidField(String),
}

impl From<surrealdb::Error> for StoreError {
    fn from(err: surrealdb::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Timeout { .. } => AppError::timeout(err.to_string()),
            StoreError::Backend(msg) => AppError::database(msg),
            StoreError::Decode(msg) | StoreError::InvalidField(msg) => AppError::internal(msg),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Conjunction of equality conditions over dotted field paths
///
/// The empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and(field, value)
    }

    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| resolve_path(doc, field) == Some(expected))
    }

    /// Top-level fields an upsert copies into the inserted document
    pub(crate) fn seed_document(&self) -> Document {
        self.conditions
            .iter()
            .filter(|(field, _)| !field.contains('.'))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect()
    }
}

/// Look up a dotted path (`order.table_id`) inside a document
pub fn resolve_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = doc.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Result of an update-one call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted: bool,
}

/// Storage engine contract
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Engine name for logs
    fn engine(&self) -> &'static str;

    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>>;

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        Ok(self.find(collection, filter).await?.into_iter().next())
    }

    async fn insert_one(&self, collection: &str, doc: Document) -> StoreResult<()>;

    async fn insert_many(&self, collection: &str, docs: Vec<Document>) -> StoreResult<()> {
        for doc in docs {
            self.insert_one(collection, doc).await?;
        }
        Ok(())
    }

    /// `$set` the changes on the first match; insert filter fields plus changes
    /// when nothing matches and `upsert` is set.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        changes: Document,
        upsert: bool,
    ) -> StoreResult<UpdateOutcome>;

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        Ok(self.find(collection, filter).await?.len() as u64)
    }

    /// Load the source collection and every looked-up collection, then run the
    /// pipeline in process.
    async fn aggregate(&self, collection: &str, pipeline: &Pipeline) -> StoreResult<Vec<Document>> {
        let source = self.find(collection, &pipeline.leading_filter()).await?;

        let mut foreign: HashMap<String, Vec<Document>> = HashMap::new();
        for name in pipeline.lookup_collections() {
            if !foreign.contains_key(name) {
                let docs = self.find(name, &Filter::all()).await?;
                foreign.insert(name.to_string(), docs);
            }
        }

        Ok(pipeline.execute(source, &foreign))
    }
}

/// Clone-able store handle with a per-operation time budget
///
/// An operation that runs past the budget is abandoned and reported as
/// [`StoreError::Timeout`]; nothing is retried.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn RecordStore>,
    timeout: Duration,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("engine", &self.backend.engine())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Store {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(100);

    pub fn new(backend: Arc<dyn RecordStore>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Empty in-process store with the default budget
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Self::DEFAULT_TIMEOUT)
    }

    pub fn engine(&self) -> &'static str {
        self.backend.engine()
    }

    async fn timed<T, F>(&self, operation: &'static str, collection: &str, fut: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(operation, collection, "Store operation timed out");
                Err(StoreError::Timeout {
                    operation,
                    collection: collection.to_string(),
                    budget: self.timeout,
                })
            }
        }
    }

    pub async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        self.timed("find", collection, self.backend.find(collection, filter))
            .await
    }

    pub async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        self.timed("find_one", collection, self.backend.find_one(collection, filter))
            .await
    }

    pub async fn insert_one(&self, collection: &str, doc: Document) -> StoreResult<()> {
        self.timed("insert_one", collection, self.backend.insert_one(collection, doc))
            .await
    }

    pub async fn insert_many(&self, collection: &str, docs: Vec<Document>) -> StoreResult<()> {
        self.timed("insert_many", collection, self.backend.insert_many(collection, docs))
            .await
    }

    pub async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        changes: Document,
        upsert: bool,
    ) -> StoreResult<UpdateOutcome> {
        self.timed(
            "update_one",
            collection,
            self.backend.update_one(collection, filter, changes, upsert),
        )
        .await
    }

    pub async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        self.timed("count", collection, self.backend.count(collection, filter))
            .await
    }

    pub async fn aggregate(&self, collection: &str, pipeline: &Pipeline) -> StoreResult<Vec<Document>> {
        self.timed("aggregate", collection, self.backend.aggregate(collection, pipeline))
            .await
    }

    // ==================== Typed helpers ====================

    pub async fn find_as<T: DeserializeOwned>(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> StoreResult<Vec<T>> {
        self.find(collection, filter)
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    pub async fn find_one_as<T: DeserializeOwned>(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> StoreResult<Option<T>> {
        self.find_one(collection, filter)
            .await?
            .map(from_document)
            .transpose()
    }

    pub async fn insert<T: Serialize>(&self, collection: &str, record: &T) -> StoreResult<()> {
        self.insert_one(collection, to_document(record)?).await
    }
}

/// Serialize a record into a document
pub fn to_document<T: Serialize>(record: &T) -> StoreResult<Document> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Decode(format!(
            "expected an object, got {}",
            other
        ))),
    }
}

/// Deserialize a document into a record
pub fn from_document<T: DeserializeOwned>(doc: Document) -> StoreResult<T> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    /// Engine that never answers
    struct Stalled;

    #[async_trait]
    impl RecordStore for Stalled {
        fn engine(&self) -> &'static str {
            "stalled"
        }

        async fn find(&self, _: &str, _: &Filter) -> StoreResult<Vec<Document>> {
            std::future::pending().await
        }

        async fn insert_one(&self, _: &str, _: Document) -> StoreResult<()> {
            std::future::pending().await
        }

        async fn update_one(
            &self,
            _: &str,
            _: &Filter,
            _: Document,
            _: bool,
        ) -> StoreResult<UpdateOutcome> {
            std::future::pending().await
        }
    }

    #[test]
    fn test_filter_matches_dotted_paths() {
        let d = doc(json!({"order_id": "o-1", "order": {"table_id": "t-1"}}));

        assert!(Filter::all().matches(&d));
        assert!(Filter::eq("order_id", "o-1").matches(&d));
        assert!(Filter::eq("order.table_id", "t-1").matches(&d));
        assert!(!Filter::eq("order_id", "o-1").and("order.table_id", "t-2").matches(&d));
        assert!(!Filter::eq("missing", Value::Null).matches(&d));
    }

    #[test]
    fn test_seed_document_skips_nested_paths() {
        let filter = Filter::eq("food_id", "f-1").and("menu.name", "x");
        let seed = filter.seed_document();
        assert_eq!(seed.len(), 1);
        assert_eq!(seed["food_id"], "f-1");
    }

    #[test]
    fn test_document_conversion() {
        #[derive(Serialize, serde::Deserialize, PartialEq, Debug)]
        struct Row {
            id: String,
            n: i64,
        }

        let d = to_document(&Row {
            id: "a".to_string(),
            n: 3,
        })
        .unwrap();
        assert_eq!(d["n"], 3);
        let back: Row = from_document(d).unwrap();
        assert_eq!(back.n, 3);

        assert!(matches!(to_document(&5), Err(StoreError::Decode(_))));
    }

    #[tokio::test]
    async fn test_operations_respect_budget() {
        let store = Store::new(Arc::new(Stalled), Duration::from_millis(20));

        let err = store.find("foods", &Filter::all()).await.unwrap_err();
        assert!(matches!(err, StoreError::Timeout { operation: "find", .. }));

        let app: AppError = err.into();
        assert_eq!(app.code, shared::error::ErrorCode::TimeoutError);
        assert_eq!(app.http_status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_typed_helpers() {
        let store = Store::in_memory();
        store
            .insert("tables", &json!({"table_id": "t-1", "table_number": 4}))
            .await
            .unwrap();

        let found: Option<Value> = store
            .find_one_as("tables", &Filter::eq("table_id", "t-1"))
            .await
            .unwrap();
        assert_eq!(found.unwrap()["table_number"], 4);

        let all: Vec<Value> = store.find_as("tables", &Filter::all()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(store.count("tables", &Filter::all()).await.unwrap(), 1);
    }
}
