//! Embedded SurrealDB engine
//!
//! Each collection is a SurrealDB table. Documents are stored as table content
//! under a time-ordered record id; the record id itself is never read back.

use async_trait::async_trait;
use serde_json::Value;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use super::store::{Document, Filter, RecordStore, StoreError, StoreResult, UpdateOutcome};

#[derive(Clone)]
pub struct SurrealStore {
    db: Surreal<Db>,
}

impl SurrealStore {
    /// Open (or create) a RocksDB-backed database at `path`
    pub async fn open(path: &str, namespace: &str, database: &str) -> StoreResult<Self> {
        let db = Surreal::new::<RocksDb>(path).await?;
        db.use_ns(namespace).use_db(database).await?;
        tracing::info!(path, namespace, database, "SurrealDB store opened");
        Ok(Self { db })
    }

    async fn select(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        let (clause, binds) = where_clause(filter)?;
        let sql = format!("SELECT * OMIT id FROM type::table($tb){clause}");

        let mut query = self.db.query(sql).bind(("tb", collection.to_string()));
        for bind in binds {
            query = query.bind(bind);
        }

        let rows: Vec<Value> = query.await?.take(0)?;
        rows.into_iter()
            .map(|row| match row {
                Value::Object(map) => Ok(map),
                other => Err(StoreError::Decode(format!(
                    "expected an object in {collection}, got {other}"
                ))),
            })
            .collect()
    }
}

/// Field paths are interpolated into SurrealQL, so only plain dotted
/// identifiers are accepted.
fn checked_field(field: &str) -> StoreResult<&str> {
    let valid = !field.is_empty()
        && field.split('.').all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
                && !part.starts_with(|c: char| c.is_ascii_digit())
        });
    if valid {
        Ok(field)
    } else {
        Err(StoreError::InvalidField(field.to_string()))
    }
}

fn where_clause(filter: &Filter) -> StoreResult<(String, Vec<(String, Value)>)> {
    if filter.is_empty() {
        return Ok((String::new(), Vec::new()));
    }

    let mut terms = Vec::with_capacity(filter.conditions().len());
    let mut binds = Vec::with_capacity(filter.conditions().len());
    for (i, (field, value)) in filter.conditions().iter().enumerate() {
        let name = format!("p{i}");
        terms.push(format!("{} = ${}", checked_field(field)?, name));
        binds.push((name, value.clone()));
    }
    Ok((format!(" WHERE {}", terms.join(" AND ")), binds))
}

#[async_trait]
impl RecordStore for SurrealStore {
    fn engine(&self) -> &'static str {
        "surrealdb"
    }

    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        self.select(collection, filter).await
    }

    async fn insert_one(&self, collection: &str, doc: Document) -> StoreResult<()> {
        self.db
            .query("CREATE type::thing($tb, rand::ulid()) CONTENT $doc")
            .bind(("tb", collection.to_string()))
            .bind(("doc", Value::Object(doc)))
            .await?
            .check()?;
        Ok(())
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        changes: Document,
        upsert: bool,
    ) -> StoreResult<UpdateOutcome> {
        if self.select(collection, filter).await?.is_empty() {
            if !upsert {
                return Ok(UpdateOutcome::default());
            }
            let mut doc = filter.seed_document();
            doc.extend(changes);
            self.insert_one(collection, doc).await?;
            return Ok(UpdateOutcome {
                matched_count: 0,
                modified_count: 0,
                upserted: true,
            });
        }

        let (clause, binds) = where_clause(filter)?;
        let sql = format!("UPDATE type::table($tb) MERGE $changes{clause}");
        let mut query = self
            .db
            .query(sql)
            .bind(("tb", collection.to_string()))
            .bind(("changes", Value::Object(changes)));
        for bind in binds {
            query = query.bind(bind);
        }
        query.await?.check()?;

        Ok(UpdateOutcome {
            matched_count: 1,
            modified_count: 1,
            upserted: false,
        })
    }
}
