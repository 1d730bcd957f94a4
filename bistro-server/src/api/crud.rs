//! 通用 CRUD 处理器
//!
//! 每个实体只声明一个 [`Resource`] 实现 (集合名、ID 字段、记录类型)，
//! 再按需实现 [`Creatable`] / [`Updatable`]，路由直接挂载这里的泛型处理器:
//!
//! ```ignore
//! Router::new()
//!     .route("/", get(crud::list::<Tables>).post(crud::create::<Tables>))
//!     .route("/{id}", get(crud::get_by_id::<Tables>).patch(crud::update::<Tables>))
//! ```

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::error::ErrorCode;
use shared::util::{new_record_id, now_seconds};
use validator::Validate;

use crate::auth::extractor::ValidJson;
use crate::core::ServerState;
use crate::db::{Document, Filter, Store, from_document, to_document};
use crate::{AppError, AppResult};

/// A collection exposed over HTTP
pub trait Resource: Send + Sync + 'static {
    /// Name used in messages and logs (`"food"`, `"menu"`, ...)
    const RESOURCE: &'static str;
    const COLLECTION: &'static str;
    /// Domain id field (`"food_id"`, ...)
    const ID_FIELD: &'static str;
    const NOT_FOUND: ErrorCode;

    type Record: Serialize + DeserializeOwned + Send + 'static;

    fn not_found(id: &str) -> AppError {
        AppError::new(Self::NOT_FOUND).with_detail(Self::ID_FIELD, id)
    }
}

/// Another record a payload points at
#[derive(Debug, Clone)]
pub struct Reference {
    pub resource: &'static str,
    pub collection: &'static str,
    pub id_field: &'static str,
    pub id: String,
}

impl Reference {
    /// Reference to a record of `R`
    pub fn to<R: Resource>(id: impl Into<String>) -> Self {
        Self {
            resource: R::RESOURCE,
            collection: R::COLLECTION,
            id_field: R::ID_FIELD,
            id: id.into(),
        }
    }
}

/// Everything `build` needs besides the payload
#[derive(Debug)]
pub struct CreateContext {
    pub id: String,
    pub now: DateTime<Utc>,
    references: HashMap<&'static str, Document>,
}

impl CreateContext {
    /// The resolved record of a reference, keyed by its collection
    pub fn reference<T: DeserializeOwned>(&self, collection: &str) -> AppResult<T> {
        let doc = self
            .references
            .get(collection)
            .cloned()
            .ok_or_else(|| AppError::internal(format!("{collection} reference not resolved")))?;
        Ok(from_document(doc)?)
    }
}

/// Resources created straight from one payload
pub trait Creatable: Resource {
    type Create: DeserializeOwned + Validate + Send + 'static;

    fn create_references(_payload: &Self::Create) -> Vec<Reference> {
        Vec::new()
    }

    fn build(payload: Self::Create, ctx: &CreateContext) -> AppResult<Self::Record>;
}

/// Resources patched field by field
pub trait Updatable: Resource {
    type Update: Serialize + DeserializeOwned + Validate + Send + 'static;

    /// Rules beyond field validation, checked before anything is read
    fn check_update(_payload: &Self::Update, _now: DateTime<Utc>) -> AppResult<()> {
        Ok(())
    }

    fn update_references(_payload: &Self::Update) -> Vec<Reference> {
        Vec::new()
    }

    /// `$set` document: every supplied (non-null) field
    fn changes(payload: Self::Update) -> AppResult<Document> {
        let mut doc = to_document(&payload)?;
        doc.retain(|_, value| !value.is_null());
        Ok(doc)
    }
}

/// Unwrap a field that validation has already required
pub fn required<T>(value: Option<T>, field: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::validation(format!("{field} is required")))
}

/// Stored form of a timestamp
pub fn timestamp(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Load every referenced record; the first missing one fails the request
pub async fn resolve_references(
    store: &Store,
    references: Vec<Reference>,
) -> AppResult<HashMap<&'static str, Document>> {
    let mut resolved = HashMap::with_capacity(references.len());
    for reference in references {
        let found = store
            .find_one(
                reference.collection,
                &Filter::eq(reference.id_field, reference.id.clone()),
            )
            .await?;
        match found {
            Some(doc) => {
                resolved.insert(reference.collection, doc);
            }
            None => {
                tracing::warn!(
                    resource = reference.resource,
                    id = %reference.id,
                    "Referenced record not found"
                );
                return Err(AppError::dangling_reference(reference.resource, reference.id));
            }
        }
    }
    Ok(resolved)
}

/// Fetch one record by domain id
pub async fn find_by_id<R: Resource>(store: &Store, id: &str) -> AppResult<R::Record> {
    store
        .find_one_as(R::COLLECTION, &Filter::eq(R::ID_FIELD, id))
        .await?
        .ok_or_else(|| R::not_found(id))
}

/// GET /<entity> - 获取全部记录
pub async fn list<R: Resource>(State(state): State<ServerState>) -> AppResult<Json<Vec<R::Record>>> {
    let records = state.store().find_as(R::COLLECTION, &Filter::all()).await?;
    Ok(Json(records))
}

/// GET /<entity>/{id} - 获取单条记录
pub async fn get_by_id<R: Resource>(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<R::Record>> {
    Ok(Json(find_by_id::<R>(state.store(), &id).await?))
}

/// POST /<entity> - 创建记录
pub async fn create<R: Creatable>(
    State(state): State<ServerState>,
    ValidJson(payload): ValidJson<R::Create>,
) -> AppResult<Json<R::Record>> {
    let store = state.store();
    let references = resolve_references(store, R::create_references(&payload)).await?;

    let ctx = CreateContext {
        id: new_record_id(),
        now: now_seconds(),
        references,
    };
    let record = R::build(payload, &ctx)?;
    store.insert(R::COLLECTION, &record).await?;

    tracing::info!(resource = R::RESOURCE, id = %ctx.id, "Record created");
    Ok(Json(record))
}

/// PATCH /<entity>/{id} - 更新记录 (不存在时插入)
pub async fn update<R: Updatable>(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<R::Update>,
) -> AppResult<Json<R::Record>> {
    let store = state.store();
    let now = now_seconds();

    R::check_update(&payload, now)?;
    resolve_references(store, R::update_references(&payload)).await?;

    let mut changes = R::changes(payload)?;
    changes.insert("updated_at".to_string(), timestamp(now));

    let filter = Filter::eq(R::ID_FIELD, id.clone());
    let outcome = store
        .update_one(R::COLLECTION, &filter, changes, true)
        .await?;
    tracing::info!(
        resource = R::RESOURCE,
        id = %id,
        matched = outcome.matched_count,
        modified = outcome.modified_count,
        upserted = outcome.upserted,
        "Record updated"
    );

    Ok(Json(find_by_id::<R>(store, &id).await?))
}
