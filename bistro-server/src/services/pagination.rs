//! Pagination Shaper
//!
//! Paged lists group the whole collection into a single row that carries the
//! total and every record, then slice the requested window out of it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{AppError, AppResult};
use crate::db::{Accumulator, Pipeline, Projection, Stage, Store, from_document};

pub const DEFAULT_RECORD_PER_PAGE: usize = 10;
pub const DEFAULT_PAGE: usize = 1;

/// `?recordPerPage=&page=` as sent by clients
///
/// Values are kept raw: anything that is not a positive integer falls back to
/// the default instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(rename = "recordPerPage")]
    pub record_per_page: Option<String>,
    pub page: Option<String>,
}

fn positive_or(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v >= 1)
        .map(|v| v as usize)
        .unwrap_or(default)
}

/// Resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub record_per_page: usize,
    pub page: usize,
}

impl PageRequest {
    pub fn new(record_per_page: usize, page: usize) -> Self {
        Self {
            record_per_page: record_per_page.max(1),
            page: page.max(1),
        }
    }

    /// 0, 10, 20 ...
    pub fn start_index(&self) -> usize {
        (self.page - 1).saturating_mul(self.record_per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_RECORD_PER_PAGE, DEFAULT_PAGE)
    }
}

impl From<&PageQuery> for PageRequest {
    fn from(query: &PageQuery) -> Self {
        Self::new(
            positive_or(query.record_per_page.as_deref(), DEFAULT_RECORD_PER_PAGE),
            positive_or(query.page.as_deref(), DEFAULT_PAGE),
        )
    }
}

/// One page of records plus the size of the whole collection
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub total_count: u64,
    pub items: Vec<T>,
}

impl<T: Serialize> Page<T> {
    /// `{ "total_count": n, "<items_key>": [...] }`
    pub fn into_body(self, items_key: &str) -> AppResult<Value> {
        let mut body = serde_json::Map::new();
        body.insert("total_count".to_string(), Value::from(self.total_count));
        body.insert(
            items_key.to_string(),
            serde_json::to_value(self.items).map_err(|e| AppError::internal(e.to_string()))?,
        );
        Ok(Value::Object(body))
    }
}

fn page_pipeline(request: PageRequest) -> Pipeline {
    Pipeline::new()
        .stage(Stage::Group {
            key: Vec::new(),
            accumulators: vec![
                ("total_count".to_string(), Accumulator::Count),
                ("data".to_string(), Accumulator::PushRoot),
            ],
        })
        .stage(Stage::Project(vec![
            ("total_count".to_string(), Projection::Include),
            (
                "items".to_string(),
                Projection::Slice {
                    path: "data".to_string(),
                    start: request.start_index(),
                    len: request.record_per_page,
                },
            ),
        ]))
}

#[derive(Deserialize)]
struct PageRow {
    total_count: u64,
    items: Vec<serde_json::Map<String, Value>>,
}

/// Page through a whole collection in insertion order
///
/// An empty collection produces no group; that is reported as an empty page
/// with `total_count = 0`.
pub async fn paginate<T: DeserializeOwned>(
    store: &Store,
    collection: &str,
    request: PageRequest,
) -> AppResult<Page<T>> {
    let rows = store.aggregate(collection, &page_pipeline(request)).await?;

    let Some(row) = rows.into_iter().next() else {
        return Ok(Page {
            total_count: 0,
            items: Vec::new(),
        });
    };

    let row: PageRow = from_document(row)?;
    let items = row
        .items
        .into_iter()
        .map(from_document)
        .collect::<Result<Vec<T>, _>>()?;

    Ok(Page {
        total_count: row.total_count,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_query_defaults() {
        let query = |rpp: Option<&str>, page: Option<&str>| PageQuery {
            record_per_page: rpp.map(str::to_string),
            page: page.map(str::to_string),
        };

        assert_eq!(PageRequest::from(&query(None, None)), PageRequest::new(10, 1));
        assert_eq!(
            PageRequest::from(&query(Some("0"), Some("-3"))),
            PageRequest::new(10, 1)
        );
        assert_eq!(
            PageRequest::from(&query(Some("abc"), Some("2.5"))),
            PageRequest::new(10, 1)
        );
        assert_eq!(
            PageRequest::from(&query(Some("25"), Some("3"))),
            PageRequest::new(25, 3)
        );
        assert_eq!(PageRequest::new(25, 3).start_index(), 50);
    }

    #[tokio::test]
    async fn test_empty_collection_is_empty_page() {
        let store = Store::in_memory();
        let page: Page<Value> = paginate(&store, "foods", PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_count, 0);
        assert!(page.items.is_empty());

        let body = page.into_body("food_items").unwrap();
        assert_eq!(body, json!({"total_count": 0, "food_items": []}));
    }

    #[tokio::test]
    async fn test_second_page_of_two() {
        let store = Store::in_memory();
        for n in 0..5 {
            store.insert("foods", &json!({"n": n})).await.unwrap();
        }

        let page: Page<Value> = paginate(&store, "foods", PageRequest::new(2, 2))
            .await
            .unwrap();
        assert_eq!(page.total_count, 5);
        assert_eq!(page.items, vec![json!({"n": 2}), json!({"n": 3})]);

        let past_end: Page<Value> = paginate(&store, "foods", PageRequest::new(2, 9))
            .await
            .unwrap();
        assert_eq!(past_end.total_count, 5);
        assert!(past_end.items.is_empty());
    }
}
