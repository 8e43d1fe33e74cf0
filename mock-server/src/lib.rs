//! In-memory Spring-style REST backend.
//!
//! Serves any resource name: records are JSON objects kept per resource in
//! insertion order. List endpoints answer with a page envelope
//! `{content, totalElements}` when `page` is given and with a bare array
//! otherwise. A second route set under `/mock` imitates a static fixture
//! directory (`{resource}[/id]/{verb}/index.json`).

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub type Db = Arc<RwLock<HashMap<String, Vec<Value>>>>;

const DEFAULT_PAGE_SIZE: usize = 20;

pub fn app() -> Router {
    app_with(Db::default())
}

pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/mock/{resource}/{verb}/index.json", any(fixture_collection))
        .route("/mock/{resource}/id/{verb}/index.json", any(fixture_record))
        .route(
            "/{resource}",
            get(list_records)
                .post(create_record)
                .patch(update_many)
                .delete(delete_many),
        )
        .route("/{resource}/by-ids", get(get_by_ids))
        .route(
            "/{resource}/{id}",
            get(get_record).patch(update_record).delete(delete_record),
        )
        .with_state(db)
}

/// Build a store pre-filled with `resource → records`.
pub fn seeded(data: HashMap<String, Vec<Value>>) -> Db {
    Arc::new(RwLock::new(data))
}

pub async fn run(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(db)).await
}

/// Error response with a Spring-like `{"message": ...}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(resource: &str, id: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("{resource} {id} not found"),
        }
    }

    fn unprocessable(message: &str) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

#[derive(Deserialize)]
pub struct IdsQuery {
    pub ids: String,
}

impl IdsQuery {
    fn ids(&self) -> Vec<&str> {
        self.ids.split(',').filter(|id| !id.is_empty()).collect()
    }
}

/// Page, sort, and equality filters parsed from a list query string.
#[derive(Debug, Default)]
struct ListQuery {
    page: Option<usize>,
    size: usize,
    sort: Option<(String, bool)>,
    filters: HashMap<String, Vec<String>>,
}

impl ListQuery {
    fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, ApiError> {
        let mut query = ListQuery {
            size: DEFAULT_PAGE_SIZE,
            ..Default::default()
        };
        for (key, value) in pairs {
            match key.as_str() {
                "page" => {
                    let page = value
                        .parse()
                        .map_err(|_| ApiError::unprocessable("page must be a number"))?;
                    query.page = Some(page);
                }
                "size" => {
                    query.size = value
                        .parse()
                        .map_err(|_| ApiError::unprocessable("size must be a number"))?;
                }
                "sort" => {
                    let (field, order) = value.split_once(',').unwrap_or((value.as_str(), "ASC"));
                    let descending = order.eq_ignore_ascii_case("DESC");
                    query.sort = Some((field.to_string(), descending));
                }
                _ => query.filters.entry(key).or_default().push(value),
            }
        }
        Ok(query)
    }

    /// Every filter key must match one of its values.
    fn matches(&self, record: &Value) -> bool {
        self.filters.iter().all(|(field, values)| {
            record
                .get(field)
                .map(field_text)
                .is_some_and(|text| values.contains(&text))
        })
    }
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn id_matches(record: &Value, id: &str) -> bool {
    record.get("id").map(field_text).as_deref() == Some(id)
}

fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) => field_text(x).cmp(&field_text(y)),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn merge(record: &mut Value, patch: &Map<String, Value>) {
    if let Value::Object(fields) = record {
        for (key, value) in patch {
            if key != "id" {
                fields.insert(key.clone(), value.clone());
            }
        }
    }
}

fn into_object(body: Value) -> Result<Map<String, Value>, ApiError> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::unprocessable("body must be a JSON object")),
    }
}

async fn list_records(
    State(db): State<Db>,
    Path(resource): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Value>, ApiError> {
    let query = ListQuery::from_pairs(pairs)?;
    let store = db.read().await;
    let mut matched: Vec<Value> = store
        .get(&resource)
        .map(|records| records.iter().filter(|r| query.matches(r)).cloned().collect())
        .unwrap_or_default();

    if let Some((field, descending)) = &query.sort {
        matched.sort_by(|a, b| {
            let ordering = compare_field(a.get(field), b.get(field));
            if *descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }

    match query.page {
        Some(page) => {
            let total = matched.len();
            let content: Vec<Value> = matched
                .into_iter()
                .skip(page.saturating_mul(query.size))
                .take(query.size)
                .collect();
            Ok(Json(json!({
                "content": content,
                "totalElements": total,
                "number": page,
                "size": query.size,
            })))
        }
        None => Ok(Json(Value::Array(matched))),
    }
}

async fn get_by_ids(
    State(db): State<Db>,
    Path(resource): Path<String>,
    Query(query): Query<IdsQuery>,
) -> Json<Vec<Value>> {
    let ids = query.ids();
    let store = db.read().await;
    let found = store
        .get(&resource)
        .map(|records| {
            records
                .iter()
                .filter(|r| ids.iter().any(|id| id_matches(r, id)))
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    Json(found)
}

async fn create_record(
    State(db): State<Db>,
    Path(resource): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut fields = into_object(body)?;
    fields
        .entry("id")
        .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
    let record = Value::Object(fields);
    tracing::debug!(%resource, "created record");
    db.write()
        .await
        .entry(resource)
        .or_default()
        .push(record.clone());
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_record(
    State(db): State<Db>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let store = db.read().await;
    store
        .get(&resource)
        .and_then(|records| records.iter().find(|r| id_matches(r, &id)))
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found(&resource, &id))
}

async fn update_record(
    State(db): State<Db>,
    Path((resource, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let patch = into_object(body)?;
    let mut store = db.write().await;
    let record = store
        .get_mut(&resource)
        .and_then(|records| records.iter_mut().find(|r| id_matches(r, &id)))
        .ok_or_else(|| ApiError::not_found(&resource, &id))?;
    merge(record, &patch);
    Ok(Json(record.clone()))
}

async fn update_many(
    State(db): State<Db>,
    Path(resource): Path<String>,
    Query(query): Query<IdsQuery>,
    Json(body): Json<Value>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let patch = into_object(body)?;
    let ids = query.ids();
    let mut store = db.write().await;
    let mut updated = Vec::new();
    if let Some(records) = store.get_mut(&resource) {
        for record in records
            .iter_mut()
            .filter(|r| ids.iter().any(|id| id_matches(r, id)))
        {
            merge(record, &patch);
            updated.push(record["id"].clone());
        }
    }
    tracing::debug!(%resource, count = updated.len(), "updated records");
    Ok(Json(updated))
}

async fn delete_record(
    State(db): State<Db>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let mut store = db.write().await;
    let records = store
        .get_mut(&resource)
        .ok_or_else(|| ApiError::not_found(&resource, &id))?;
    let index = records
        .iter()
        .position(|r| id_matches(r, &id))
        .ok_or_else(|| ApiError::not_found(&resource, &id))?;
    tracing::debug!(%resource, %id, "deleted record");
    Ok(Json(records.remove(index)))
}

async fn delete_many(
    State(db): State<Db>,
    Path(resource): Path<String>,
    Query(query): Query<IdsQuery>,
) -> Json<Vec<Value>> {
    let ids = query.ids();
    let mut store = db.write().await;
    let mut removed = Vec::new();
    if let Some(records) = store.get_mut(&resource) {
        records.retain(|r| {
            let hit = ids.iter().any(|id| id_matches(r, id));
            if hit {
                removed.push(r["id"].clone());
            }
            !hit
        });
    }
    tracing::debug!(%resource, count = removed.len(), "deleted records");
    Json(removed)
}

/// `/mock/{resource}/{verb}/index.json`: the whole collection for `get`,
/// the first record for any other verb.
async fn fixture_collection(
    State(db): State<Db>,
    Path((resource, verb)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let store = db.read().await;
    let records = store.get(&resource).cloned().unwrap_or_default();
    match verb.as_str() {
        "get" => Ok(Json(Value::Array(records))),
        "post" | "patch" | "delete" => first_record(records, &resource),
        _ => Err(ApiError::not_found(&resource, &verb)),
    }
}

/// `/mock/{resource}/id/{verb}/index.json`: the first record, whatever id
/// the caller had in mind.
async fn fixture_record(
    State(db): State<Db>,
    Path((resource, verb)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    if !matches!(verb.as_str(), "get" | "post" | "patch" | "delete") {
        return Err(ApiError::not_found(&resource, &verb));
    }
    let store = db.read().await;
    first_record(store.get(&resource).cloned().unwrap_or_default(), &resource)
}

fn first_record(records: Vec<Value>, resource: &str) -> Result<Json<Value>, ApiError> {
    records
        .into_iter()
        .next()
        .map(Json)
        .ok_or_else(|| ApiError::not_found(resource, "fixture"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn list_query_separates_reserved_keys() {
        let query = ListQuery::from_pairs(pairs(&[
            ("page", "2"),
            ("size", "5"),
            ("sort", "name,DESC"),
            ("role", "admin"),
            ("role", "owner"),
        ]))
        .unwrap();
        assert_eq!(query.page, Some(2));
        assert_eq!(query.size, 5);
        assert_eq!(query.sort, Some(("name".to_string(), true)));
        assert_eq!(query.filters["role"], vec!["admin", "owner"]);
    }

    #[test]
    fn list_query_defaults() {
        let query = ListQuery::from_pairs(Vec::new()).unwrap();
        assert_eq!(query.page, None);
        assert_eq!(query.size, DEFAULT_PAGE_SIZE);
        assert!(query.sort.is_none());
    }

    #[test]
    fn list_query_rejects_non_numeric_page() {
        assert!(ListQuery::from_pairs(pairs(&[("page", "first")])).is_err());
    }

    #[test]
    fn filters_compare_field_text() {
        let query = ListQuery::from_pairs(pairs(&[("age", "30"), ("active", "true")])).unwrap();
        assert!(query.matches(&json!({"age": 30, "active": true})));
        assert!(!query.matches(&json!({"age": 31, "active": true})));
        assert!(!query.matches(&json!({"active": true})));
    }

    #[test]
    fn ids_match_numbers_and_strings() {
        assert!(id_matches(&json!({"id": 7}), "7"));
        assert!(id_matches(&json!({"id": "a-1"}), "a-1"));
        assert!(!id_matches(&json!({"name": "x"}), "7"));
    }

    #[test]
    fn numeric_sort_is_numeric() {
        let a = json!({"n": 9});
        let b = json!({"n": 10});
        assert_eq!(compare_field(a.get("n"), b.get("n")), Ordering::Less);
    }

    #[test]
    fn merge_keeps_id() {
        let mut record = json!({"id": 1, "name": "old"});
        let patch = into_object(json!({"id": 99, "name": "new"})).unwrap();
        merge(&mut record, &patch);
        assert_eq!(record, json!({"id": 1, "name": "new"}));
    }

    #[test]
    fn ids_query_skips_empty_segments() {
        let query = IdsQuery {
            ids: "1,,2".to_string(),
        };
        assert_eq!(query.ids(), vec!["1", "2"]);
    }
}
