//! In-process fake of the club REST API.
//!
//! Serves `api/<resource>` collections from memory, records every request
//! line, and is reached over real HTTP so the `reqwest` client is
//! exercised end to end.

#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, Query, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use dashmap::DashMap;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use tennisly_client::{ApiClient, ClientConfig};

#[derive(Default)]
pub struct FakeApi {
    tables: DashMap<String, DashMap<i64, Value>>,
    requests: Mutex<Vec<String>>,
    bodies: Mutex<Vec<Value>>,
    next_id: AtomicI64,
    /// When set, every request must carry `Authorization: Bearer <token>`.
    token: Option<String>,
    /// Answer lookups of missing ids with `200 null` instead of `404`.
    null_for_missing: bool,
    pub account: Mutex<Option<Value>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Rejects requests without `Authorization: Bearer <token>` with `401`.
    pub fn with_token(token: &str) -> Arc<Self> {
        Arc::new(Self {
            token: Some(token.to_string()),
            ..Self::default()
        })
    }

    /// Answers lookups of missing ids with `200 null`.
    pub fn with_null_for_missing() -> Arc<Self> {
        Arc::new(Self {
            null_for_missing: true,
            ..Self::default()
        })
    }

    pub fn seed(&self, resource: &str, record: Value) {
        let id = record["id"].as_i64().expect("seeded record needs an id");
        self.tables
            .entry(resource.to_string())
            .or_default()
            .insert(id, record);
    }

    pub fn get(&self, resource: &str, id: i64) -> Option<Value> {
        self.tables
            .get(resource)
            .and_then(|t| t.get(&id).map(|v| v.value().clone()))
    }

    /// Request lines such as `PUT /api/challenges/9` or
    /// `GET /api/cords?challengeId.specified=false`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// JSON bodies received by POST, PUT and PATCH, in order.
    pub fn bodies(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

pub fn router(api: Arc<FakeApi>) -> Router {
    Router::new()
        .route("/api/:resource", get(list_or_account).post(create_or_account))
        .route(
            "/api/:resource/:id",
            get(find_or_count)
                .put(update)
                .patch(partial_update)
                .delete(remove),
        )
        .layer(middleware::from_fn_with_state(api.clone(), record_and_authorize))
        .layer(TraceLayer::new_for_http())
        .with_state(api)
}

/// Starts the fake on an ephemeral port and returns its base URL.
pub async fn spawn(api: Arc<FakeApi>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(api);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub async fn client_for(api: Arc<FakeApi>, token: Option<&str>) -> ApiClient {
    let api_url = spawn(api).await;
    ApiClient::new(&ClientConfig {
        api_url,
        token: token.map(str::to_string),
    })
}

async fn record_and_authorize(
    State(api): State<Arc<FakeApi>>,
    request: Request,
    next: Next,
) -> Response {
    let line = format!("{} {}", request.method(), request.uri());
    api.requests.lock().unwrap().push(line);

    if let Some(token) = &api.token {
        let expected = format!("Bearer {token}");
        let sent = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        if sent != Some(expected.as_str()) {
            return StatusCode::UNAUTHORIZED.into_response();
        }
    }
    next.run(request).await
}

fn parse_body(api: &FakeApi, body: &Bytes) -> Result<Value, Response> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()).into_response())?;
    api.bodies.lock().unwrap().push(value.clone());
    Ok(value)
}

async fn list_or_account(
    State(api): State<Arc<FakeApi>>,
    Path(resource): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    if resource == "account" {
        return match api.account.lock().unwrap().clone() {
            Some(account) => Json(account).into_response(),
            None => StatusCode::UNAUTHORIZED.into_response(),
        };
    }

    let mut rows: Vec<Value> = api
        .tables
        .get(&resource)
        .map(|t| t.iter().map(|e| e.value().clone()).collect())
        .unwrap_or_default();
    rows.retain(|row| params.iter().all(|(k, v)| matches_filter(row, k, v)));
    rows.sort_by_key(|row| row["id"].as_i64());
    if params.iter().any(|(k, v)| k == "sort" && v.ends_with(",desc")) {
        rows.reverse();
    }
    let total = rows.len();

    let param = |name: &str| {
        params
            .iter()
            .find(|(k, _)| k == name)
            .and_then(|(_, v)| v.parse::<usize>().ok())
    };
    if let (Some(page), Some(size)) = (param("page"), param("size")) {
        rows = rows.into_iter().skip(page * size).take(size).collect();
    }

    let mut headers = HeaderMap::new();
    headers.insert("x-total-count", total.to_string().parse().unwrap());
    (headers, Json(Value::Array(rows))).into_response()
}

/// Supports `<field>.equals`, `<field>Id.equals`, `<field>.contains`
/// and `<field>.specified`. Paging and sort keys always match.
fn matches_filter(row: &Value, key: &str, value: &str) -> bool {
    let Some((field, op)) = key.split_once('.') else {
        return true;
    };
    let target = match field.strip_suffix("Id") {
        Some(reference) if row.get(field).is_none() => &row[reference]["id"],
        _ => &row[field],
    };
    let text = match target {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    match op {
        "equals" => text == value,
        "contains" => text.contains(value),
        "specified" => (!target.is_null()).to_string() == value,
        _ => true,
    }
}

async fn create_or_account(
    State(api): State<Arc<FakeApi>>,
    Path(resource): Path<String>,
    body: Bytes,
) -> Response {
    let mut record = match parse_body(&api, &body) {
        Ok(v) => v,
        Err(r) => return r,
    };
    if resource == "account" {
        *api.account.lock().unwrap() = Some(record);
        return StatusCode::OK.into_response();
    }
    if record.get("id").is_some_and(|id| !id.is_null()) {
        return (StatusCode::BAD_REQUEST, "A new entity cannot already have an ID").into_response();
    }
    let id = api.allocate_id();
    record["id"] = json!(id);
    api.seed(&resource, record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn find_or_count(
    State(api): State<Arc<FakeApi>>,
    Path((resource, id)): Path<(String, String)>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    if id == "count" {
        let count = api
            .tables
            .get(&resource)
            .map(|t| {
                t.iter()
                    .filter(|e| params.iter().all(|(k, v)| matches_filter(e.value(), k, v)))
                    .count()
            })
            .unwrap_or(0);
        return Json(json!(count)).into_response();
    }
    let Ok(id) = id.parse::<i64>() else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    match api.get(&resource, id) {
        Some(record) => Json(record).into_response(),
        None if api.null_for_missing => Json(Value::Null).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn check_id(record: &Value, id: i64) -> Result<(), Response> {
    match record["id"].as_i64() {
        None => Err((StatusCode::BAD_REQUEST, "Invalid id").into_response()),
        Some(body_id) if body_id != id => Err((StatusCode::BAD_REQUEST, "Invalid ID").into_response()),
        Some(_) => Ok(()),
    }
}

async fn update(
    State(api): State<Arc<FakeApi>>,
    Path((resource, id)): Path<(String, i64)>,
    body: Bytes,
) -> Response {
    let record = match parse_body(&api, &body).and_then(|r| check_id(&r, id).map(|_| r)) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    if api.get(&resource, id).is_none() {
        return StatusCode::NOT_FOUND.into_response();
    }
    api.seed(&resource, record.clone());
    Json(record).into_response()
}

async fn partial_update(
    State(api): State<Arc<FakeApi>>,
    Path((resource, id)): Path<(String, i64)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if content_type != "application/merge-patch+json" {
        return StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response();
    }
    let patch = match parse_body(&api, &body).and_then(|r| check_id(&r, id).map(|_| r)) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    let Some(mut record) = api.get(&resource, id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if let (Some(target), Value::Object(fields)) = (record.as_object_mut(), patch) {
        for (k, v) in fields {
            target.insert(k, v);
        }
    }
    api.seed(&resource, record.clone());
    Json(record).into_response()
}

async fn remove(
    State(api): State<Arc<FakeApi>>,
    Path((resource, id)): Path<(String, i64)>,
) -> Response {
    if let Some(table) = api.tables.get(&resource) {
        table.remove(&id);
    }
    StatusCode::NO_CONTENT.into_response()
}
