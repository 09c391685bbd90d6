//! In-memory stand-in for the feedly v3 API.
//!
//! Serves the tag, enterprise and trigger routes the client calls, rejects
//! requests without an `OAuth` authorization header, and records every
//! request it receives in a [`Journal`] so tests can check what went over
//! the wire.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "webhookURL")]
    pub webhook_url: String,
    #[serde(rename = "resourceId")]
    pub resource_id: String,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagEntries {
    #[serde(rename = "entryIds")]
    pub entry_ids: Vec<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagLabel {
    pub label: String,
}

/// Error payload in the shape the real API uses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "errorCode")]
    pub error_code: u16,
    #[serde(rename = "errorId")]
    pub error_id: String,
    #[serde(rename = "errorMessage")]
    pub error_message: String,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ErrorBody>)>;

fn api_error(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorBody>) {
    (
        status,
        Json(ErrorBody {
            error_code: status.as_u16(),
            error_id: format!("mock.{}", Uuid::new_v4()),
            error_message: message.to_string(),
        }),
    )
}

pub const OPML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<opml version="1.0">
  <head><title>Sandbox subscriptions</title></head>
  <body>
    <outline text="rust" title="rust">
      <outline type="rss" text="Rust Blog" xmlUrl="https://blog.rust-lang.org/feed.xml"/>
    </outline>
  </body>
</opml>
"#;

/// A request as the server received it.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Default)]
pub struct Journal(Arc<RwLock<Vec<RecordedRequest>>>);

impl Journal {
    async fn push(&self, request: RecordedRequest) {
        self.0.write().await.push(request);
    }

    pub async fn snapshot(&self) -> Vec<RecordedRequest> {
        self.0.read().await.clone()
    }

    /// Snapshot from outside the runtime, e.g. a blocking test thread.
    pub fn blocking_snapshot(&self) -> Vec<RecordedRequest> {
        self.0.blocking_read().clone()
    }
}

#[derive(Debug)]
pub struct Store {
    pub tags: Vec<Tag>,
    pub enterprise_tags: Vec<Tag>,
    pub taggings: BTreeMap<String, BTreeSet<String>>,
    pub triggers: Vec<Trigger>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            tags: vec![
                Tag {
                    id: "user/sandbox/tag/rust".to_string(),
                    label: Some("rust".to_string()),
                },
                Tag {
                    id: "user/sandbox/tag/global.saved".to_string(),
                    label: None,
                },
            ],
            enterprise_tags: vec![Tag {
                id: "enterprise/acme/tag/security".to_string(),
                label: Some("security".to_string()),
            }],
            taggings: BTreeMap::new(),
            triggers: Vec::new(),
        }
    }
}

#[derive(Clone, Default)]
pub struct AppState {
    pub store: Arc<RwLock<Store>>,
    pub journal: Journal,
}

impl AppState {
    /// Entries currently carrying `tag_id`, read from a blocking thread.
    pub fn blocking_tagged(&self, tag_id: &str) -> Vec<String> {
        self.store
            .blocking_read()
            .taggings
            .get(tag_id)
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/v3/tags", get(list_tags))
        .route(
            "/v3/tags/{tag_ids}",
            put(tag_entries).post(change_tag_label).delete(delete_tags),
        )
        .route("/v3/tags/{tag_ids}/{entry_ids}", delete(untag_entries))
        .route("/v3/enterprise/tags", get(list_enterprise_tags))
        .route("/v3/enterprise/collections", get(list_collections))
        .route("/v3/enterprise/users", get(list_users))
        .route("/v3/enterprise/triggers", get(list_triggers).post(upsert_trigger))
        .route("/v3/enterprise/triggers/{id}", delete(delete_trigger))
        .route("/v3/opml", get(opml))
        .layer(middleware::from_fn(require_token))
        .layer(middleware::from_fn_with_state(state.journal.clone(), record))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

async fn record(State(journal): State<Journal>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let Ok(bytes) = axum::body::to_bytes(body, usize::MAX).await else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    info!(method = %parts.method, uri = %parts.uri, "mock request");
    journal
        .push(RecordedRequest {
            method: parts.method.to_string(),
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            headers: parts
                .headers
                .iter()
                .map(|(k, v)| (k.as_str().to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
                .collect(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
        .await;
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

async fn require_token(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("OAuth "));
    if !authorized {
        return api_error(StatusCode::UNAUTHORIZED, "must provide an access token").into_response();
    }
    next.run(request).await
}

fn split_ids(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

async fn list_tags(State(state): State<AppState>) -> Json<Vec<Tag>> {
    Json(state.store.read().await.tags.clone())
}

async fn list_enterprise_tags(State(state): State<AppState>) -> Json<Vec<Tag>> {
    Json(state.store.read().await.enterprise_tags.clone())
}

async fn tag_entries(
    State(state): State<AppState>,
    Path(tag_ids): Path<String>,
    Json(input): Json<TagEntries>,
) -> StatusCode {
    let mut store = state.store.write().await;
    for tag_id in split_ids(&tag_ids) {
        if !store.tags.iter().any(|t| t.id == tag_id) {
            store.tags.push(Tag {
                id: tag_id.clone(),
                label: None,
            });
        }
        store
            .taggings
            .entry(tag_id)
            .or_default()
            .extend(input.entry_ids.iter().cloned());
    }
    StatusCode::OK
}

async fn untag_entries(
    State(state): State<AppState>,
    Path((tag_ids, entry_ids)): Path<(String, String)>,
) -> StatusCode {
    let entry_ids = split_ids(&entry_ids);
    let mut store = state.store.write().await;
    for tag_id in split_ids(&tag_ids) {
        if let Some(entries) = store.taggings.get_mut(&tag_id) {
            for entry_id in &entry_ids {
                entries.remove(entry_id);
            }
        }
    }
    StatusCode::OK
}

async fn change_tag_label(
    State(state): State<AppState>,
    Path(tag_id): Path<String>,
    Json(input): Json<TagLabel>,
) -> ApiResult<StatusCode> {
    let mut store = state.store.write().await;
    let tag = store
        .tags
        .iter_mut()
        .find(|t| t.id == tag_id)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "tag not found"))?;
    tag.label = Some(input.label);
    Ok(StatusCode::OK)
}

async fn delete_tags(State(state): State<AppState>, Path(tag_ids): Path<String>) -> StatusCode {
    let tag_ids = split_ids(&tag_ids);
    let mut store = state.store.write().await;
    store.tags.retain(|t| !tag_ids.contains(&t.id));
    for tag_id in &tag_ids {
        store.taggings.remove(tag_id);
    }
    StatusCode::OK
}

async fn list_collections() -> Json<serde_json::Value> {
    Json(serde_json::json!([
        {
            "id": "enterprise/acme/category/competitors",
            "label": "Competitors",
            "feeds": []
        }
    ]))
}

async fn list_users() -> Json<serde_json::Value> {
    Json(serde_json::json!([
        {"id": "c805fcbf-3acf-4302-a97e-d82f9d7c897f", "email": "ada@example.com"}
    ]))
}

async fn list_triggers(State(state): State<AppState>) -> Json<Vec<Trigger>> {
    Json(state.store.read().await.triggers.clone())
}

async fn upsert_trigger(
    State(state): State<AppState>,
    Json(mut input): Json<Trigger>,
) -> ApiResult<Json<Trigger>> {
    let mut store = state.store.write().await;
    match input.id.clone() {
        Some(id) => {
            let existing = store
                .triggers
                .iter_mut()
                .find(|t| t.id.as_deref() == Some(id.as_str()))
                .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "trigger not found"))?;
            *existing = input.clone();
        }
        None => {
            input.id = Some(format!("enterprise/acme/trigger/{}", Uuid::new_v4()));
            store.triggers.push(input.clone());
        }
    }
    Ok(Json(input))
}

async fn delete_trigger(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let mut store = state.store.write().await;
    let before = store.triggers.len();
    store.triggers.retain(|t| t.id.as_deref() != Some(id.as_str()));
    if store.triggers.len() == before {
        return Err(api_error(StatusCode::NOT_FOUND, "trigger not found"));
    }
    Ok(StatusCode::OK)
}

async fn opml() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/xml; charset=utf-8")], OPML)
}
