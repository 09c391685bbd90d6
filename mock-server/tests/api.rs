use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, AppState, ErrorBody, Tag, Trigger};
use tower::ServiceExt;

const AUTH: &str = "OAuth sandbox-token";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, AUTH)
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, AUTH)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_token_returns_401_json() {
    let resp = app(AppState::default())
        .oneshot(Request::builder().uri("/v3/tags").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let err: ErrorBody = body_json(resp).await;
    assert_eq!(err.error_code, 401);
}

// --- tags ---

#[tokio::test]
async fn list_tags_returns_seeded_tags() {
    let resp = app(AppState::default()).oneshot(request("GET", "/v3/tags")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let tags: Vec<Tag> = body_json(resp).await;
    assert_eq!(tags[0].id, "user/sandbox/tag/rust");
}

#[tokio::test]
async fn tag_entries_accepts_escaped_ids() {
    let state = AppState::default();
    let resp = app(state.clone())
        .oneshot(json_request(
            "PUT",
            "/v3/tags/user%2Fsandbox%2Ftag%2Frust",
            r#"{"entryIds":["e1","e2"]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());
    let store = state.store.read().await;
    let entries: Vec<&String> = store.taggings["user/sandbox/tag/rust"].iter().collect();
    assert_eq!(entries, vec!["e1", "e2"]);
}

#[tokio::test]
async fn tag_entries_rejects_unknown_fields() {
    let resp = app(AppState::default())
        .oneshot(json_request("PUT", "/v3/tags/t1", r#"{"entries":["e1"]}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn change_label_of_unknown_tag_returns_404() {
    let resp = app(AppState::default())
        .oneshot(json_request("POST", "/v3/tags/nope", r#"{"label":"x"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: ErrorBody = body_json(resp).await;
    assert_eq!(err.error_message, "tag not found");
}

// --- triggers ---

#[tokio::test]
async fn delete_unknown_trigger_returns_404() {
    let resp = app(AppState::default())
        .oneshot(request("DELETE", "/v3/enterprise/triggers/123"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn trigger_lifecycle() {
    use tower::Service;

    let mut app = app(AppState::default()).into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/v3/enterprise/triggers",
            r#"{"type":"NewAnnotation","webhookURL":"https://localhost:3000/webhooks","resourceId":"global.all","disabled":false}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Trigger = body_json(resp).await;
    let id = created.id.clone().unwrap();

    // list
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", "/v3/enterprise/triggers"))
        .await
        .unwrap();
    let triggers: Vec<Trigger> = body_json(resp).await;
    assert_eq!(triggers, vec![created]);

    // delete (ids contain slashes, so they travel escaped)
    let escaped = id.replace('/', "%2F");
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("DELETE", &format!("/v3/enterprise/triggers/{escaped}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // list after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", "/v3/enterprise/triggers"))
        .await
        .unwrap();
    let triggers: Vec<Trigger> = body_json(resp).await;
    assert!(triggers.is_empty());
}

// --- opml ---

#[tokio::test]
async fn opml_is_served_as_xml() {
    let resp = app(AppState::default()).oneshot(request("GET", "/v3/opml")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers()[http::header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/xml"));
    assert!(body_bytes(resp).await.starts_with(b"<?xml"));
}

// --- journal ---

#[tokio::test]
async fn journal_records_method_query_and_body() {
    let state = AppState::default();
    app(state.clone())
        .oneshot(json_request("PUT", "/v3/tags/t1?x=1", r#"{"entryIds":["e1"]}"#))
        .await
        .unwrap();

    let journal = state.journal.snapshot().await;
    assert_eq!(journal.len(), 1);
    assert_eq!(journal[0].method, "PUT");
    assert_eq!(journal[0].path, "/v3/tags/t1");
    assert_eq!(journal[0].query.as_deref(), Some("x=1"));
    assert_eq!(journal[0].body, r#"{"entryIds":["e1"]}"#);
    assert_eq!(journal[0].header("authorization"), Some(AUTH));
}
