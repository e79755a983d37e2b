use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use dictio_core::protocol::{identity::USER_HEADER, router};
use dictio_core::state::AppState;
use dictio_core::store::Store;
use http_body_util::BodyExt;
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

fn test_app() -> Router {
    router(AppState::new(Store::in_memory()))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, JsonValue) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.expect("collect body").to_bytes();
    let json: JsonValue = serde_json::from_slice(&bytes).expect("valid JSON response");
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, user: Option<&str>, body: JsonValue) -> Request<Body> {
    let mut b = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(u) = user {
        b = b.header(USER_HEADER, u);
    }
    b.body(Body::from(body.to_string())).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder().method("DELETE").uri(uri).body(Body::empty()).unwrap()
}

async fn register(app: &Router) -> String {
    let (status, user) = send(
        app,
        post_json("/users", None, json!({ "username": "ana", "email": "ana@example.org" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    user["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_check_ok() {
    let app = test_app();
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["entries"], 0);
    for field in ["users", "reads", "commits", "aborts"] {
        assert!(body[field].is_u64(), "missing {field}");
    }
}

#[tokio::test]
async fn search_without_query_is_bad_request() {
    let app = test_app();

    let (status, body) = send(&app, get("/d/search")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Resource undefined");

    // browse page tolerates a missing query
    let (status, body) = send(&app, get("/d")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entries"], json!([]));
}

#[tokio::test]
async fn create_search_view_delete_roundtrip() {
    let app = test_app();
    let user = register(&app).await;

    let (status, created) = send(
        &app,
        post_json(
            "/d/definition",
            Some(&user),
            json!({ "entrySubmission": "casa@spanish", "mirrorSubmission": "house@english" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["outcome"], "new");
    assert_eq!(created["message"], "Node made");
    assert_eq!(created["entry"]["mirrorLanguage"], "english");
    assert_eq!(created["mirror"]["mirror"], "casa");
    let node = created["definitionNode"].as_str().unwrap().to_string();

    let (status, again) = send(
        &app,
        post_json(
            "/d/definition",
            Some(&user),
            json!({ "entrySubmission": "casa@spanish", "mirrorSubmission": "house@english" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["outcome"], "tenured");
    assert_eq!(again["definitionNode"], node.as_str());

    let (status, found) = send(&app, get("/d/search?q=Casa%40spanish")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["success"], true);
    assert_eq!(found["entries"].as_array().unwrap().len(), 1);

    let (status, def) = send(&app, get(&format!("/d/definition/{node}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(def["entries"].as_array().unwrap().len(), 2);
    assert_eq!(def["author"]["username"], "ana");

    let entry_id = created["entry"]["id"].as_str().unwrap();
    let (status, gone) = send(&app, delete(&format!("/d/definition/{entry_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(gone["deleted"], 2);
    assert_eq!(gone["message"], "Entry deleted.");

    let (status, _) = send(&app, get(&format!("/d/definition/{node}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, found) = send(&app, get("/d/search?q=casa")).await;
    assert_eq!(found["entries"], json!([]));
}

#[tokio::test]
async fn submission_errors_map_to_statuses() {
    let app = test_app();
    let user = register(&app).await;

    let (status, body) = send(
        &app,
        post_json("/d/definition", Some(&user), json!({ "entrySubmission": "@spanish" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_SUBMISSION");

    let (status, body) = send(
        &app,
        post_json("/d/definition", None, json!({ "entrySubmission": "casa@spanish" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "USER_NOT_FOUND");

    let (status, body) = send(
        &app,
        post_json("/d/definition", Some(&user), json!({ "entrySubmission": "casa@spanish" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_FAILED");
    assert_eq!(body["details"][0]["field"], "mirror");

    let (_, health) = send(&app, get("/health")).await;
    assert_eq!(health["entries"], 0);
}

#[tokio::test]
async fn sanitizer_runs_before_parsing() {
    let app = test_app();
    let user = register(&app).await;

    let (status, created) = send(
        &app,
        post_json(
            "/d/definition",
            Some(&user),
            json!({ "entrySubmission": "<b>casa</b>@spanish", "mirrorSubmission": "house${}@english" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["entry"]["index"], "bcasa/b");
    assert_eq!(created["mirror"]["index"], "house");
}

#[tokio::test]
async fn search_in_unknown_language_is_empty() {
    let app = test_app();
    let (status, body) = send(&app, get("/d/search?q=casa%40elvish")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["entries"], json!([]));
}

#[tokio::test]
async fn mistyped_body_is_invalid_submission() {
    let app = test_app();
    let user = register(&app).await;

    let (status, body) = send(
        &app,
        post_json("/d/definition", Some(&user), json!({ "entrySubmission": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "INVALID_SUBMISSION");

    // no content-type
    let req = Request::builder()
        .method("POST")
        .uri("/users")
        .body(Body::from(json!({ "username": "bo", "email": "bo@example.org" }).to_string()))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_SUBMISSION");

    let (status, body) = send(
        &app,
        post_json("/d/definition", Some(&user), json!({ "entrySubmission": "casa@spanish", "mirrorSubmission": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Blank mirror language submission");
}

#[tokio::test]
async fn delete_unknown_is_not_found() {
    let app = test_app();
    let (status, body) = send(&app, delete("/d/definition/000000000000000000000000")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn registration_rejects_bad_email() {
    let app = test_app();
    let (status, body) = send(
        &app,
        post_json("/users", None, json!({ "username": "ana", "email": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "email");
}

#[tokio::test]
async fn shared_state_is_visible_across_requests() {
    let state: Arc<AppState> = AppState::new(Store::in_memory());
    let app = router(state.clone());
    register(&app).await;
    assert_eq!(state.store.stats().await.users, 1);
}
