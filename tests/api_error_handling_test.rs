use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use noshelf::config::Config;
use noshelf::{db, server};
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot`

async fn setup_app(config: Config) -> Router {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    server::build_router(db, &config)
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().uri(uri).method(method);
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_app(Config::default()).await;

    let (status, body) = call(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_unknown_status_filter_is_bad_request() {
    let app = setup_app(Config::default()).await;

    let (status, body) = call(&app, "GET", "/api/copies?status=LOST", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("LOST"));

    let (status, _) = call(&app, "GET", "/api/requests?status=CANCELLED", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Dead values are still part of the closed set
    let (status, body) = call(&app, "GET", "/api/requests?status=DELIVERED", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_unknown_condition_is_bad_request() {
    let app = setup_app(Config::default()).await;

    let (_, user) = call(
        &app,
        "POST",
        "/api/users",
        Some(json!({ "name": "Ana", "email": "ana@test.com", "city": "Porto" })),
    )
    .await;
    let (_, book) = call(
        &app,
        "POST",
        "/api/books",
        Some(json!({ "title": "Sphere", "author": "Michael Crichton", "isbn": "111" })),
    )
    .await;

    let (status, _) = call(
        &app,
        "POST",
        "/api/copies",
        Some(json!({
            "book_id": book["book"]["id"],
            "owner_id": user["user"]["id"],
            "condition": "MINT",
            "location": "Porto"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = call(&app, "GET", "/api/copies", None).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_copy_for_missing_book_is_not_found() {
    let app = setup_app(Config::default()).await;

    let (_, user) = call(
        &app,
        "POST",
        "/api/users",
        Some(json!({ "name": "Ana", "email": "ana@test.com", "city": "Porto" })),
    )
    .await;

    let (status, _) = call(
        &app,
        "POST",
        "/api/copies",
        Some(json!({ "book_id": 42, "owner_id": user["user"]["id"], "location": "Porto" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = setup_app(Config::default()).await;
    let payload = json!({ "name": "Ana", "email": "ana@test.com" });

    let (status, _) = call(&app, "POST", "/api/users", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(&app, "POST", "/api/users", Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "email already registered");
}

#[tokio::test]
async fn test_required_actor_is_enforced() {
    let config = Config {
        require_actor: true,
        ..Config::default()
    };
    let app = setup_app(config).await;

    let (status, body) = call(&app, "PUT", "/api/requests/1/accept", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid argument: actor_id is required");

    let (status, _) = call(&app, "PUT", "/api/requests/1/accept?actor_id=7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_request_body_is_bad_request() {
    let app = setup_app(Config::default()).await;

    // Missing requester_id
    let (status, body) = call(&app, "POST", "/api/requests", Some(json!({ "copy_id": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid argument:")
    );

    // Wrong type
    let (status, body) = call(
        &app,
        "POST",
        "/api/requests",
        Some(json!({ "copy_id": "x", "requester_id": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = call(
        &app,
        "POST",
        "/api/requests/1/messages",
        Some(json!({ "sender_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_malformed_query_and_path_are_bad_request() {
    let app = setup_app(Config::default()).await;

    let (status, body) = call(&app, "PUT", "/api/requests/1/accept?actor_id=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = call(&app, "GET", "/api/requests/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
