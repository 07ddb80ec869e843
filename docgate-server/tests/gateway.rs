//! End-to-end tests driving the router against the in-memory backends.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use docgate_memory::{MemoryCache, MemoryStore};
use docgate_server::{AppState, build_router, models};

fn app() -> Router {
    let registry = Arc::new(models::registry().unwrap());
    build_router(
        AppState::new(
            registry,
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryCache::new()),
        ),
        "client",
    )
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_body(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn seed_skills(app: &Router) {
    for (id, title, level) in [("js", "JavaScript", 4), ("rs", "Rust", 5), ("hs", "Haskell", 2)] {
        let (status, _) = send(
            app,
            with_body(
                "POST",
                "/api/resources/skills",
                &json!({ "_id": id, "title": title, "level": level }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn create_then_list_wraps_results_in_an_envelope() {
    let app = app();

    let (status, created) = send(
        &app,
        with_body(
            "POST",
            "/api/resources/services",
            &json!({ "icon": "gear", "title": "Backend", "description": "APIs" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(created["_id"].is_string());

    let (status, body) = send(&app, get("/api/resources/services")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["_count"], 1);
    assert_eq!(body["_total"], 1);
    assert_eq!(body["_result"][0]["title"], "Backend");
    let current = body["_links"]["self"].as_str().unwrap();
    assert!(current.ends_with("/api/resources/services?limit=20&page=0"));
}

#[tokio::test]
async fn invalid_body_is_rejected_with_the_offending_fields() {
    let app = app();

    let (status, body) = send(
        &app,
        with_body("POST", "/api/resources/services", &json!({ "icon": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"], json!(["description", "icon", "title"]));
}

#[tokio::test]
async fn unknown_resource_segments_are_404() {
    let app = app();
    let (status, _) = send(&app, get("/api/resources/widgets")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        with_body("POST", "/api/resources/widgets", &json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn read_by_id_miss_is_a_null_body() {
    let app = app();
    let (status, body) = send(&app, get("/api/resources/services/absent")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn list_applies_filter_sort_and_pagination_with_links() {
    let app = app();
    seed_skills(&app).await;

    let (status, body) = send(
        &app,
        get("/api/resources/skills?level=gte:3&_sort=-level&_limit=1"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["_count"], 1);
    assert_eq!(body["_total"], 2);
    assert_eq!(body["_result"][0]["title"], "Rust");

    let next = body["_links"]["next"].as_str().unwrap();
    assert!(next.contains("sort=-level&limit=1&page=1"));
    assert_eq!(body["_links"]["prev"], "");

    let (_, second) = send(
        &app,
        get("/api/resources/skills?level=gte:3&_sort=-level&_limit=1&_page=1"),
    )
    .await;
    assert_eq!(second["_result"][0]["title"], "JavaScript");
    let prev = second["_links"]["prev"].as_str().unwrap();
    assert!(prev.contains("sort=-level&limit=1&page=0"));
}

#[tokio::test]
async fn chained_operator_filters_flow_through() {
    let app = app();
    seed_skills(&app).await;

    let (_, body) = send(&app, get("/api/resources/skills?level=gt:2:lt:5")).await;
    assert_eq!(body["_total"], 1);
    assert_eq!(body["_result"][0]["_id"], "js");
}

#[tokio::test]
async fn update_by_id_returns_the_previous_document() {
    let app = app();
    seed_skills(&app).await;

    let (status, previous) = send(
        &app,
        with_body("PUT", "/api/resources/skills/js", &json!({ "level": 9 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(previous["level"], 4);

    let (_, current) = send(&app, get("/api/resources/skills/js")).await;
    assert_eq!(current["level"], 9);
}

#[tokio::test]
async fn bulk_update_and_delete_report_counts() {
    let app = app();
    seed_skills(&app).await;

    let (status, outcome) = send(
        &app,
        with_body(
            "PUT",
            "/api/resources/skills?level=gte:4",
            &json!({ "level": 5 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["matchedCount"], 2);
    assert_eq!(outcome["modifiedCount"], 1);

    let (status, outcome) = send(&app, delete("/api/resources/skills?level=lt:3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["deletedCount"], 1);

    let (_, body) = send(&app, get("/api/resources/skills")).await;
    assert_eq!(body["_total"], 2);
}

#[tokio::test]
async fn delete_by_id_returns_the_removed_document() {
    let app = app();
    seed_skills(&app).await;

    let (_, removed) = send(&app, delete("/api/resources/skills/hs")).await;
    assert_eq!(removed["title"], "Haskell");

    let (_, again) = send(&app, delete("/api/resources/skills/hs")).await;
    assert_eq!(again, Value::Null);
}

#[tokio::test]
async fn cached_list_reads_are_stale_until_expiry() {
    let app = app();
    seed_skills(&app).await;

    let (_, first) = send(&app, get("/api/resources/skills")).await;
    assert_eq!(first["_total"], 3);
    // Population runs off the request path.
    tokio::time::sleep(Duration::from_millis(50)).await;

    send(
        &app,
        with_body(
            "POST",
            "/api/resources/skills",
            &json!({ "_id": "go", "title": "Go", "level": 3 }),
        ),
    )
    .await;

    let (_, cached) = send(&app, get("/api/resources/skills")).await;
    assert_eq!(cached["_total"], 3);

    // A different URL is a different cache key and sees the write.
    let (_, fresh) = send(&app, get("/api/resources/skills?_page=0")).await;
    assert_eq!(fresh["_total"], 4);
}

#[tokio::test]
async fn projection_applies_to_reads_by_id() {
    let app = app();
    seed_skills(&app).await;

    let (_, body) = send(
        &app,
        get("/api/resources/skills/rs?_projection=title"),
    )
    .await;
    assert_eq!(body["title"], "Rust");
    assert!(body.get("level").is_none());
}
