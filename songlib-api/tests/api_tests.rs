//! HTTP tests for the songlib-api router

mod helpers;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use helpers::{bohemian_details, insert_raw, memory_catalog, service, Behavior, StubEnricher};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use songlib_api::catalog::SqliteCatalog;
use songlib_api::{build_router, AppState};
use tower::ServiceExt;

async fn setup(behavior: Behavior) -> (Router, SqliteCatalog) {
    let catalog = memory_catalog().await;
    let svc = service(catalog.clone(), StubEnricher::new(behavior));
    (build_router(AppState::new(svc)), catalog)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = setup(Behavior::Malformed).await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "songlib-api");
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_add_then_filter_and_verses() {
    let (app, _) = setup(Behavior::Respond(bohemian_details())).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/songs/add",
        Some(json!({"group": "Queen", "song": "Bohemian Rhapsody"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/songs/filter",
        Some(json!({"song": "bohemian", "limit": 10, "offset": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let songs = body.as_array().unwrap();
    assert_eq!(songs.len(), 1);
    assert_eq!(songs[0]["id"], id);
    assert_eq!(songs[0]["group_name"], "Queen");
    assert_eq!(songs[0]["song_name"], "Bohemian Rhapsody");
    assert_eq!(songs[0]["release_date"], "1975-10-31");
    assert_eq!(songs[0]["link"], "http://example.com/bohemian");

    let (status, body) = send(&app, Method::GET, &format!("/songs/{}/verses?limit=1&offset=1", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": id, "verses": ["Is this just fantasy"]}));
}

#[tokio::test]
async fn test_add_failures() {
    let (app, catalog) = setup(Behavior::Status(500)).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/songs/add",
        Some(json!({"group": "Queen", "song": "Bohemian Rhapsody"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(error_code(&body), "UPSTREAM_ERROR");
    assert_eq!(helpers::song_count(&catalog).await, 0);

    let (status, body) = send(
        &app,
        Method::POST,
        "/songs/add",
        Some(json!({"group": "Nobody", "song": "Anything"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");

    let (status, body) = send(&app, Method::POST, "/songs/add", Some(json!({"group": "Queen"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "BAD_REQUEST");
}

#[tokio::test]
async fn test_filter_rejects_bad_date() {
    let (app, _) = setup(Behavior::Malformed).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/songs/filter",
        Some(json!({"release_date": "31.10.1975", "limit": 0, "offset": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("release_date"));
}

#[tokio::test]
async fn test_verses_fall_back_to_defaults() {
    let (app, catalog) = setup(Behavior::Malformed).await;
    let lyrics = (1..=12).map(|i| format!("verse {}", i)).collect::<Vec<_>>().join("\n\n");
    let id = insert_raw(&catalog, 1, "Long", None, Some(&lyrics), None).await;

    let (status, body) = send(&app, Method::GET, &format!("/songs/{}/verses?limit=abc&offset=-2", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let verses = body["verses"].as_array().unwrap();
    assert_eq!(verses.len(), 10);
    assert_eq!(verses[0], "verse 1");

    let (status, body) = send(&app, Method::GET, "/songs/999/verses", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");

    let (status, _) = send(&app, Method::GET, "/songs/abc/verses", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_reports_updated_fields() {
    let (app, catalog) = setup(Behavior::Malformed).await;
    let id = insert_raw(&catalog, 1, "Bohemian Rhapsody", Some("1975-10-31"), Some("text"), None).await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/songs/{}", id),
        Some(json!({"id": id, "link": "http://x", "song_name": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": id, "updated_fields": ["link"]}));

    let (status, body) = send(&app, Method::POST, "/songs/filter", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["song_name"], "Bohemian Rhapsody");
    assert_eq!(body[0]["text"], "text");
    assert_eq!(body[0]["link"], "http://x");

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/songs/{}", id),
        Some(json!({"id": id + 1, "link": "http://y"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::PATCH, "/songs/999", Some(json!({"link": "http://y"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/songs/{}", id),
        Some(json!({"group_id": 77})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_replace_and_delete() {
    let (app, catalog) = setup(Behavior::Malformed).await;
    let id = insert_raw(&catalog, 1, "Bohemian Rhapsody", Some("1975-10-31"), Some("text"), None).await;

    let replacement = json!({
        "id": id,
        "group_id": 2,
        "song_name": "Uprising",
        "text": "",
        "release_date": "2009-09-07",
        "link": "http://muse"
    });
    let (status, body) = send(&app, Method::PUT, "/songs/update", Some(replacement)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, body) = send(&app, Method::POST, "/songs/filter", Some(json!({"group": "Muse"}))).await;
    assert_eq!(body[0]["song_name"], "Uprising");
    assert_eq!(body[0]["text"], Value::Null);
    assert_eq!(body[0]["release_date"], "2009-09-07");

    let (status, _) = send(&app, Method::PUT, "/songs/update", Some(json!({"id": id}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::DELETE, &format!("/songs/delete?id={}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Song successfully deleted");

    let (status, _) = send(&app, Method::DELETE, &format!("/songs/delete?id={}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::DELETE, "/songs/delete?id=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid song ID");
}
