//! Integration tests for the cadenza HTTP API.
//!
//! Each test builds the router over a fresh in-memory catalog and drives it
//! with `oneshot` requests.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

use cadenza_core::schema::Database;
use cadenza_core::Catalog;
use cadenza_server::{build_router, AppState};

/// Test helper: router over an empty in-memory catalog
fn setup_app() -> Router {
    let db = Database::open_in_memory().expect("Should open in-memory database");
    build_router(AppState::new(Catalog::new(db)))
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Send a request and return the status and parsed JSON body (Null when empty).
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn brahms_first() -> Value {
    json!({
        "name": "Symphony No. 1",
        "keySignature": "CMinor",
        "numberOfMovements": 4,
        "format": "Symphony",
        "composerName": "Brahms"
    })
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app();
    let (status, body) = send(&app, empty_request("GET", "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "cadenza");
}

#[tokio::test]
async fn test_create_then_duplicate_conflicts() {
    let app = setup_app();

    let (status, created) =
        send(&app, json_request("POST", "/api/composition", &brahms_first())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["composerName"], "Brahms");
    assert_eq!(created["keySignatureDisplayName"], "C Minor");
    assert!(created["composerId"].is_string());

    let (status, body) =
        send(&app, json_request("POST", "/api/composition", &brahms_first())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already exists"));

    let (_, all) = send(&app, empty_request("GET", "/api/composition")).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_without_composer_is_bad_request() {
    let app = setup_app();
    let mut body = brahms_first();
    body["composerName"] = Value::Null;

    let (status, _) = send(&app, json_request("POST", "/api/composition", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_with_display_name() {
    let app = setup_app();
    let body = json!({
        "name": "Symphony No. 40",
        "keySignatureDisplayName": "g minor",
        "numberOfMovements": 4,
        "format": "Symphony",
        "composerName": "Mozart"
    });

    let (status, created) = send(&app, json_request("POST", "/api/composition", &body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["keySignature"], "GMinor");
}

#[tokio::test]
async fn test_patch_null_movements_keeps_count() {
    let app = setup_app();
    let (_, created) = send(&app, json_request("POST", "/api/composition", &brahms_first())).await;
    let uri = format!("/api/composition/{}", created["id"].as_str().unwrap());

    let (status, updated) = send(
        &app,
        json_request("PATCH", &uri, &json!({ "numberOfMovements": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated, created);

    let (status, updated) = send(
        &app,
        json_request("PATCH", &uri, &json!({ "format": "Suite", "numberOfMovements": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["format"], "Suite");
    assert_eq!(updated["numberOfMovements"], 4);
}

#[tokio::test]
async fn test_patch_unknown_composition_is_not_found() {
    let app = setup_app();
    let uri = format!("/api/composition/{}", uuid::Uuid::new_v4());

    let (status, _) = send(&app, json_request("PATCH", &uri, &json!({ "name": "x" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_filter_by_display_name() {
    let app = setup_app();
    send(&app, json_request("POST", "/api/composition", &brahms_first())).await;
    let mozart = json!({
        "name": "Symphony No. 40",
        "keySignature": "GMinor",
        "numberOfMovements": 4,
        "format": "Symphony",
        "composerName": "Mozart"
    });
    send(&app, json_request("POST", "/api/composition", &mozart)).await;

    let (status, found) = send(
        &app,
        empty_request("GET", "/api/composition?keySignatureDisplayName=G%20Minor"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["composerName"], "Mozart");

    let (status, found) = send(
        &app,
        empty_request("GET", "/api/composition?composerName=brah&format=Symphony"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        empty_request("GET", "/api/composition?keySignatureDisplayName=Z%20Minor"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_delete_composition() {
    let app = setup_app();
    let (_, created) = send(&app, json_request("POST", "/api/composition", &brahms_first())).await;
    let uri = format!("/api/composition/{}", created["id"].as_str().unwrap());

    let (status, _) = send(&app, empty_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, empty_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, composers) = send(&app, empty_request("GET", "/api/composer")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(composers.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_composer_cascades() {
    let app = setup_app();
    let (_, first) = send(&app, json_request("POST", "/api/composition", &brahms_first())).await;
    let mut second = brahms_first();
    second["name"] = json!("Symphony No. 4");
    second["keySignature"] = json!("EMinor");
    let (_, second) = send(&app, json_request("POST", "/api/composition", &second)).await;

    let composer_uri = format!("/api/composer/{}", first["composerId"].as_str().unwrap());
    let (status, _) = send(&app, empty_request("DELETE", &composer_uri)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    for created in [first, second] {
        let uri = format!("/api/composition/{}", created["id"].as_str().unwrap());
        let (status, _) = send(&app, empty_request("GET", &uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_enum_codes_accepted_as_integers() {
    let app = setup_app();
    let mut by_code = brahms_first();
    by_code["keySignature"] = json!(21);
    by_code["format"] = json!(1);

    let (status, created) = send(&app, json_request("POST", "/api/composition", &by_code)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["keySignature"], "CMinor");
    assert_eq!(created["format"], "Symphony");

    let (status, found) =
        send(&app, empty_request("GET", "/api/composition?keySignature=21&format=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["id"], created["id"]);

    let (status, found) =
        send(&app, empty_request("GET", "/api/composition?keySignature=cminor")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 1);

    let (status, found) = send(&app, empty_request("GET", "/api/composition?format=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(found.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_undecodable_requests_return_json_errors() {
    let app = setup_app();

    let (status, body) = send(&app, empty_request("GET", "/api/composition/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, empty_request("DELETE", "/api/composer/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) =
        send(&app, empty_request("GET", "/api/composition?keySignature=29")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("unknown key signature"));

    let malformed = Request::builder()
        .method("POST")
        .uri("/api/composition")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let (status, body) = send(&app, malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let mut unknown_format = brahms_first();
    unknown_format["format"] = json!(11);
    let (status, body) =
        send(&app, json_request("POST", "/api/composition", &unknown_format)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
