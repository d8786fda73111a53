//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{body_json, get};
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_returns_ok_with_json(pool: PgPool) {
    let web_root = tempfile::tempdir().unwrap();
    let app = common::build_test_app(pool, web_root.path());
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["images_writable"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let web_root = tempfile::tempdir().unwrap();
    let app = common::build_test_app(pool, web_root.path());
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn response_contains_x_request_id_header(pool: PgPool) {
    let web_root = tempfile::tempdir().unwrap();
    let app = common::build_test_app(pool, web_root.path());
    let response = get(app, "/health").await;

    assert!(response.headers().contains_key("x-request-id"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cors_preflight_allows_dev_origin(pool: PgPool) {
    let web_root = tempfile::tempdir().unwrap();
    let app = common::build_test_app(pool, web_root.path());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/game")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn oversized_upload_is_rejected(pool: PgPool) {
    let web_root = tempfile::tempdir().unwrap();
    let app = common::build_test_app(pool, web_root.path());
    let too_big = vec![0u8; 2 * 1024 * 1024];

    let response = common::post_upload(
        app,
        "/game/UploadImage",
        "gameId",
        "0123456789abcdef01234567",
        "huge.png",
        &too_big,
    )
    .await;

    assert!(response.status().is_client_error());
}
