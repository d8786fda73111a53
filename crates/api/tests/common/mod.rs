#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use gamevault_api::config::ServerConfig;
use gamevault_api::router::build_app_router;
use gamevault_api::state::AppState;
use gamevault_db::DatabaseSettings;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

pub const MULTIPART_BOUNDARY: &str = "gamevault-test-boundary";

/// Build a test `ServerConfig` with safe defaults and images under
/// `web_root`.
pub fn test_config(web_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 1024 * 1024,
        web_root: web_root.to_path_buf(),
        database: DatabaseSettings::new("postgres://unused"),
    }
}

/// Build the full application router, with the same middleware stack as
/// production, over the given database pool.
pub fn build_test_app(pool: PgPool, web_root: &Path) -> Router {
    let state = AppState::new(pool, test_config(web_root)).unwrap();
    build_app_router(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::PUT, uri, body).await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(app, request).await
}

/// POST a multipart form with one text field and one file field.
pub async fn post_upload(
    app: Router,
    uri: &str,
    id_field: &str,
    entity_id: &str,
    file_name: &str,
    content: &[u8],
) -> Response {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{MULTIPART_BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{id_field}\"\r\n\r\n\
             {entity_id}\r\n\
             --{MULTIPART_BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Sorted names of the entries in a zip archive.
pub fn zip_entry_names(bytes: Vec<u8>) -> Vec<String> {
    let archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}

/// Poll `uri` until `check` accepts the JSON body. Link propagation runs
/// in the background, so its effects show up shortly after the request
/// that triggered it.
pub async fn eventually<F>(app: &Router, uri: &str, check: F) -> serde_json::Value
where
    F: Fn(&serde_json::Value) -> bool,
{
    let mut last = serde_json::Value::Null;
    for _ in 0..100 {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::OK);
        last = body_json(response).await;
        if check(&last) {
            return last;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("{uri} never reached the expected state, last body: {last}");
}
