//! Operability routes, API description and unknown paths.

mod common;

use axum::http::StatusCode;
use common::{body_json, spawn_app};

#[tokio::test]
async fn health_and_ready_report_ok() {
    let app = spawn_app().await;
    assert_eq!(app.fetch("/health").await["status"], "ok");
    let ready = app.fetch("/ready").await;
    assert_eq!(ready["status"], "ok");
    assert_eq!(ready["database"], "ok");
}

#[tokio::test]
async fn ready_is_503_once_the_pool_is_closed() {
    let app = spawn_app().await;
    app.pool.close().await;
    let response = app.get("/ready").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["status"], "degraded");
}

#[tokio::test]
async fn version_reports_package() {
    let app = spawn_app().await;
    let version = app.fetch("/version").await;
    assert_eq!(version["name"], "movies-api");
    assert!(version["version"].is_string());
}

#[tokio::test]
async fn swagger_lists_every_namespace() {
    let app = spawn_app().await;
    let doc = app.fetch("/swagger.json").await;
    assert!(doc["openapi"].as_str().unwrap().starts_with("3."));
    for path in ["/movies/", "/directors/", "/genres/", "/movies/{id}"] {
        assert!(doc["paths"][path].is_object(), "{path}");
    }
    assert!(doc["paths"]["/genres/{id}"]["patch"].is_null());
}

#[tokio::test]
async fn unknown_namespace_is_json_404() {
    let app = spawn_app().await;
    let response = app.get("/actors/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "not_found");
}
