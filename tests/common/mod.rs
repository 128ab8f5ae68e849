#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use movies_api::{app, apply_migrations, connect_options, connect_with, resolve, AppState, FullConfig};
use serde_json::Value;
use sqlx::SqlitePool;
use std::path::PathBuf;
use tempfile::TempDir;
use tower::ServiceExt;

/// Router over a fresh database file that lives as long as this value.
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub db_path: PathBuf,
    _dir: TempDir,
}

fn database_url(path: &std::path::Path) -> String {
    format!("sqlite://{}", path.display())
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_limit(64 * 1024).await
}

pub async fn spawn_app_with_limit(body_limit_bytes: usize) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("movies.db");
    let pool = connect_with(connect_options(&database_url(&db_path)).unwrap(), 2)
        .await
        .unwrap();
    let catalog = FullConfig::builtin().unwrap();
    apply_migrations(&pool, &catalog).await.unwrap();
    let state = AppState::new(pool.clone(), resolve(&catalog).unwrap());
    TestApp {
        router: app(state, body_limit_bytes),
        pool,
        db_path,
        _dir: dir,
    }
}

impl TestApp {
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Response {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> Response {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> Response {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        self.request(Method::DELETE, uri, None).await
    }

    /// POST and assert the 204 contract.
    pub async fn create(&self, uri: &str, body: Value) {
        let response = self.post(uri, body).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    /// GET expecting 200, returning the JSON body.
    pub async fn fetch(&self, uri: &str) -> Value {
        let response = self.get(uri).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
        body_json(response).await
    }

    /// A second pool on the same file, sharing no connection with the app.
    pub async fn fresh_pool(&self) -> SqlitePool {
        connect_with(connect_options(&database_url(&self.db_path)).unwrap(), 1)
            .await
            .unwrap()
    }
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
