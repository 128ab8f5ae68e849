//! Response helpers. Bodies are bare JSON (no envelope); every other outcome is an empty body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

pub fn ok_json(body: Value) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}

pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// 404 with an empty body: missing row or empty list.
pub fn not_found() -> Response {
    StatusCode::NOT_FOUND.into_response()
}
