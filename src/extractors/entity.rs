//! Extract the entity kind a route was registered for.

use crate::config::ResolvedEntity;
use crate::error::AppError;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

/// Entity metadata attached to each entity route as a request extension.
#[derive(Clone, Debug)]
pub struct EntityKind(pub Arc<ResolvedEntity>);

#[async_trait]
impl<S> FromRequestParts<S> for EntityKind
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<EntityKind>()
            .cloned()
            .ok_or_else(|| AppError::NotFound(parts.uri.path().to_string()))
    }
}
