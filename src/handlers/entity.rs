//! Entity CRUD handlers: list, create, read, replace, merge, delete.
//!
//! Each handler runs in one transaction begun on entry and committed before
//! returning. Any early return drops the transaction, which rolls it back.

use crate::config::ResolvedEntity;
use crate::error::{AppError, FieldErrors};
use crate::extractors::EntityKind;
use crate::response::{no_content, not_found, ok_json};
use crate::schema::{coerce_integer, EntitySchema};
use crate::service::CrudService;
use crate::sql::SqlValue;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::Response,
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

/// Path ids that are not integers never match a row.
fn parse_id(id_str: &str) -> Option<i64> {
    id_str.parse().ok()
}

fn body_value(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    body.map(|Json(v)| v)
        .map_err(|e| AppError::Rejected(e.status(), e.body_text()))
}

/// Query params restricted to the entity's filter columns. Empty values count as absent.
fn list_filters(
    entity: &ResolvedEntity,
    params: &HashMap<String, String>,
) -> Result<Vec<(String, SqlValue)>, AppError> {
    let mut filters = Vec::new();
    let mut errors = FieldErrors::default();
    for name in &entity.filters {
        let Some(raw) = params.get(name).filter(|s| !s.trim().is_empty()) else {
            continue;
        };
        match coerce_integer(&Value::String(raw.clone())) {
            Ok(n) => filters.push((name.clone(), SqlValue::Integer(n))),
            Err(msg) => errors.add(name, msg),
        }
    }
    if errors.is_empty() {
        Ok(filters)
    } else {
        Err(AppError::Validation(errors))
    }
}

pub async fn list(
    State(state): State<AppState>,
    EntityKind(entity): EntityKind,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let filters = list_filters(&entity, &params)?;
    let mut tx = state.pool.begin().await?;
    let records = CrudService::list(&mut *tx, &entity, &filters).await?;
    tx.commit().await?;
    if records.is_empty() {
        return Ok(not_found());
    }
    Ok(ok_json(EntitySchema::new(&entity).dump_many(&records)))
}

pub async fn create(
    State(state): State<AppState>,
    EntityKind(entity): EntityKind,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let record = EntitySchema::new(&entity).load(&body_value(body)?)?;
    let mut tx = state.pool.begin().await?;
    let created = CrudService::create(&mut *tx, &entity, &record).await?;
    tx.commit().await?;
    tracing::info!(entity = %entity.path_segment, id = ?created.get(&entity.pk_column), "created");
    Ok(no_content())
}

pub async fn read(
    State(state): State<AppState>,
    EntityKind(entity): EntityKind,
    Path(id_str): Path<String>,
) -> Result<Response, AppError> {
    let Some(id) = parse_id(&id_str) else {
        return Ok(not_found());
    };
    let mut tx = state.pool.begin().await?;
    let record = CrudService::read(&mut *tx, &entity, id).await?;
    tx.commit().await?;
    Ok(match record {
        Some(r) => ok_json(EntitySchema::new(&entity).dump(&r)),
        None => not_found(),
    })
}

/// PUT: fields absent from the body are cleared.
pub async fn replace(
    State(state): State<AppState>,
    EntityKind(entity): EntityKind,
    Path(id_str): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Some(id) = parse_id(&id_str) else {
        return Ok(not_found());
    };
    let record = EntitySchema::new(&entity).load(&body_value(body)?)?;
    let mut tx = state.pool.begin().await?;
    let updated = CrudService::replace(&mut *tx, &entity, id, &record).await?;
    tx.commit().await?;
    Ok(match updated {
        Some(_) => no_content(),
        None => not_found(),
    })
}

/// PATCH: only fields present in the body change.
pub async fn merge(
    State(state): State<AppState>,
    EntityKind(entity): EntityKind,
    Path(id_str): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Some(id) = parse_id(&id_str) else {
        return Ok(not_found());
    };
    let record = EntitySchema::new(&entity).load(&body_value(body)?)?;
    let mut tx = state.pool.begin().await?;
    let updated = CrudService::merge(&mut *tx, &entity, id, &record).await?;
    tx.commit().await?;
    Ok(match updated {
        Some(_) => no_content(),
        None => not_found(),
    })
}

/// Deletion commits immediately. Rows referencing the deleted id are left untouched.
pub async fn delete(
    State(state): State<AppState>,
    EntityKind(entity): EntityKind,
    Path(id_str): Path<String>,
) -> Result<Response, AppError> {
    let Some(id) = parse_id(&id_str) else {
        return Ok(not_found());
    };
    let mut tx = state.pool.begin().await?;
    let removed = CrudService::delete(&mut *tx, &entity, id).await?;
    tx.commit().await?;
    if !removed {
        return Ok(not_found());
    }
    tracing::info!(entity = %entity.path_segment, id, "deleted");
    Ok(no_content())
}
