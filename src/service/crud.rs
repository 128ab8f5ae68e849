//! Generic CRUD execution against SQLite.

use crate::config::{ColumnType, ResolvedEntity};
use crate::error::AppError;
use crate::sql::{
    delete, insert, merge_assignments, replace_assignments, select_by_id, select_list, update, QueryBuf, Record,
    SqlValue,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

/// Repository operations. Every call runs on the caller's connection, normally the request transaction.
pub struct CrudService;

impl CrudService {
    /// All rows matching every filter (exact match), ordered by primary key.
    pub async fn list(
        conn: &mut SqliteConnection,
        entity: &ResolvedEntity,
        filters: &[(String, SqlValue)],
    ) -> Result<Vec<Record>, AppError> {
        let q = select_list(entity, filters);
        Self::fetch_all(conn, entity, &q).await
    }

    pub async fn read(
        conn: &mut SqliteConnection,
        entity: &ResolvedEntity,
        id: i64,
    ) -> Result<Option<Record>, AppError> {
        let mut q = select_by_id(entity);
        q.params.push(SqlValue::Integer(id));
        Self::fetch_optional(conn, entity, &q).await
    }

    /// Insert one row; the primary key is generated by the store.
    pub async fn create(
        conn: &mut SqliteConnection,
        entity: &ResolvedEntity,
        record: &Record,
    ) -> Result<Record, AppError> {
        let q = insert(entity, record);
        Self::fetch_optional(conn, entity, &q)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    /// Overwrite every writable column; ones absent from the record become NULL.
    pub async fn replace(
        conn: &mut SqliteConnection,
        entity: &ResolvedEntity,
        id: i64,
        record: &Record,
    ) -> Result<Option<Record>, AppError> {
        let q = update(entity, id, &replace_assignments(entity, record));
        Self::fetch_optional(conn, entity, &q).await
    }

    /// Overwrite only the columns present in the record.
    pub async fn merge(
        conn: &mut SqliteConnection,
        entity: &ResolvedEntity,
        id: i64,
        record: &Record,
    ) -> Result<Option<Record>, AppError> {
        let q = update(entity, id, &merge_assignments(entity, record));
        Self::fetch_optional(conn, entity, &q).await
    }

    /// Delete one row by id. No cascade to referencing rows. Returns whether a row was removed.
    pub async fn delete(conn: &mut SqliteConnection, entity: &ResolvedEntity, id: i64) -> Result<bool, AppError> {
        let mut q = delete(entity);
        q.params.push(SqlValue::Integer(id));
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        let result = query.execute(&mut *conn).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn fetch_all(
        conn: &mut SqliteConnection,
        entity: &ResolvedEntity,
        q: &QueryBuf,
    ) -> Result<Vec<Record>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        let rows = query.fetch_all(&mut *conn).await?;
        rows.iter().map(|r| row_to_record(entity, r)).collect()
    }

    async fn fetch_optional(
        conn: &mut SqliteConnection,
        entity: &ResolvedEntity,
        q: &QueryBuf,
    ) -> Result<Option<Record>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        let row = query.fetch_optional(&mut *conn).await?;
        row.map(|r| row_to_record(entity, &r)).transpose()
    }
}

fn row_to_record(entity: &ResolvedEntity, row: &SqliteRow) -> Result<Record, AppError> {
    let mut record = Record::new();
    for c in &entity.columns {
        let name = c.name.as_str();
        let value = match c.kind {
            ColumnType::Integer => row.try_get::<Option<i64>, _>(name)?.map(SqlValue::Integer),
            ColumnType::Float => row.try_get::<Option<f64>, _>(name)?.map(SqlValue::Real),
            ColumnType::String => row.try_get::<Option<String>, _>(name)?.map(SqlValue::Text),
        };
        record.set(name, value.unwrap_or(SqlValue::Null));
    }
    Ok(record)
}
