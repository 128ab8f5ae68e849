//! Builds parameterized INSERT, SELECT, UPDATE, DELETE from a resolved entity.

use crate::config::ResolvedEntity;
use crate::sql::{Record, SqlValue};

/// Quote identifier for SQLite (safe: only from the catalog).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Positional placeholder for the pushed value.
    fn push_param(&mut self, v: SqlValue) -> &'static str {
        self.params.push(v);
        "?"
    }
}

fn select_column_list(entity: &ResolvedEntity) -> String {
    entity
        .columns
        .iter()
        .map(|c| quoted(&c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT by primary key. Caller binds the id as sole param.
pub fn select_by_id(entity: &ResolvedEntity) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ?",
        select_column_list(entity),
        quoted(&entity.table_name),
        quoted(&entity.pk_column)
    );
    q
}

/// SELECT list with optional exact-match filters joined by AND, ORDER BY pk.
/// Filters on unknown columns are skipped; params bound in filter order.
pub fn select_list(entity: &ResolvedEntity, filters: &[(String, SqlValue)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::new();
    for (col, val) in filters {
        if entity.column(col).is_none() {
            continue;
        }
        let ph = q.push_param(val.clone());
        where_parts.push(format!("{} = {}", quoted(col), ph));
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {}",
        select_column_list(entity),
        quoted(&entity.table_name),
        where_clause,
        quoted(&entity.pk_column)
    );
    q
}

/// INSERT every writable column; columns missing from the record get NULL. The pk is never written.
pub fn insert(entity: &ResolvedEntity, record: &Record) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for c in entity.writable_columns() {
        let val = record.get(&c.name).cloned().unwrap_or(SqlValue::Null);
        placeholders.push(q.push_param(val));
        cols.push(quoted(&c.name));
    }
    let table = quoted(&entity.table_name);
    let returning = select_column_list(entity);
    q.sql = if cols.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES RETURNING {}", table, returning)
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            table,
            cols.join(", "),
            placeholders.join(", "),
            returning
        )
    };
    q
}

/// UPDATE by id: SET the given assignments (pk and unknown columns skipped).
/// With nothing to set this degrades to a SELECT by id so the caller still learns whether the row exists.
pub fn update(entity: &ResolvedEntity, id: i64, assignments: &[(String, SqlValue)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = quoted(&entity.table_name);
    let mut sets = Vec::new();
    for (k, v) in assignments {
        if *k == entity.pk_column || entity.column(k).is_none() {
            continue;
        }
        let ph = q.push_param(v.clone());
        sets.push(format!("{} = {}", quoted(k), ph));
    }
    if sets.is_empty() {
        let mut q = select_by_id(entity);
        q.params.push(SqlValue::Integer(id));
        return q;
    }
    q.push_param(SqlValue::Integer(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ? RETURNING {}",
        table,
        sets.join(", "),
        quoted(&entity.pk_column),
        select_column_list(entity)
    );
    q
}

/// Every writable column, taking the record's value or NULL when absent.
pub fn replace_assignments(entity: &ResolvedEntity, record: &Record) -> Vec<(String, SqlValue)> {
    entity
        .writable_columns()
        .map(|c| (c.name.clone(), record.get(&c.name).cloned().unwrap_or(SqlValue::Null)))
        .collect()
}

/// Only the writable columns present in the record.
pub fn merge_assignments(entity: &ResolvedEntity, record: &Record) -> Vec<(String, SqlValue)> {
    entity
        .writable_columns()
        .filter_map(|c| record.get(&c.name).map(|v| (c.name.clone(), v.clone())))
        .collect()
}

/// DELETE by id. Caller binds the id as sole param.
pub fn delete(entity: &ResolvedEntity) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ?",
        quoted(&entity.table_name),
        quoted(&entity.pk_column)
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve, FullConfig, ResolvedModel};

    fn model() -> ResolvedModel {
        resolve(&FullConfig::builtin().unwrap()).unwrap()
    }

    #[test]
    fn list_without_filters_orders_by_pk() {
        let model = model();
        let genre = model.entity_by_path("genres").unwrap();
        let q = select_list(genre, &[]);
        assert_eq!(q.sql, r#"SELECT "id", "name" FROM "genre" ORDER BY "id""#);
        assert!(q.params.is_empty());
    }

    #[test]
    fn list_filters_are_anded_in_order() {
        let model = model();
        let movie = model.entity_by_path("movies").unwrap();
        let q = select_list(
            movie,
            &[
                ("genre_id".into(), SqlValue::Integer(1)),
                ("director_id".into(), SqlValue::Integer(2)),
                ("nope".into(), SqlValue::Integer(3)),
            ],
        );
        assert!(q.sql.ends_with(r#"FROM "movie" WHERE "genre_id" = ? AND "director_id" = ? ORDER BY "id""#));
        assert_eq!(q.params, vec![SqlValue::Integer(1), SqlValue::Integer(2)]);
    }

    #[test]
    fn insert_skips_pk_and_nulls_missing_columns() {
        let model = model();
        let movie = model.entity_by_path("movies").unwrap();
        let mut record = Record::new();
        record.set("title", SqlValue::Text("X".into()));
        let q = insert(movie, &record);
        assert!(q.sql.starts_with(
            r#"INSERT INTO "movie" ("title", "description", "trailer", "year", "rating", "genre_id", "director_id") VALUES (?, ?, ?, ?, ?, ?, ?)"#
        ));
        assert_eq!(q.params.len(), 7);
        assert_eq!(q.params[0], SqlValue::Text("X".into()));
        assert!(q.params[1..].iter().all(|p| *p == SqlValue::Null));
    }

    #[test]
    fn replace_clears_absent_fields_merge_keeps_them() {
        let model = model();
        let movie = model.entity_by_path("movies").unwrap();
        let mut record = Record::new();
        record.set("year", SqlValue::Integer(2021));

        let replace = replace_assignments(movie, &record);
        assert_eq!(replace.len(), 7);
        assert!(replace.contains(&("title".into(), SqlValue::Null)));
        assert!(replace.contains(&("year".into(), SqlValue::Integer(2021))));

        let merge = merge_assignments(movie, &record);
        assert_eq!(merge, vec![("year".to_string(), SqlValue::Integer(2021))]);
    }

    #[test]
    fn update_binds_id_last() {
        let model = model();
        let movie = model.entity_by_path("movies").unwrap();
        let q = update(movie, 9, &[("year".into(), SqlValue::Integer(2021))]);
        assert!(q.sql.starts_with(r#"UPDATE "movie" SET "year" = ? WHERE "id" = ? RETURNING"#));
        assert_eq!(q.params, vec![SqlValue::Integer(2021), SqlValue::Integer(9)]);
    }

    #[test]
    fn empty_update_becomes_select() {
        let model = model();
        let movie = model.entity_by_path("movies").unwrap();
        let q = update(movie, 4, &[]);
        assert!(q.sql.starts_with("SELECT"));
        assert_eq!(q.params, vec![SqlValue::Integer(4)]);
    }
}
