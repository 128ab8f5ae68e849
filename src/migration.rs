//! Create the catalog tables if absent. No versioned migrations.

use crate::config::{resolve, FullConfig, ResolvedEntity};
use crate::error::AppError;
use sqlx::SqlitePool;

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// `CREATE TABLE IF NOT EXISTS` for one entity. The integer pk uses AUTOINCREMENT so ids are never reissued.
pub fn create_table_sql(entity: &ResolvedEntity) -> String {
    let mut defs = Vec::new();
    for c in &entity.columns {
        let mut def = format!("{} {}", quote(&c.name), c.sql_type());
        if c.primary_key {
            def.push_str(" PRIMARY KEY AUTOINCREMENT");
        } else if !c.nullable {
            def.push_str(" NOT NULL");
        }
        if let Some(r) = &c.references {
            def.push_str(&format!(" REFERENCES {} ({})", quote(&r.table_name), quote(&r.column_name)));
        }
        defs.push(def);
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote(&entity.table_name),
        defs.join(", ")
    )
}

/// Apply the catalog: one table per API entity, in the catalog's table order.
pub async fn apply_migrations(pool: &SqlitePool, config: &FullConfig) -> Result<(), AppError> {
    let model = resolve(config)?;
    for table in &config.tables {
        let Some(entity) = model.entities.iter().find(|e| e.table_id == table.id) else {
            continue;
        };
        let ddl = create_table_sql(entity);
        tracing::debug!(sql = %ddl, "ddl");
        sqlx::query(&ddl).execute(pool).await?;
    }
    tracing::info!(tables = config.tables.len(), "schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_ddl_declares_foreign_keys() {
        let model = resolve(&FullConfig::builtin().unwrap()).unwrap();
        let movie = model.entity_by_path("movies").unwrap();
        assert_eq!(
            create_table_sql(movie),
            concat!(
                r#"CREATE TABLE IF NOT EXISTS "movie" ("id" INTEGER PRIMARY KEY AUTOINCREMENT, "#,
                r#""title" VARCHAR(255), "description" VARCHAR(255), "trailer" VARCHAR(255), "#,
                r#""year" INTEGER, "rating" REAL, "#,
                r#""genre_id" INTEGER REFERENCES "genre" ("id"), "#,
                r#""director_id" INTEGER REFERENCES "director" ("id"))"#
            )
        );
    }
}
