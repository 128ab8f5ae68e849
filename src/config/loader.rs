//! Build the resolved model from catalog structs.

use crate::config::resolved::{ColumnInfo, ColumnReference, ResolvedEntity, ResolvedModel};
use crate::config::{validate, FullConfig};
use crate::error::ConfigError;
use std::collections::HashMap;
use std::sync::Arc;

pub fn resolve(config: &FullConfig) -> Result<ResolvedModel, ConfigError> {
    validate(config)?;

    let tables_by_id: HashMap<_, _> = config.tables.iter().map(|t| (t.id.as_str(), t)).collect();
    let column_by_id: HashMap<_, _> = config.columns.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut references: HashMap<&str, ColumnReference> = HashMap::new();
    for rel in &config.relationships {
        let target_table = tables_by_id[rel.to_table_id.as_str()];
        let target_column = column_by_id[rel.to_column_id.as_str()];
        references.insert(
            rel.from_column_id.as_str(),
            ColumnReference {
                table_name: target_table.name.clone(),
                column_name: target_column.name.clone(),
            },
        );
    }

    let mut entities = Vec::new();
    let mut entity_by_path = HashMap::new();

    for api in &config.api_entities {
        let table = tables_by_id
            .get(api.entity_id.as_str())
            .ok_or_else(|| ConfigError::MissingReference {
                kind: "table",
                id: api.entity_id.clone(),
            })?;

        let columns: Vec<ColumnInfo> = config
            .columns
            .iter()
            .filter(|c| c.table_id == table.id)
            .map(|c| ColumnInfo {
                name: c.name.clone(),
                kind: c.type_,
                primary_key: c.name == table.primary_key,
                nullable: c.nullable,
                length: c.length,
                references: references.get(c.id.as_str()).cloned(),
            })
            .collect();

        let entity = Arc::new(ResolvedEntity {
            table_id: table.id.clone(),
            table_name: table.name.clone(),
            path_segment: api.path_segment.clone(),
            pk_column: table.primary_key.clone(),
            columns,
            operations: api.operations.clone(),
            filters: api.filters.clone(),
        });
        entity_by_path.insert(api.path_segment.clone(), Arc::clone(&entity));
        entities.push(entity);
    }

    Ok(ResolvedModel {
        entities,
        entity_by_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnType, Operation};

    #[test]
    fn movie_columns_follow_catalog_order() {
        let model = resolve(&FullConfig::builtin().unwrap()).unwrap();
        let movie = model.entity_by_path("movies").unwrap();
        let names: Vec<&str> = movie.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            ["id", "title", "description", "trailer", "year", "rating", "genre_id", "director_id"]
        );
        assert_eq!(movie.column("rating").unwrap().kind, ColumnType::Float);
        assert!(movie.column("id").unwrap().primary_key);
        assert_eq!(movie.writable_columns().count(), 7);
    }

    #[test]
    fn foreign_keys_point_at_parent_tables() {
        let model = resolve(&FullConfig::builtin().unwrap()).unwrap();
        let movie = model.entity_by_path("movies").unwrap();
        let genre_ref = movie.column("genre_id").unwrap().references.as_ref().unwrap();
        assert_eq!(genre_ref.table_name, "genre");
        assert_eq!(genre_ref.column_name, "id");
        assert!(movie.column("title").unwrap().references.is_none());
    }

    #[test]
    fn only_movies_allow_merge() {
        let model = resolve(&FullConfig::builtin().unwrap()).unwrap();
        assert!(model.entity_by_path("movies").unwrap().allows(Operation::Merge));
        assert!(!model.entity_by_path("directors").unwrap().allows(Operation::Merge));
        assert!(!model.entity_by_path("genres").unwrap().allows(Operation::Merge));
        assert!(model.entity_by_path("genres").unwrap().filters.is_empty());
    }
}
