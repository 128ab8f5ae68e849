//! Catalog validation: referential integrity and API consistency.

use crate::config::{ColumnType, FullConfig};
use crate::error::ConfigError;
use std::collections::HashSet;

pub fn validate(config: &FullConfig) -> Result<(), ConfigError> {
    let table_ids: HashSet<&str> = config.tables.iter().map(|t| t.id.as_str()).collect();

    let mut column_ids = HashSet::new();
    for c in &config.columns {
        if !table_ids.contains(c.table_id.as_str()) {
            return Err(ConfigError::MissingReference {
                kind: "table",
                id: c.table_id.clone(),
            });
        }
        if !column_ids.insert(c.id.as_str()) {
            return Err(ConfigError::Validation(format!("duplicate column id: {}", c.id)));
        }
    }

    for t in &config.tables {
        let pk = config
            .columns
            .iter()
            .find(|c| c.table_id == t.id && c.name == t.primary_key);
        match pk {
            Some(c) if c.type_ == ColumnType::Integer => {}
            _ => {
                return Err(ConfigError::InvalidPrimaryKey {
                    table_id: t.id.clone(),
                    column: t.primary_key.clone(),
                })
            }
        }
    }

    for r in &config.relationships {
        if !table_ids.contains(r.from_table_id.as_str())
            || !table_ids.contains(r.to_table_id.as_str())
            || !column_ids.contains(r.from_column_id.as_str())
            || !column_ids.contains(r.to_column_id.as_str())
        {
            return Err(ConfigError::MissingReference {
                kind: "relationship",
                id: r.id.clone(),
            });
        }
    }

    let mut path_segments = HashSet::new();
    for api in &config.api_entities {
        if !table_ids.contains(api.entity_id.as_str()) {
            return Err(ConfigError::MissingReference {
                kind: "table",
                id: api.entity_id.clone(),
            });
        }
        if !path_segments.insert(api.path_segment.as_str()) {
            return Err(ConfigError::DuplicatePathSegment(api.path_segment.clone()));
        }
        for f in &api.filters {
            let known = config
                .columns
                .iter()
                .any(|c| c.table_id == api.entity_id && c.name == *f);
            if !known {
                return Err(ConfigError::Validation(format!(
                    "filter {} is not a column of {}",
                    f, api.entity_id
                )));
            }
        }
    }

    Ok(())
}
