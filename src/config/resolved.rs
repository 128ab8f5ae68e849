//! Resolved entity model: catalog validated and flattened for runtime use.

use crate::config::{ColumnType, Operation};
use std::collections::HashMap;
use std::sync::Arc;

/// Target of a declared foreign key.
#[derive(Clone, Debug)]
pub struct ColumnReference {
    pub table_name: String,
    pub column_name: String,
}

#[derive(Clone, Debug)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnType,
    pub primary_key: bool,
    pub nullable: bool,
    pub length: Option<u32>,
    pub references: Option<ColumnReference>,
}

impl ColumnInfo {
    /// SQLite type used in DDL.
    pub fn sql_type(&self) -> String {
        match (self.kind, self.length) {
            (ColumnType::Integer, _) => "INTEGER".into(),
            (ColumnType::Float, _) => "REAL".into(),
            (ColumnType::String, Some(n)) => format!("VARCHAR({})", n),
            (ColumnType::String, None) => "TEXT".into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedEntity {
    pub table_id: String,
    pub table_name: String,
    pub path_segment: String,
    pub pk_column: String,
    /// Catalog order; also the order of keys in dumped records.
    pub columns: Vec<ColumnInfo>,
    pub operations: Vec<Operation>,
    pub filters: Vec<String>,
}

impl ResolvedEntity {
    pub fn allows(&self, op: Operation) -> bool {
        self.operations.contains(&op)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Every column except the primary key.
    pub fn writable_columns(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.columns.iter().filter(|c| !c.primary_key)
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedModel {
    pub entities: Vec<Arc<ResolvedEntity>>,
    pub entity_by_path: HashMap<String, Arc<ResolvedEntity>>,
}

impl ResolvedModel {
    pub fn entity_by_path(&self, path: &str) -> Option<&Arc<ResolvedEntity>> {
        self.entity_by_path.get(path)
    }
}
