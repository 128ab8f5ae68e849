//! Raw catalog types: tables, columns, relationships and the API entities exposed over them.

use serde::{Deserialize, Serialize};

/// Catalog shipped with the binary.
const BUILTIN_CATALOG: &str = include_str!("catalog.json");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Float,
    String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TableConfig {
    pub id: String,
    pub name: String,
    pub primary_key: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub id: String,
    pub table_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub type_: ColumnType,
    /// Declared VARCHAR length. SQLite does not enforce it.
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default = "default_true")]
    pub nullable: bool,
}

fn default_true() -> bool {
    true
}

/// Foreign key from one column to another. Declared in DDL, never enforced.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RelationshipConfig {
    pub id: String,
    pub from_table_id: String,
    pub from_column_id: String,
    pub to_table_id: String,
    pub to_column_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    List,
    Create,
    Read,
    /// Full update (PUT): absent fields are cleared.
    Replace,
    /// Partial update (PATCH): absent fields are kept.
    Merge,
    Delete,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiEntityConfig {
    pub entity_id: String,
    pub path_segment: String,
    pub operations: Vec<Operation>,
    /// Columns accepted as exact-match query filters on the list route.
    #[serde(default)]
    pub filters: Vec<String>,
}

/// All catalog types in one struct.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FullConfig {
    pub tables: Vec<TableConfig>,
    pub columns: Vec<ColumnConfig>,
    #[serde(default)]
    pub relationships: Vec<RelationshipConfig>,
    pub api_entities: Vec<ApiEntityConfig>,
}

impl FullConfig {
    /// Genres, directors and movies.
    pub fn builtin() -> Result<Self, crate::error::ConfigError> {
        serde_json::from_str(BUILTIN_CATALOG).map_err(|e| crate::error::ConfigError::Load(e.to_string()))
    }
}
