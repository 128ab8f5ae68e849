//! Values bound into SQLite queries.

use sqlx::encode::{Encode, IsNull};
use sqlx::sqlite::{Sqlite, SqliteTypeInfo};
use sqlx::Database;

/// A column value, either loaded from a request body or decoded from a row.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            SqlValue::Null => serde_json::Value::Null,
            SqlValue::Integer(n) => serde_json::Value::Number((*n).into()),
            SqlValue::Real(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            SqlValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

/// Column values keyed by column name, in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, SqlValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any earlier value for the same name.
    pub fn set(&mut self, name: &str, value: SqlValue) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

}

impl<'q> Encode<'q, Sqlite> for SqlValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Integer(n) => <i64 as Encode<Sqlite>>::encode_by_ref(n, buf),
            SqlValue::Real(f) => <f64 as Encode<Sqlite>>::encode_by_ref(f, buf),
            SqlValue::Text(s) => <String as Encode<'q, Sqlite>>::encode_by_ref(s, buf),
        }
    }
}

impl sqlx::Type<Sqlite> for SqlValue {
    fn type_info() -> SqliteTypeInfo {
        <str as sqlx::Type<Sqlite>>::type_info()
    }

    fn compatible(_ty: &SqliteTypeInfo) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_set_replaces_existing_value() {
        let mut record = Record::new();
        record.set("year", SqlValue::Integer(2020));
        record.set("title", SqlValue::Text("X".into()));
        record.set("year", SqlValue::Integer(2021));
        assert_eq!(record.get("year"), Some(&SqlValue::Integer(2021)));
        assert_eq!(record.get("title"), Some(&SqlValue::Text("X".into())));
        assert!(!record.contains("rating"));
    }

    #[test]
    fn converts_to_json() {
        assert_eq!(SqlValue::Integer(2020).to_json(), json!(2020));
        assert_eq!(SqlValue::Real(7.5).to_json(), json!(7.5));
        assert_eq!(SqlValue::Text("Drama".into()).to_json(), json!("Drama"));
        assert_eq!(SqlValue::Null.to_json(), json!(null));
    }
}
