//! Serialization layer: JSON bodies to records (load) and records to JSON (dump).
//!
//! Loading drops the primary key and any field the entity does not define, then
//! coerces each remaining field by its column kind. All failing fields are
//! reported together.

use crate::config::{ColumnInfo, ColumnType, ResolvedEntity};
use crate::error::{AppError, FieldErrors};
use crate::sql::{Record, SqlValue};
use serde_json::{Map, Value};

const NOT_NULL: &str = "Field may not be null.";
const NOT_INTEGER: &str = "Not a valid integer.";
const NOT_NUMBER: &str = "Not a valid number.";
const NOT_STRING: &str = "Not a valid string.";

pub struct EntitySchema<'a> {
    entity: &'a ResolvedEntity,
}

impl<'a> EntitySchema<'a> {
    pub fn new(entity: &'a ResolvedEntity) -> Self {
        Self { entity }
    }

    /// Deserialize a request body into a record of writable fields.
    pub fn load(&self, body: &Value) -> Result<Record, AppError> {
        let Value::Object(obj) = body else {
            return Err(AppError::BadRequest("body must be a JSON object".into()));
        };
        let mut record = Record::new();
        let mut errors = FieldErrors::default();
        for column in self.entity.writable_columns() {
            let Some(raw) = obj.get(&column.name) else { continue };
            match coerce(column, raw) {
                Ok(v) => record.set(&column.name, v),
                Err(msg) => errors.add(&column.name, msg),
            }
        }
        if errors.is_empty() {
            Ok(record)
        } else {
            Err(AppError::Validation(errors))
        }
    }

    /// Serialize one record, keys in column order, `id` included.
    pub fn dump(&self, record: &Record) -> Value {
        let mut map = Map::new();
        for column in &self.entity.columns {
            let v = record.get(&column.name).map(SqlValue::to_json).unwrap_or(Value::Null);
            map.insert(column.name.clone(), v);
        }
        Value::Object(map)
    }

    pub fn dump_many(&self, records: &[Record]) -> Value {
        Value::Array(records.iter().map(|r| self.dump(r)).collect())
    }
}

fn coerce(column: &ColumnInfo, raw: &Value) -> Result<SqlValue, &'static str> {
    if raw.is_null() {
        return Err(NOT_NULL);
    }
    match column.kind {
        ColumnType::Integer => coerce_integer(raw).map(SqlValue::Integer),
        ColumnType::Float => coerce_float(raw).map(SqlValue::Real),
        ColumnType::String => match raw {
            Value::String(s) => Ok(SqlValue::Text(s.clone())),
            _ => Err(NOT_STRING),
        },
    }
}

/// Integers, integral floats and integer strings.
pub(crate) fn coerce_integer(raw: &Value) -> Result<i64, &'static str> {
    match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
                _ => Err(NOT_INTEGER),
            }
        }
        Value::String(s) => s.trim().parse().map_err(|_| NOT_INTEGER),
        _ => Err(NOT_INTEGER),
    }
}

fn coerce_float(raw: &Value) -> Result<f64, &'static str> {
    let f = match raw {
        Value::Number(n) => n.as_f64().ok_or(NOT_NUMBER)?,
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| NOT_NUMBER)?,
        _ => return Err(NOT_NUMBER),
    };
    if f.is_finite() {
        Ok(f)
    } else {
        Err(NOT_NUMBER)
    }
}
