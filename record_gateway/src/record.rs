//! Generic row representation
//!
//! Query results come back as field-name-keyed JSON mappings rather than
//! typed structs, so one gateway can serve any table shape described at
//! runtime. Column values are decoded by PostgreSQL type and re-encoded as
//! JSON values that round-trip through the parameter binding layer.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use sqlx::postgres::{PgColumn, PgRow};
use sqlx::{Column, Row, TypeInfo};

use crate::errors::GatewayError;

/// One database row as a field-name-keyed mapping
pub type Record = serde_json::Map<String, Value>;

/// Convert any serializable value into a Record
///
/// The value must serialize to a JSON object; anything else is an error.
pub fn to_record<T: Serialize>(value: &T) -> Result<Record, GatewayError> {
    match serde_json::to_value(value).map_err(GatewayError::Serialization)? {
        Value::Object(map) => Ok(map),
        other => Err(GatewayError::Serialization(serde::ser::Error::custom(
            format!("expected a JSON object, got {}", json_type_name(&other)),
        ))),
    }
}

/// Deserialize a Record back into a typed value
pub fn from_record<T: DeserializeOwned>(record: &Record) -> Result<T, GatewayError> {
    serde_json::from_value(Value::Object(record.clone())).map_err(GatewayError::Serialization)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// Decodes one cell, mapping both SQL NULL and a failed decode to JSON null.
// Decode failures are logged at debug level so odd column types surface
// during development without breaking row retrieval.
macro_rules! decode_cell {
    ($row:expr, $index:expr, $ty:ty, $to_json:expr) => {
        match $row.try_get::<Option<$ty>, _>($index) {
            Ok(Some(value)) => $to_json(value),
            Ok(None) => Value::Null,
            Err(e) => {
                tracing::debug!("[DECODE] column {} failed to decode: {}", $index, e);
                Value::Null
            }
        }
    };
}

/// Convert a full PostgreSQL row into a Record, column by column
pub(crate) fn row_to_record(row: &PgRow) -> Record {
    let mut record = Record::new();
    for column in row.columns() {
        record.insert(column.name().to_string(), decode_column(row, column));
    }
    record
}

/// Decode a single column into a JSON value based on its PostgreSQL type
pub(crate) fn decode_column(row: &PgRow, column: &PgColumn) -> Value {
    let index = column.ordinal();

    match column.type_info().name() {
        "BOOL" => decode_cell!(row, index, bool, Value::Bool),
        "INT2" => decode_cell!(row, index, i16, |v: i16| Value::from(v)),
        "INT4" => decode_cell!(row, index, i32, |v: i32| Value::from(v)),
        "INT8" => decode_cell!(row, index, i64, |v: i64| Value::from(v)),
        "FLOAT4" => decode_cell!(row, index, f32, |v: f32| float_value(v as f64)),
        "FLOAT8" => decode_cell!(row, index, f64, float_value),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => {
            decode_cell!(row, index, String, Value::String)
        }
        "UUID" => decode_cell!(row, index, uuid::Uuid, |v: uuid::Uuid| Value::String(
            v.to_string()
        )),
        "TIMESTAMPTZ" => {
            decode_cell!(
                row,
                index,
                chrono::DateTime<chrono::Utc>,
                |v: chrono::DateTime<chrono::Utc>| Value::String(v.to_rfc3339())
            )
        }
        "TIMESTAMP" => {
            decode_cell!(
                row,
                index,
                chrono::NaiveDateTime,
                |v: chrono::NaiveDateTime| Value::String(
                    v.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
                )
            )
        }
        "DATE" => decode_cell!(row, index, chrono::NaiveDate, |v: chrono::NaiveDate| {
            Value::String(v.to_string())
        }),
        "TIME" => decode_cell!(row, index, chrono::NaiveTime, |v: chrono::NaiveTime| {
            Value::String(v.to_string())
        }),
        "JSON" | "JSONB" => decode_cell!(row, index, Value, |v| v),
        other => {
            // Last resort: many PostgreSQL types decode cleanly as text
            match row.try_get::<Option<String>, _>(index) {
                Ok(Some(value)) => Value::String(value),
                Ok(None) => Value::Null,
                Err(e) => {
                    tracing::debug!(
                        "[DECODE] unsupported column type {} at index {}: {}",
                        other,
                        index,
                        e
                    );
                    Value::Null
                }
            }
        }
    }
}

/// Non-finite floats have no JSON representation and decode to null
fn float_value(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
