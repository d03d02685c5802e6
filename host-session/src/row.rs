//! Conversion of MySQL rows into JSON values.
//!
//! Column types are resolved from the server-reported type name so that
//! `SELECT *` and procedure row-sets can be rendered without a schema.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;
use sqlx::mysql::{MySql, MySqlRow};
use sqlx::{Column, Decode, Row, Type, TypeInfo, ValueRef};

use common::models::{ColumnInfo, QueryResult};

/// Builds a [`QueryResult`] from one row-set.
///
/// Column metadata is taken from the first row, so an empty row-set has no
/// columns.
pub fn to_query_result(rows: &[MySqlRow]) -> QueryResult {
    let columns = rows.first().map(columns_of).unwrap_or_default();
    let values = rows.iter().map(row_values).collect();
    QueryResult::from_rows(columns, values)
}

/// Column metadata of a row.
pub fn columns_of(row: &MySqlRow) -> Vec<ColumnInfo> {
    row.columns()
        .iter()
        .map(|col| ColumnInfo {
            name: col.name().to_string(),
            data_type: col.type_info().name().to_string(),
        })
        .collect()
}

/// All values of a row, in column order.
pub fn row_values(row: &MySqlRow) -> Vec<Value> {
    (0..row.len()).map(|idx| column_value(row, idx)).collect()
}

fn column_value(row: &MySqlRow, idx: usize) -> Value {
    match row.try_get_raw(idx) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(_) => {}
        Err(e) => {
            tracing::debug!(column = idx, error = %e, "Column not readable");
            return Value::Null;
        }
    }

    let type_name = row.column(idx).type_info().name();
    let decoded = match type_name {
        "BOOLEAN" => decode::<bool>(row, idx),
        "FLOAT" => decode::<f32>(row, idx),
        "DOUBLE" => decode::<f64>(row, idx),
        "DATE" => decode_display::<NaiveDate>(row, idx),
        "TIME" => decode_display::<NaiveTime>(row, idx),
        "DATETIME" => decode_display::<NaiveDateTime>(row, idx),
        "TIMESTAMP" => row
            .try_get::<DateTime<Utc>, _>(idx)
            .map(|ts| Value::String(ts.to_rfc3339())),
        "JSON" => row
            .try_get_unchecked::<String, _>(idx)
            .map(|s| serde_json::from_str(&s).unwrap_or(Value::String(s))),
        name if is_integer(name) && name.ends_with("UNSIGNED") => {
            row.try_get_unchecked::<u64, _>(idx).map(Value::from)
        }
        name if is_integer(name) => row.try_get_unchecked::<i64, _>(idx).map(Value::from),
        name if name.ends_with("BLOB") || name.ends_with("BINARY") => row
            .try_get_unchecked::<Vec<u8>, _>(idx)
            .map(|bytes| Value::String(String::from_utf8_lossy(&bytes).into_owned())),
        // DECIMAL travels as text in both protocols; CHAR/TEXT/ENUM/SET are strings
        _ => row.try_get_unchecked::<String, _>(idx).map(Value::String),
    };

    decoded.unwrap_or_else(|e| {
        tracing::debug!(column = idx, data_type = type_name, error = %e, "Column not decodable");
        Value::Null
    })
}

fn is_integer(type_name: &str) -> bool {
    let base = type_name.trim_end_matches(" UNSIGNED");
    matches!(base, "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR")
}

fn decode<'r, T>(row: &'r MySqlRow, idx: usize) -> Result<Value, sqlx::Error>
where
    T: Decode<'r, MySql> + Type<MySql> + Into<Value>,
{
    row.try_get::<T, _>(idx).map(Into::into)
}

fn decode_display<'r, T>(row: &'r MySqlRow, idx: usize) -> Result<Value, sqlx::Error>
where
    T: Decode<'r, MySql> + Type<MySql> + std::fmt::Display,
{
    row.try_get::<T, _>(idx).map(|v| Value::String(v.to_string()))
}
