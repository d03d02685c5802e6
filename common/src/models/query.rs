//! Query result models.
//!
//! A plain `SELECT` produces one [`QueryResult`]; a `CALL` produces a
//! [`ProcedureResult`] holding every row-set the routine returned.

use serde::{Deserialize, Serialize};

/// Result of a single statement or one row-set of a procedure call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column information.
    pub columns: Vec<ColumnInfo>,

    /// Row data (each row is a vector of JSON values aligned with `columns`).
    pub rows: Vec<Vec<serde_json::Value>>,

    /// Number of rows returned.
    #[serde(default)]
    pub row_count: usize,

    /// Number of rows affected (for data-changing statements).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_rows: Option<u64>,

    /// Statement execution time in milliseconds.
    #[serde(default)]
    pub execution_time_ms: u64,
}

/// Column information in a query result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,

    /// Column data type as reported by the server.
    pub data_type: String,
}

impl QueryResult {
    /// Creates a new empty query result.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a result from columns and rows, filling in `row_count`.
    pub fn from_rows(columns: Vec<ColumnInfo>, rows: Vec<Vec<serde_json::Value>>) -> Self {
        Self {
            row_count: rows.len(),
            columns,
            rows,
            affected_rows: None,
            execution_time_ms: 0,
        }
    }

    /// Sets the execution time on the result.
    pub fn with_duration(mut self, execution_time_ms: u64) -> Self {
        self.execution_time_ms = execution_time_ms;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as column-name to value maps, in row order.
    pub fn records(&self) -> Vec<serde_json::Map<String, serde_json::Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row.iter())
                    .map(|(col, value)| (col.name.clone(), value.clone()))
                    .collect()
            })
            .collect()
    }

    /// Values of one column across all rows.
    pub fn column_values(&self, name: &str) -> Vec<&serde_json::Value> {
        match self.columns.iter().position(|c| c.name.eq_ignore_ascii_case(name)) {
            Some(idx) => self.rows.iter().filter_map(|row| row.get(idx)).collect(),
            None => vec![],
        }
    }
}

/// Result of a stored-procedure call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcedureResult {
    /// Row-sets in the order the routine produced them.
    pub result_sets: Vec<QueryResult>,

    /// Rows affected across the whole call.
    #[serde(default)]
    pub affected_rows: u64,

    /// Call execution time in milliseconds.
    #[serde(default)]
    pub execution_time_ms: u64,
}

impl ProcedureResult {
    /// The first row-set, if the routine returned any.
    pub fn first_result_set(&self) -> Option<&QueryResult> {
        self.result_sets.first()
    }
}
