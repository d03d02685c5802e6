//! Application error types.
//!
//! Every fallible operation returns [`AppResult`]. Driver errors are
//! classified by MySQL server error number so callers can tell an
//! authorization failure from a uniqueness violation.

use sqlx::mysql::MySqlDatabaseError;
use thiserror::Error;

/// Result alias used across the workspace.
pub type AppResult<T> = Result<T, AppError>;

/// MySQL server error numbers the session cares about.
mod mysql_codes {
    /// ER_DBACCESS_DENIED_ERROR
    pub const DB_ACCESS_DENIED: u16 = 1044;
    /// ER_ACCESS_DENIED_ERROR
    pub const ACCESS_DENIED: u16 = 1045;
    /// ER_DUP_ENTRY
    pub const DUP_ENTRY: u16 = 1062;
    /// ER_TABLEACCESS_DENIED_ERROR
    pub const TABLE_ACCESS_DENIED: u16 = 1142;
    /// ER_COLUMNACCESS_DENIED_ERROR
    pub const COLUMN_ACCESS_DENIED: u16 = 1143;
    /// ER_SPECIFIC_ACCESS_DENIED_ERROR
    pub const SPECIFIC_ACCESS_DENIED: u16 = 1227;
    /// ER_PROCACCESS_DENIED_ERROR
    pub const PROC_ACCESS_DENIED: u16 = 1370;
}

/// Application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Input failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// The server rejected the credentials.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Connection could not be established.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// The session lacks the grant required by a statement.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// A statement violated a uniqueness constraint.
    #[error("duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Any other statement failure.
    #[error("database query error: {0}")]
    DatabaseQuery(String),
}

impl AppError {
    /// Stable error code for logs and JSON reports.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::AuthenticationFailed(_) => "AUTHENTICATION_FAILED",
            AppError::DatabaseConnection(_) => "CONNECTION_ERROR",
            AppError::PermissionDenied(_) => "PERMISSION_DENIED",
            AppError::DuplicateEntry(_) => "DUPLICATE_ENTRY",
            AppError::DatabaseQuery(_) => "QUERY_ERROR",
        }
    }

    /// Classifies an error raised while opening the connection.
    pub fn from_connect(err: sqlx::Error) -> Self {
        match mysql_error_number(&err) {
            Some(mysql_codes::ACCESS_DENIED | mysql_codes::DB_ACCESS_DENIED) => {
                AppError::AuthenticationFailed(err.to_string())
            }
            _ => AppError::DatabaseConnection(err.to_string()),
        }
    }

    /// Classifies an error raised by a statement on an open connection.
    pub fn from_query(err: sqlx::Error) -> Self {
        match mysql_error_number(&err) {
            Some(
                mysql_codes::TABLE_ACCESS_DENIED
                | mysql_codes::COLUMN_ACCESS_DENIED
                | mysql_codes::SPECIFIC_ACCESS_DENIED
                | mysql_codes::PROC_ACCESS_DENIED
                | mysql_codes::DB_ACCESS_DENIED,
            ) => AppError::PermissionDenied(err.to_string()),
            Some(mysql_codes::DUP_ENTRY) => AppError::DuplicateEntry(err.to_string()),
            _ => AppError::DatabaseQuery(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

fn mysql_error_number(err: &sqlx::Error) -> Option<u16> {
    err.as_database_error()
        .and_then(|db| db.try_downcast_ref::<MySqlDatabaseError>())
        .map(MySqlDatabaseError::number)
}
