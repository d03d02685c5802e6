//! Connection configuration model.

use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlConnectOptions;
use validator::Validate;

/// Settings for one authenticated MySQL session.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConnectionConfig {
    /// Database host.
    #[validate(length(min = 1, message = "Host is required"))]
    pub host: String,
    /// Database port.
    #[validate(range(min = 1, message = "Port must be non-zero"))]
    pub port: u16,
    /// Database username.
    #[validate(length(min = 1, message = "User is required"))]
    pub username: String,
    /// Database password (never serialized).
    #[serde(skip_serializing, default)]
    pub password: String,
    /// Target database (schema) name.
    #[validate(length(min = 1, message = "Database name is required"))]
    pub database: String,
    /// Seconds to wait for the connection to open.
    pub connect_timeout_secs: u64,
}

impl ConnectionConfig {
    /// Builds the sqlx connect options. Credentials are passed as-is, so
    /// passwords need no URL escaping.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database)
    }

    /// `user@host:port/database`, safe to log.
    pub fn display_target(&self) -> String {
        format!("{}@{}:{}/{}", self.username, self.host, self.port, self.database)
    }
}
