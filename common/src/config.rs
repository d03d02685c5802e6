//! Application configuration.
//!
//! Values come from environment variables (a `.env` file is loaded by the
//! binary before this runs) and fall back to defaults suited to a local
//! MySQL install. The binary overrides individual fields from its CLI.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::models::connection::ConnectionConfig;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 3306;
const DEFAULT_DATABASE: &str = "airbnbdb";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Privilege tier of the database account a session logs in as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Holds EXECUTE grants on the stored procedures.
    #[default]
    Admin,
    /// SELECT only.
    Client,
}

impl Profile {
    /// Account name used when no user is configured explicitly.
    pub fn default_user(&self) -> &'static str {
        match self {
            Profile::Admin => "airbnbadmin",
            Profile::Client => "airbnbclient",
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Profile::Admin => write!(f, "admin"),
            Profile::Client => write!(f, "client"),
        }
    }
}

impl FromStr for Profile {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Profile::Admin),
            "client" => Ok(Profile::Client),
            other => Err(AppError::Config(format!("unknown profile: {}", other))),
        }
    }
}

/// Process-wide configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Name used in log fields.
    pub service_name: String,
    pub profile: Profile,
    pub db_host: String,
    pub db_port: u16,
    /// Falls back to the profile's account when unset.
    pub db_user: Option<String>,
    pub db_password: Option<String>,
    pub db_name: String,
    pub connect_timeout_secs: u64,
}

impl AppConfig {
    /// Loads configuration from the environment for the named service.
    ///
    /// Unparseable numeric values fall back to their defaults.
    ///
    /// # Errors
    /// Returns `AppError::Config` when `DB_PROFILE` names no known profile.
    pub fn load_with_service(service_name: &str) -> AppResult<Self> {
        Ok(Self {
            service_name: service_name.to_string(),
            profile: parse_profile(env_string("DB_PROFILE"))?,
            db_host: env_string("DB_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            db_port: env_parse("DB_PORT").unwrap_or(DEFAULT_PORT),
            db_user: env_string("DB_USER"),
            db_password: env_string("DB_PASSWORD"),
            db_name: env_string("DB_NAME").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            connect_timeout_secs: env_parse("DB_CONNECT_TIMEOUT_SECS")
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        })
    }

    /// Resolves the connection settings for the configured profile.
    ///
    /// # Errors
    /// Returns `AppError::Config` when no password is available.
    pub fn connection_config(&self) -> AppResult<ConnectionConfig> {
        let password = self
            .db_password
            .clone()
            .ok_or_else(|| AppError::Config("DB_PASSWORD is not set".into()))?;

        Ok(ConnectionConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            username: self
                .db_user
                .clone()
                .unwrap_or_else(|| self.profile.default_user().to_string()),
            password,
            database: self.db_name.clone(),
            connect_timeout_secs: self.connect_timeout_secs,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_name: "host-session".to_string(),
            profile: Profile::default(),
            db_host: DEFAULT_HOST.to_string(),
            db_port: DEFAULT_PORT,
            db_user: None,
            db_password: None,
            db_name: DEFAULT_DATABASE.to_string(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

/// An unset profile means admin; an unknown one is an error.
fn parse_profile(value: Option<String>) -> AppResult<Profile> {
    value.map_or(Ok(Profile::default()), |v| {
        v.trim()
            .parse()
            .map_err(|_| AppError::Config(format!("DB_PROFILE must be admin or client, got: {}", v)))
    })
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|v| v.trim().parse().ok())
}
