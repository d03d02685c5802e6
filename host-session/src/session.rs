//! MySQL host session.
//!
//! Holds the one authenticated connection to `airbnbdb` and runs the lookup
//! query and the two stored procedures on it. All statements bind their
//! inputs as parameters. Statements dispatched concurrently queue on the
//! connection lock without a deadline.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::mysql::{MySql, MySqlArguments, MySqlConnection};
use sqlx::query::Query;
use sqlx::{Connection, Either, Executor};
use tokio::sync::Mutex;
use validator::Validate;

use common::errors::{AppError, AppResult};
use common::models::{ConnectionConfig, HostPattern, NewHost, ProcedureResult, QueryResult};

use crate::row;
use crate::store::HostStore;

/// Host lookup; the pattern is bound, never interpolated.
pub const LOOKUP_HOSTS_SQL: &str = "SELECT * FROM hosts WHERE host_name LIKE ?";
/// Reporting procedure, EXECUTE grant required.
pub const SUPERHOSTS_SQL: &str = "CALL superhosts()";
/// Insert procedure: id, name, host-since (server clock), superhost flag.
pub const ADD_HOST_SQL: &str = "CALL add_host2(?, ?, NOW(), ?)";

/// An open session to the hosts database.
pub struct HostSession {
    /// `None` once closed.
    conn: Mutex<Option<MySqlConnection>>,
    target: String,
}

impl HostSession {
    /// Validates `config` and opens the connection with a single attempt.
    ///
    /// # Errors
    /// `Validation` for a bad config, `AuthenticationFailed` when the server
    /// rejects the credentials, `DatabaseConnection` otherwise (including the
    /// connect timeout). The driver's error text is kept.
    pub async fn connect(config: &ConnectionConfig) -> AppResult<Self> {
        config.validate()?;

        let timeout = Duration::from_secs(config.connect_timeout_secs);
        let conn = tokio::time::timeout(
            timeout,
            MySqlConnection::connect_with(&config.connect_options()),
        )
        .await
        .map_err(|_| {
            AppError::DatabaseConnection(format!(
                "no connection to {}:{} within {}s",
                config.host, config.port, config.connect_timeout_secs
            ))
        })?
        .map_err(AppError::from_connect)?;

        let target = config.display_target();
        tracing::debug!(target_db = %target, "Connection opened");
        Ok(Self {
            conn: Mutex::new(Some(conn)),
            target,
        })
    }

    /// Runs a `CALL` and collects every row-set it returns.
    ///
    /// The server ends each row-set and the call itself with an OK packet;
    /// OK packets that close no rows only contribute to `affected_rows`.
    async fn call_procedure<'q>(
        &self,
        query: Query<'q, MySql, MySqlArguments>,
    ) -> AppResult<ProcedureResult> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(closed)?;

        let start = Instant::now();
        let mut stream = (&mut *conn).fetch_many(query);

        let mut result_sets = Vec::new();
        let mut current = Vec::new();
        let mut affected_rows = 0;

        while let Some(item) = stream.try_next().await.map_err(AppError::from_query)? {
            match item {
                Either::Left(done) => {
                    affected_rows += done.rows_affected();
                    if !current.is_empty() {
                        result_sets.push(row::to_query_result(&current));
                        current.clear();
                    }
                }
                Either::Right(row) => current.push(row),
            }
        }
        if !current.is_empty() {
            result_sets.push(row::to_query_result(&current));
        }

        Ok(ProcedureResult {
            result_sets,
            affected_rows,
            execution_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

fn closed() -> AppError {
    AppError::DatabaseQuery("connection is closed".into())
}

#[async_trait]
impl HostStore for HostSession {
    async fn lookup_hosts(&self, pattern: &HostPattern) -> AppResult<QueryResult> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(closed)?;

        let start = Instant::now();
        let rows = sqlx::query(LOOKUP_HOSTS_SQL)
            .bind(pattern.as_str())
            .fetch_all(&mut *conn)
            .await
            .map_err(AppError::from_query)?;

        Ok(row::to_query_result(&rows).with_duration(start.elapsed().as_millis() as u64))
    }

    async fn superhosts(&self) -> AppResult<ProcedureResult> {
        self.call_procedure(sqlx::query(SUPERHOSTS_SQL)).await
    }

    async fn add_host(&self, host: &NewHost) -> AppResult<ProcedureResult> {
        host.validate()?;

        let query = sqlx::query(ADD_HOST_SQL)
            .bind(host.id)
            .bind(host.name.as_str())
            .bind(host.is_superhost);
        self.call_procedure(query).await
    }

    async fn close(&self) {
        let Some(conn) = self.conn.lock().await.take() else {
            return;
        };
        match conn.close().await {
            Ok(()) => tracing::debug!(target_db = %self.target, "Connection closed"),
            Err(e) => tracing::warn!(target_db = %self.target, error = %e, "Connection closed uncleanly"),
        }
    }
}
