//! Session dispatcher.
//!
//! Connects, fires the three operations concurrently, logs each completion
//! on its own, then releases the connection. A failed connection stops the
//! session before anything is dispatched; a failed operation is logged and
//! recorded without affecting its siblings.

use std::future::Future;

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use tracing::{info, warn, Instrument};

use common::errors::{AppError, AppResult};
use common::models::{HostPattern, NewHost, ProcedureResult, QueryResult};
use common::utils::IdGenerator;

use crate::store::HostStore;

/// What a session does once connected.
#[derive(Debug, Clone)]
pub struct SessionPlan {
    /// Pattern for the host lookup.
    pub lookup: HostPattern,
    /// Host passed to `add_host2`.
    pub new_host: NewHost,
}

impl Default for SessionPlan {
    fn default() -> Self {
        Self {
            lookup: HostPattern::contains("Kia"),
            new_host: NewHost::new(121, "Lorem", true),
        }
    }
}

/// Completion of one dispatched operation.
#[derive(Debug)]
pub enum Outcome<T> {
    Succeeded(T),
    Failed(AppError),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded(_))
    }
}

impl<T> From<AppResult<T>> for Outcome<T> {
    fn from(result: AppResult<T>) -> Self {
        match result {
            Ok(value) => Outcome::Succeeded(value),
            Err(err) => Outcome::Failed(err),
        }
    }
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Outcome", 2)?;
        match self {
            Outcome::Succeeded(result) => {
                state.serialize_field("status", "succeeded")?;
                state.serialize_field("result", result)?;
            }
            Outcome::Failed(err) => {
                state.serialize_field("status", "failed")?;
                state.serialize_field(
                    "error",
                    &serde_json::json!({ "code": err.code(), "message": err.to_string() }),
                )?;
            }
        }
        state.end()
    }
}

/// Outcomes of one session, one per operation.
#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub session_id: String,
    pub lookup: Outcome<QueryResult>,
    pub superhosts: Outcome<ProcedureResult>,
    pub add_host: Outcome<ProcedureResult>,
}

impl SessionReport {
    pub fn all_succeeded(&self) -> bool {
        self.failures() == 0
    }

    /// Number of operations that failed.
    pub fn failures(&self) -> usize {
        [
            self.lookup.is_success(),
            self.superhosts.is_success(),
            self.add_host.is_success(),
        ]
        .into_iter()
        .filter(|ok| !ok)
        .count()
    }
}

/// Runs one session: connect, dispatch, close.
///
/// # Errors
/// Returns the connection error unchanged. Operation failures are reported
/// in the [`SessionReport`], never as `Err`.
pub async fn run_session<S, F>(connect: F, plan: &SessionPlan) -> AppResult<SessionReport>
where
    S: HostStore,
    F: Future<Output = AppResult<S>>,
{
    let session_id = IdGenerator::session_id();
    let span = tracing::info_span!("session", session_id = %session_id);

    async move {
        let store = match connect.await {
            Ok(store) => store,
            Err(e) => {
                tracing::error!(code = e.code(), error = %e, "Connection failed");
                return Err(e);
            }
        };
        info!("Connected!");

        let report = dispatch(&store, plan, session_id).await;
        store.close().await;
        info!(failures = report.failures(), "Session finished");
        Ok(report)
    }
    .instrument(span)
    .await
}

/// Fires the three operations on `store` without ordering them.
pub async fn dispatch<S>(store: &S, plan: &SessionPlan, session_id: String) -> SessionReport
where
    S: HostStore + ?Sized,
{
    let (lookup, superhosts, add_host) = tokio::join!(
        lookup_hosts(store, &plan.lookup),
        report_superhosts(store),
        add_host(store, &plan.new_host),
    );

    SessionReport {
        session_id,
        lookup,
        superhosts,
        add_host,
    }
}

async fn lookup_hosts<S>(store: &S, pattern: &HostPattern) -> Outcome<QueryResult>
where
    S: HostStore + ?Sized,
{
    let outcome = Outcome::from(store.lookup_hosts(pattern).await);
    match &outcome {
        Outcome::Succeeded(result) => info!(
            pattern = %pattern,
            rows = result.row_count,
            records = %render(&result.records()),
            "Host lookup completed"
        ),
        Outcome::Failed(e) => warn!(pattern = %pattern, code = e.code(), error = %e, "Host lookup failed"),
    }
    outcome
}

async fn report_superhosts<S>(store: &S) -> Outcome<ProcedureResult>
where
    S: HostStore + ?Sized,
{
    let outcome = Outcome::from(store.superhosts().await);
    match &outcome {
        Outcome::Succeeded(call) => {
            // only the first row-set is reported
            let first = call.first_result_set().map(QueryResult::records).unwrap_or_default();
            info!(rows = first.len(), records = %render(&first), "superhosts() completed");
        }
        Outcome::Failed(e) => warn!(code = e.code(), error = %e, "superhosts() failed"),
    }
    outcome
}

async fn add_host<S>(store: &S, host: &NewHost) -> Outcome<ProcedureResult>
where
    S: HostStore + ?Sized,
{
    let outcome = Outcome::from(store.add_host(host).await);
    match &outcome {
        Outcome::Succeeded(call) => info!(
            host_id = host.id,
            affected_rows = call.affected_rows,
            result = %render(call),
            "{} added successfully to database!",
            host.name
        ),
        Outcome::Failed(e) => warn!(
            host_id = host.id,
            code = e.code(),
            error = %e,
            "Could not add {} to database.",
            host.name
        ),
    }
    outcome
}

fn render<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<unrenderable: {}>", e))
}
