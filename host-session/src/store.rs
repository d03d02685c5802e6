//! Storage seam for host sessions.

use async_trait::async_trait;

use common::errors::AppResult;
use common::models::{HostPattern, NewHost, ProcedureResult, QueryResult};

/// Operations a session can run against the hosts schema.
#[async_trait]
pub trait HostStore: Send + Sync {
    /// Looks up hosts by name pattern. SELECT is enough.
    async fn lookup_hosts(&self, pattern: &HostPattern) -> AppResult<QueryResult>;

    /// Calls the `superhosts()` reporting procedure.
    async fn superhosts(&self) -> AppResult<ProcedureResult>;

    /// Calls `add_host2()` to insert `host`.
    async fn add_host(&self, host: &NewHost) -> AppResult<ProcedureResult>;

    /// Releases the connection. Later statements fail.
    async fn close(&self);
}
