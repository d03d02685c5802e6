//! Shared data models.

pub mod connection;
pub mod host;
pub mod query;

// Re-export commonly used types
pub use connection::ConnectionConfig;
pub use host::{HostPattern, NewHost};
pub use query::{ColumnInfo, ProcedureResult, QueryResult};
