//! Host database session.
//!
//! Opens one session to `airbnbdb` and runs three independent operations
//! on it concurrently:
//! - a host lookup by name pattern
//! - the `superhosts()` reporting procedure (EXECUTE grant required)
//! - the `add_host2()` insert procedure (EXECUTE grant required)

pub mod cli;
pub mod row;
pub mod runner;
pub mod session;
pub mod store;

#[cfg(test)]
mod memory;

pub use runner::{run_session, Outcome, SessionPlan, SessionReport};
pub use session::HostSession;
pub use store::HostStore;
