//! Unique ID generator.

use uuid::Uuid;

/// Generates identifiers used to correlate log lines.
pub struct IdGenerator;

impl IdGenerator {
    /// Generates a unique session ID.
    ///
    /// # Returns
    /// A unique UUID string.
    pub fn session_id() -> String {
        Uuid::new_v4().to_string()
    }
}
