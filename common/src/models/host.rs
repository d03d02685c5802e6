//! Host models: lookup patterns and new-host requests.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::like_pattern;

/// A `LIKE` pattern matched against `hosts.host_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPattern(String);

impl HostPattern {
    /// Names containing `term` anywhere.
    pub fn contains(term: &str) -> Self {
        Self(format!("%{}%", like_pattern::escape(term)))
    }

    /// Names equal to `term` (under the column's collation).
    pub fn exact(term: &str) -> Self {
        Self(like_pattern::escape(term))
    }

    /// Pattern used verbatim; `%` and `_` keep their wildcard meaning.
    pub fn raw(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HostPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A host to insert through the `add_host2` procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewHost {
    /// Primary key of the new row.
    pub id: u32,
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    /// Superhost flag.
    pub is_superhost: bool,
}

impl NewHost {
    pub fn new(id: u32, name: impl Into<String>, is_superhost: bool) -> Self {
        Self {
            id,
            name: name.into(),
            is_superhost,
        }
    }
}
