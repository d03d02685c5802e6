//! Utility functions and helpers.

pub mod id_generator;
pub mod like_pattern;

// Re-export commonly used types
pub use id_generator::IdGenerator;
