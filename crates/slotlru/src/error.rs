//! Error types for slotlru

use thiserror::Error;

/// Result type alias for slotlru operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache construction
///
/// Lookups and deletes of absent keys are not errors; they return `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Capacity must be a positive number of entries
    #[error("Invalid configuration: capacity must be greater than 0 (got {capacity})")]
    InvalidConfiguration {
        /// The rejected capacity
        capacity: usize,
    },
}
