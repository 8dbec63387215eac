//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Input is not a numeric station identifier
    #[error("Invalid station id: {0:?}")]
    InvalidStationId(String),
}
