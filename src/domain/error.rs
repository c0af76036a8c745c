//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent structural lookups that cannot be satisfied.
///
/// Tree building itself never fails: undated or orphaned nodes are skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("top range {index} not found ({available} available)")]
    TopRangeNotFound { index: usize, available: usize },
}
