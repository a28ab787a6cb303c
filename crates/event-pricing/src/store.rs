//! Storage boundary shared by the pricing and ticket repositories.

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("record was modified concurrently")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
