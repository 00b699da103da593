use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Field rule violations, in validator order.
    #[error("validation error: {}", .0.join(", "))]
    Validation(Vec<String>),
    #[error("User must have an id")]
    MissingId,
    #[error("user already exists: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl ServiceError {
    pub fn not_found(id: &str) -> Self { Self::NotFound(format!("user {} not found", id)) }
}
