use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Db(String),
    #[error("deadline exceeded before the store responded")]
    DeadlineExceeded,
    #[error(transparent)]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn employee_not_found(id: &str) -> Self {
        Self::NotFound(format!("Employee not found with ID: {}", id))
    }

    /// Wrap a store failure for operation `op` ("create", "find", ...).
    pub fn db(op: &str, cause: impl std::fmt::Display) -> Self {
        Self::Db(format!("Failed to {} employee: {}", op, cause))
    }
}
