use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Invalid ID format: {id:?}: {reason}")]
    InvalidId { id: String, reason: String },
    #[error("database error: {0}")]
    Db(String),
}
