use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Invalid {table} record: {reason}")]
    InvalidRecord { table: &'static str, reason: String },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("{0}")]
    InvalidAttachment(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Record source error: {0}")]
    Source(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn invalid_record(table: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            table,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
