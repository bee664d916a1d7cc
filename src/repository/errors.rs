use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Failures surfaced by the storage layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    /// A unique, foreign key or check constraint rejected the write.
    #[error("constraint violation: {0}")]
    Conflict(String),
    /// A stored value could not be mapped onto its domain type.
    #[error("invalid stored data: {0}")]
    InvalidData(String),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("database error: {0}")]
    Database(DieselError),
}

impl From<DieselError> for RepositoryError {
    fn from(value: DieselError) -> Self {
        match value {
            DieselError::NotFound => RepositoryError::NotFound,
            DieselError::DatabaseError(
                kind @ (DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::CheckViolation
                | DatabaseErrorKind::NotNullViolation),
                info,
            ) => RepositoryError::Conflict(format!("{kind:?}: {}", info.message())),
            other => RepositoryError::Database(other),
        }
    }
}
