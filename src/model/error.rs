use thiserror::Error;

pub type DatabaseResult<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("sqlx migrate error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("sqlx error: {0}")]
    SqlxError(#[source] sqlx::Error),
    /// Insert hit a unique index, e.g. a second user with the same email.
    #[error("unique constraint `{0}` violated")]
    UniqueViolation(String),
    /// A json column did not have the expected shape.
    #[error("serde error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("access to this resource is forbidden")]
    Forbidden,
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        if let Some(db_error) = error.as_database_error() {
            if db_error.is_unique_violation() {
                let constraint = db_error.constraint().unwrap_or("unknown");
                return Self::UniqueViolation(constraint.to_string());
            }
        }
        Self::SqlxError(error)
    }
}
