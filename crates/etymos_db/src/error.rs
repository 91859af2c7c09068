//! Error types for the storage and import layer.

use thiserror::Error;

/// Database operation result type.
pub type Result<T> = std::result::Result<T, DbError>;

/// Database and import errors.
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error (connection, query, etc.)
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// IO error (file system operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Constraint violation (not null, foreign key, unique)
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Source document could not be mapped onto the schema
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Stored value could not be decoded (identifier, timestamp, JSON column)
    #[error("Invalid stored value: {0}")]
    InvalidState(String),

    /// Connection string names a backend this build cannot open
    #[error("Unsupported database URL: {0}")]
    UnsupportedUrl(String),

    /// YAML parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DbError {
    /// Create a constraint error.
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Create an invalid state error.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create an invalid document error.
    pub fn invalid_document(msg: impl Into<String>) -> Self {
        Self::InvalidDocument(msg.into())
    }

    /// Classify a write failure.
    ///
    /// Constraint violations reported by the engine become [`DbError::Constraint`]
    /// so callers can tell bad input apart from a broken connection.
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            use sqlx::error::ErrorKind;
            match db_err.kind() {
                ErrorKind::NotNullViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::UniqueViolation
                | ErrorKind::CheckViolation => {
                    return Self::Constraint(db_err.message().to_string());
                }
                _ => {}
            }
        }
        Self::Sqlx(err)
    }

    /// True for errors raised by a storage constraint.
    pub fn is_constraint(&self) -> bool {
        matches!(self, Self::Constraint(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_stay_sqlx() {
        let err = DbError::from_write(sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::Sqlx(sqlx::Error::RowNotFound)));
        assert!(!err.is_constraint());
    }

    #[test]
    fn test_display_includes_detail() {
        let err = DbError::invalid_document("document root must be a mapping");
        assert_eq!(
            err.to_string(),
            "Invalid document: document root must be a mapping"
        );
    }
}
