use std::path::PathBuf;

use rusqlite::ErrorCode;

use crate::board::repository::RepositoryError;

/// Errors from database operations.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("cannot prepare database directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("migration {version} failed: {reason}")]
    Migration { version: u32, reason: String },
    #[error("database lock poisoned")]
    LockPoisoned,
}

impl DatabaseError {
    /// Column named by a `UNIQUE constraint failed: table.column` error.
    pub fn unique_violation(&self) -> Option<&str> {
        let Self::Sqlite(rusqlite::Error::SqliteFailure(failure, Some(message))) = self else {
            return None;
        };
        if failure.code != ErrorCode::ConstraintViolation {
            return None;
        }
        let target = message.strip_prefix("UNIQUE constraint failed: ")?;
        let first = target.split(',').next()?.trim();
        Some(first.rsplit('.').next().unwrap_or(first))
    }
}

impl From<DatabaseError> for RepositoryError {
    fn from(err: DatabaseError) -> Self {
        match err.unique_violation() {
            Some(field) => RepositoryError::Conflict {
                field: field.to_string(),
            },
            None => RepositoryError::Unavailable(err.to_string()),
        }
    }
}
