//! SQLite storage for companies, jobs and applicants.
//!
//! One connection behind a mutex. Every repository call borrows it through
//! [`Database::with_conn`], which releases the lock when the closure returns,
//! errors, or unwinds.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tracing::info;

mod applicants;
mod companies;
pub mod error;
mod jobs;
pub mod migrations;

pub use error::DatabaseError;

/// Cloneable handle to the board database.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database file and apply pending migrations.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| DatabaseError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        let applied = migrations::run_all(&conn)?;

        info!(path = %path.display(), migrations = applied, "database opened");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        migrations::run_all(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` with the connection locked for the closure's duration only.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&Connection) -> Result<T, DatabaseError>,
    {
        let conn = self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        f(&conn)
    }

    /// Cheap round trip used by the readiness check.
    pub fn ping(&self) -> Result<(), DatabaseError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_database_is_created_with_parents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data").join("bawabti.db");

        let db = Database::open(&path).expect("open");
        db.ping().expect("ping");
        assert!(path.exists());

        let reopened = Database::open(&path).expect("reopen");
        let versions: u32 = reopened
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM _migrations", [], |row| row.get(0))?)
            })
            .expect("count");
        assert_eq!(versions, 3);
    }

    #[test]
    fn clones_share_the_connection() {
        let db = Database::open_in_memory().expect("open");
        let other = db.clone();
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO applicants (full_name, email, created_at)
                 VALUES ('Amal', 'amal@example.com', '2024-01-15')",
                [],
            )?;
            Ok(())
        })
        .expect("insert");

        let count: u32 = other
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM applicants", [], |row| row.get(0))?)
            })
            .expect("count");
        assert_eq!(count, 1);
    }

    #[test]
    fn lock_is_released_after_an_error() {
        let db = Database::open_in_memory().expect("open");
        let failed: Result<(), DatabaseError> = db.with_conn(|conn| {
            conn.execute("INSERT INTO missing_table VALUES (1)", [])?;
            Ok(())
        });
        assert!(failed.is_err());
        db.ping().expect("connection usable after a failed call");
    }
}
