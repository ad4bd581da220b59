//! Versioned schema migrations tracked in a `_migrations` table.

use rusqlite::Connection;
use tracing::info;

use super::error::DatabaseError;

struct Migration {
    version: u32,
    description: &'static str,
    sql: &'static str,
}

/// All migrations in order. Each is applied at most once.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "create_companies_table",
        sql: include_str!("sql/001_create_companies.sql"),
    },
    Migration {
        version: 2,
        description: "create_jobs_table",
        sql: include_str!("sql/002_create_jobs.sql"),
    },
    Migration {
        version: 3,
        description: "create_applicants_table",
        sql: include_str!("sql/003_create_applicants.sql"),
    },
];

/// Apply every migration newer than the recorded version. Returns how many ran.
pub fn run_all(conn: &Connection) -> Result<usize, DatabaseError> {
    apply(conn, MIGRATIONS)
}

/// Each migration commits together with its `_migrations` row, or not at all.
fn apply(conn: &Connection, migrations: &[Migration]) -> Result<usize, DatabaseError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    let current_version: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM _migrations",
        [],
        |row| row.get(0),
    )?;

    let mut applied = 0;
    for migration in migrations {
        if migration.version <= current_version {
            continue;
        }

        info!(
            version = migration.version,
            description = migration.description,
            "applying migration"
        );
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(migration.sql)
            .map_err(|err| DatabaseError::Migration {
                version: migration.version,
                reason: err.to_string(),
            })?;
        tx.execute(
            "INSERT INTO _migrations (version, description) VALUES (?1, ?2)",
            rusqlite::params![migration.version, migration.description],
        )?;
        tx.commit()?;
        applied += 1;
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Connection {
        let conn = Connection::open_in_memory().expect("in-memory connection");
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .expect("foreign keys");
        conn
    }

    #[test]
    fn migrations_run_once() {
        let conn = fresh();
        assert_eq!(run_all(&conn).expect("first run"), MIGRATIONS.len());
        assert_eq!(run_all(&conn).expect("second run"), 0);

        let count: usize = conn
            .query_row("SELECT COUNT(*) FROM _migrations", [], |row| row.get(0))
            .expect("count");
        assert_eq!(count, MIGRATIONS.len());
    }

    #[test]
    fn applicants_reference_jobs() {
        let conn = fresh();
        run_all(&conn).expect("migrations");

        let err = conn
            .execute(
                "INSERT INTO applicants (job_id, full_name, email, created_at)
                 VALUES (42, 'Amal', 'amal@example.com', '2024-01-15')",
                [],
            )
            .expect_err("job 42 does not exist");
        assert!(err.to_string().contains("FOREIGN KEY"));
    }

    #[test]
    fn applicant_status_defaults_to_new() {
        let conn = fresh();
        run_all(&conn).expect("migrations");

        conn.execute(
            "INSERT INTO applicants (full_name, email, created_at)
             VALUES ('Amal', 'amal@example.com', '2024-01-15')",
            [],
        )
        .expect("insert");
        let status: String = conn
            .query_row("SELECT status FROM applicants", [], |row| row.get(0))
            .expect("status");
        assert_eq!(status, "new");
    }

    #[test]
    fn failed_migration_leaves_no_partial_schema() {
        let conn = fresh();
        let steps = [
            Migration {
                version: 1,
                description: "create_notes",
                sql: "CREATE TABLE notes (id INTEGER PRIMARY KEY);",
            },
            Migration {
                version: 2,
                description: "broken_step",
                sql: "CREATE TABLE drafts (id INTEGER PRIMARY KEY);
                      INSERT INTO no_such_table VALUES (1);",
            },
        ];

        match apply(&conn, &steps) {
            Err(DatabaseError::Migration { version, .. }) => assert_eq!(version, 2),
            other => panic!("expected migration 2 to fail, got {other:?}"),
        }

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .expect("prepare")
            .query_map([], |row| row.get(0))
            .expect("query")
            .collect::<Result<_, _>>()
            .expect("rows");
        assert_eq!(tables, vec!["_migrations", "notes"]);

        let recorded: u32 = conn
            .query_row("SELECT MAX(version) FROM _migrations", [], |row| row.get(0))
            .expect("version");
        assert_eq!(recorded, 1);
    }
}
