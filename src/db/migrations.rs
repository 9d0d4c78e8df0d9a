//! Database migrations
//!
//! Schema versions are applied in order, each inside its own transaction, and
//! recorded in `schema_migrations` so reopening a database is a no-op.

use crate::core::error::Result;
use rusqlite::{Connection, OptionalExtension};
use tracing::{info, warn};

/// Migration version tracking table
const MIGRATION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at DATETIME DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Initial schema migration (version 1)
const MIGRATION_V1: &str = r#"
-- Users table (authentication)
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    login TEXT NOT NULL UNIQUE CHECK (length(login) > 0),
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('admin', 'user')),
    created_at TEXT NOT NULL DEFAULT (STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_users_role ON users(role);
"#;

/// All migrations, ordered by version
const MIGRATIONS: &[(i64, &str)] = &[(1, MIGRATION_V1)];

/// Run all pending migrations
pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(MIGRATION_TABLE)?;

    let current = current_version(conn)?;
    let latest = MIGRATIONS.last().map(|(v, _)| *v).unwrap_or(0);

    if current > latest {
        warn!(
            current_version = current,
            latest_version = latest,
            "Database schema is newer than this build"
        );
        return Ok(());
    }

    for (version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        apply_migration(conn, *version, sql)?;
    }

    Ok(())
}

/// Highest applied migration version, 0 for a fresh database
pub fn current_version(conn: &Connection) -> Result<i64> {
    let version: Option<i64> = conn
        .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get::<_, Option<i64>>(0)
        })
        .optional()?
        .flatten();
    Ok(version.unwrap_or(0))
}

fn apply_migration(conn: &mut Connection, version: i64, sql: &str) -> Result<()> {
    let tx = conn.transaction()?;

    tx.execute_batch(sql).map_err(|e| {
        warn!("Migration v{} failed: {}", version, e);
        e
    })?;
    tx.execute("INSERT INTO schema_migrations (version) VALUES (?)", [version])?;
    tx.commit()?;

    info!("Migration v{} applied successfully", version);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();

        run_migrations(&mut conn).unwrap();
        assert_eq!(current_version(&conn).unwrap(), 1);

        run_migrations(&mut conn).unwrap();
        let applied: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(applied, 1);
    }

    #[test]
    fn test_users_table_constraints() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();

        conn.execute(
            "INSERT INTO users (login, password_hash, role) VALUES ('ann', 'h', 'user')",
            [],
        )
        .unwrap();

        let duplicate = conn.execute(
            "INSERT INTO users (login, password_hash, role) VALUES ('ann', 'h', 'user')",
            [],
        );
        assert!(duplicate.is_err());

        let empty_login = conn.execute(
            "INSERT INTO users (login, password_hash, role) VALUES ('', 'h', 'user')",
            [],
        );
        assert!(empty_login.is_err());

        let bad_role = conn.execute(
            "INSERT INTO users (login, password_hash, role) VALUES ('bob', 'h', 'root')",
            [],
        );
        assert!(bad_role.is_err());
    }
}
