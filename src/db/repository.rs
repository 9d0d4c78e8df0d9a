//! Repository pattern implementation for data access layer
//!
//! This module provides the Repository pattern for abstracting database operations.

use crate::core::error::{DeskError, Result};
use crate::db::manager::DatabaseManager;
use crate::db::models::{NewUser, Role, User};
use async_trait::async_trait;
use rusqlite::{ErrorCode, OptionalExtension, Row};
use std::sync::Arc;

/// Generic repository trait for the create / read / delete lifecycle
#[async_trait]
pub trait Repository<T>: Send + Sync {
    /// Insert payload accepted by [`Repository::create`]
    type New: Send + Sync;

    /// Find an entity by its ID
    async fn find_by_id(&self, id: i64) -> Result<Option<T>>;

    /// Find all entities
    async fn find_all(&self) -> Result<Vec<T>>;

    /// Create a new entity and return it as stored
    async fn create(&self, entity: &Self::New) -> Result<T>;

    /// Delete an entity by its ID, returning whether a row was removed
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// Whether SQLite rejected a write because of a UNIQUE constraint
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

const USER_COLUMNS: &str = "id, login, password_hash, role, created_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        login: row.get(1)?,
        password_hash: row.get(2)?,
        role: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Repository for User entities
pub struct UserRepository {
    db: Arc<DatabaseManager>,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Find a user by login
    pub async fn find_by_login(&self, login: &str) -> Result<Option<User>> {
        let login = login.to_string();
        self.db
            .execute(move |conn| {
                Ok(conn
                    .query_row(
                        &format!("SELECT {} FROM users WHERE login = ?", USER_COLUMNS),
                        [&login],
                        user_from_row,
                    )
                    .optional()?)
            })
            .await
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64> {
        self.db
            .execute(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?))
            .await
    }

    /// Count users holding a role
    pub async fn count_by_role(&self, role: Role) -> Result<i64> {
        self.db
            .execute(move |conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM users WHERE role = ?",
                    [role],
                    |row| row.get(0),
                )?)
            })
            .await
    }
}

#[async_trait]
impl Repository<User> for UserRepository {
    type New = NewUser;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        self.db
            .execute(move |conn| {
                Ok(conn
                    .query_row(
                        &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                        [id],
                        user_from_row,
                    )
                    .optional()?)
            })
            .await
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        self.db
            .execute(|conn| {
                let mut stmt =
                    conn.prepare(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))?;
                let users = stmt
                    .query_map([], user_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(users)
            })
            .await
    }

    async fn create(&self, user: &NewUser) -> Result<User> {
        let user = user.clone();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO users (login, password_hash, role) VALUES (?, ?, ?)",
                    rusqlite::params![&user.login, &user.password_hash, user.role],
                )
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        DeskError::LoginAlreadyExists(user.login.clone())
                    } else {
                        DeskError::DatabaseError(e)
                    }
                })?;

                let id = conn.last_insert_rowid();
                Ok(conn.query_row(
                    &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                    [id],
                    user_from_row,
                )?)
            })
            .await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        self.db
            .execute(move |conn| {
                let removed = conn.execute("DELETE FROM users WHERE id = ?", [id])?;
                Ok(removed > 0)
            })
            .await
    }
}
