//! User repository for stash.
//!
//! CRUD operations over the users table and the per-user owned-file list.

use sqlx::{SqliteExecutor, SqlitePool};

use super::user::{NewUser, User};
use crate::{Result, StashError};

/// Repository for user operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user in the database.
    ///
    /// A unique-index violation on email maps to `StashError::Duplicate`;
    /// this is the authoritative duplicate-account guard.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let result = sqlx::query(
            "INSERT INTO users (name, email, password, created_at)
             VALUES (?, ?, ?, COALESCE(?, datetime('now')))",
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password)
        .bind(&new_user.created_at)
        .execute(self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StashError::Duplicate("email".to_string())
            }
            _ => StashError::Database(e.to_string()),
        })?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| StashError::NotFound("user".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let result = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Get a user by email (case-insensitive).
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let result = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, created_at
             FROM users WHERE email = ? COLLATE NOCASE",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Check whether an email is already registered (case-insensitive).
    ///
    /// Fast-path check only; the unique index is the real invariant guard.
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = ? COLLATE NOCASE)")
                .bind(email)
                .fetch_one(self.pool)
                .await?;
        Ok(exists.0)
    }

    /// Ordered list of stored names owned by a user.
    pub async fn file_names(&self, user_id: i64) -> Result<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT stored_name FROM user_files WHERE user_id = ? ORDER BY position",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(names)
    }

    /// Append a stored name to the end of a user's file list.
    ///
    /// Runs on the given executor so the append can join the same
    /// transaction as the metadata insert.
    pub async fn append_file_name(
        &self,
        executor: impl SqliteExecutor<'_>,
        user_id: i64,
        stored_name: &str,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO user_files (user_id, position, stored_name)
             VALUES (?, (SELECT COUNT(*) + 1 FROM user_files WHERE user_id = ?), ?)",
        )
        .bind(user_id)
        .bind(user_id)
        .bind(stored_name)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Remove a stored name from a user's file list.
    pub async fn remove_file_name(
        &self,
        executor: impl SqliteExecutor<'_>,
        user_id: i64,
        stored_name: &str,
    ) -> Result<()> {
        sqlx::query("DELETE FROM user_files WHERE user_id = ? AND stored_name = ?")
            .bind(user_id)
            .bind(stored_name)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Count all users.
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count.0)
    }
}
