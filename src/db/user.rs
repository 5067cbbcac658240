//! User model for stash.

/// User entity representing a registered account.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Email address (unique, case-insensitive).
    pub email: String,
    /// Password hash (Argon2 PHC string).
    pub password: String,
    /// Account creation timestamp.
    pub created_at: String,
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Password hash (pre-hashed with Argon2).
    pub password: String,
    /// Creation timestamp override. Defaults to the database clock.
    pub created_at: Option<String>,
}

impl NewUser {
    /// Create a new user with the required fields.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            created_at: None,
        }
    }

    /// Set an explicit creation timestamp.
    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }
}
