//! Request DTOs for the stash API.

use serde::Deserialize;
use validator::Validate;

/// User registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    /// Account email.
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    /// Plaintext password, hashed before storage.
    pub password: String,
    /// Optional explicit creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Password.
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_valid() {
        let req = RegisterRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
            created_at: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_register_request_bad_email() {
        let req = RegisterRequest {
            name: "Alice".to_string(),
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
            created_at: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_empty_name() {
        let req = RegisterRequest {
            name: String::new(),
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
            created_at: None,
        };
        assert!(req.validate().is_err());
    }
}
