//! Authentication primitives for stash.
//!
//! Password hashing lives here; token mint/verify lives in the web layer
//! next to the middleware that consumes it.

mod password;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
