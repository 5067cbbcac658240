//! stash - a minimal file stash server.
//!
//! Provides user registration/login with Argon2 password hashing and JWT
//! issuance, plus token-authenticated file uploads stored as UUID-named
//! blobs with SQLite-backed metadata.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use auth::{hash_password, validate_password, verify_password, PasswordError};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository};
pub use error::{Result, StashError};
pub use file::{BlobStorage, FileRecord, FileRepository, NewFileRecord, UploadService};
