//! Database schema and migrations for stash.
//!
//! Migrations are applied sequentially when the database is opened; the
//! schema_version table tracks which have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: Users table
    r#"
-- Users table for authentication
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL,
    password    TEXT NOT NULL,           -- Argon2 hash
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Email uniqueness is enforced here, at the storage layer. The handler's
-- exists-check is only a fast path; concurrent registrations race to this
-- index and exactly one wins.
CREATE UNIQUE INDEX idx_users_email_nocase ON users(email COLLATE NOCASE);
"#,
    // v2: File metadata and per-user owned-file list
    r#"
-- File metadata, one row per stored blob
CREATE TABLE files (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    stored_name  TEXT NOT NULL UNIQUE,   -- generated UUID.ext name
    filename     TEXT NOT NULL,          -- client-supplied original name
    content_type TEXT NOT NULL,
    size         INTEGER NOT NULL,
    owner_id     INTEGER NOT NULL REFERENCES users(id),
    created_at   TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_files_owner ON files(owner_id);

-- Ordered list of stored names owned by each user
CREATE TABLE user_files (
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    position    INTEGER NOT NULL,
    stored_name TEXT NOT NULL,
    PRIMARY KEY (user_id, position)
);
"#,
];
