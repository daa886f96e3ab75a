//! SQL schema for the Eventhall SQLite store.
//!
//! Executed once at connection startup. Tracked with `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Identities are never updated or deleted.
-- The UNIQUE constraint on email is what guarantees one identity per email;
-- the application-level lookup before insert is advisory only.
CREATE TABLE IF NOT EXISTS identities (
    identity_id TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL,
    credential  TEXT NOT NULL,   -- argon2 PHC string, never plaintext
    event       TEXT NOT NULL,   -- free-text event reference
    created_at  TEXT NOT NULL,
    CHECK (credential LIKE '$%')
);

CREATE UNIQUE INDEX IF NOT EXISTS identities_email_idx ON identities(email);

CREATE TABLE IF NOT EXISTS events (
    event_id    TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT NOT NULL,
    date        TEXT NOT NULL,   -- YYYY-MM-DD
    location    TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS events_date_idx ON events(date);

-- Contact-form submissions are append-only.
CREATE TABLE IF NOT EXISTS contact_messages (
    message_id TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    email      TEXT NOT NULL,
    message    TEXT NOT NULL,
    created_at TEXT NOT NULL
);

PRAGMA user_version = 1;
";
