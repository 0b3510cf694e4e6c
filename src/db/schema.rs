//! SQL DDL for initializing the account credential storage.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT (durable key for token updates)
/// - one row per mailbox identity
/// - `zmail_address` deliberately NOT UNIQUE: duplicate protection is a
///   pre-check in the bootstrap flow, and alias lookups order by
///   `created_at` DESC to prefer the newest row
/// - `created_at` TEXT, RFC3339, written once and never touched on refresh
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    email TEXT NOT NULL,
    zmail_address TEXT NOT NULL,
    access_token TEXT NOT NULL,
    refresh_token TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_accounts_zmail_address ON accounts(zmail_address);
"#;
