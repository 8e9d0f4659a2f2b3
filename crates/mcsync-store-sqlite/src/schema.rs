//! SQL schema for the mcsync SQLite store.
//!
//! Executed on every open. Column additions for databases created by earlier
//! layouts are applied afterwards by [`MIGRATIONS`].

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Rows are never deleted; facets are rewritten on every pass.
CREATE TABLE IF NOT EXISTS players (
    uuid          TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    last_seen     TEXT,              -- ISO 8601 UTC or NULL
    active        BOOLEAN NOT NULL DEFAULT 0,
    op            BOOLEAN NOT NULL DEFAULT 0,
    banned        BOOLEAN NOT NULL DEFAULT 0,
    banned_reason TEXT,
    whitelisted   BOOLEAN NOT NULL DEFAULT 0
);

-- Append-only; only the active flag is ever updated.
CREATE TABLE IF NOT EXISTS server_properties (
    key      TEXT NOT NULL,
    value    TEXT NOT NULL,
    revision INTEGER NOT NULL DEFAULT 0,
    date     TEXT NOT NULL,          -- ISO 8601 UTC; store-assigned
    active   BOOLEAN NOT NULL DEFAULT 1,
    PRIMARY KEY (key, revision)
);

CREATE INDEX IF NOT EXISTS players_name_idx ON players(name);
CREATE UNIQUE INDEX IF NOT EXISTS server_properties_active_idx
    ON server_properties(key) WHERE active = 1;

PRAGMA user_version = 2;
";

/// `(table, column, ALTER statement)` applied when `column` is missing.
pub const MIGRATIONS: &[(&str, &str, &str)] = &[(
  "players",
  "banned_reason",
  "ALTER TABLE players ADD COLUMN banned_reason TEXT",
)];
