//! SQLite schema creation and version checks.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },
    #[error("Not a lamp store (no schema): {0}")]
    NoSchema(String),
}

/// Current schema version. Increment when the consumer model changes.
pub const CURRENT_VERSION: i32 = 1;

/// Tables filled from the JSON resources.
pub const CONTENT_TABLES: [&str; 8] = [
    "books",
    "genres",
    "plans",
    "plan_days",
    "readings",
    "translations",
    "verses",
    "cross_references",
];

/// Create all tables and indexes if they don't exist.
///
/// Idempotent: safe to call on an existing database.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    if get_schema_version(conn)? == 0 {
        set_schema_version(conn, CURRENT_VERSION)?;
    }
    Ok(())
}

/// Open or create a store at the given path.
pub fn open_database(path: &Path) -> Result<Connection, SchemaError> {
    let conn = Connection::open(path)?;
    // journal_mode returns a row, so it cannot go through execute_batch.
    let _mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;

    let version = get_schema_version(&conn)?;
    if version == 0 {
        create_schema(&conn)?;
    } else if version > CURRENT_VERSION {
        return Err(SchemaError::VersionMismatch {
            expected: CURRENT_VERSION,
            found: version,
        });
    }

    Ok(conn)
}

/// Open an existing store read-only, e.g. an exported artifact.
///
/// Fails if the file is missing or does not carry the schema.
pub fn open_readonly(path: &Path) -> Result<Connection, SchemaError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    match get_schema_version(&conn)? {
        0 => Err(SchemaError::NoSchema(path.display().to_string())),
        v if v > CURRENT_VERSION => Err(SchemaError::VersionMismatch {
            expected: CURRENT_VERSION,
            found: v,
        }),
        _ => Ok(conn),
    }
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Get the current schema version, or 0 if no schema exists.
pub fn get_schema_version(conn: &Connection) -> Result<i32, SchemaError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), SchemaError> {
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS genres (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

-- genre_id is not a foreign key.
CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY,
    genre_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    osis_id TEXT NOT NULL,
    osis_paratext_abbreviation TEXT NOT NULL,
    testament TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS translations (
    id INTEGER PRIMARY KEY,
    abbreviation TEXT NOT NULL,
    language TEXT NOT NULL,
    name TEXT NOT NULL,
    url TEXT NOT NULL,
    license TEXT NOT NULL,
    full_description TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS verses (
    row_id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_translation_id INTEGER NOT NULL REFERENCES translations(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    verse_id INTEGER NOT NULL,
    book INTEGER NOT NULL,
    chapter INTEGER NOT NULL,
    verse INTEGER NOT NULL,
    text TEXT NOT NULL,
    translation_ref INTEGER NOT NULL,
    UNIQUE(owner_translation_id, position)
);
CREATE INDEX IF NOT EXISTS idx_verses_verse_id ON verses(verse_id);
CREATE INDEX IF NOT EXISTS idx_verses_translation_ref ON verses(translation_ref);

CREATE TABLE IF NOT EXISTS plans (
    id INTEGER PRIMARY KEY,
    author TEXT NOT NULL,
    name TEXT NOT NULL,
    short_description TEXT NOT NULL,
    full_description TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS plan_days (
    row_id INTEGER PRIMARY KEY AUTOINCREMENT,
    plan_id INTEGER NOT NULL REFERENCES plans(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    day INTEGER NOT NULL,
    UNIQUE(plan_id, position)
);
CREATE INDEX IF NOT EXISTS idx_plan_days_day ON plan_days(day);

CREATE TABLE IF NOT EXISTS readings (
    row_id INTEGER PRIMARY KEY AUTOINCREMENT,
    plan_day_id INTEGER NOT NULL REFERENCES plan_days(row_id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    has_book BOOLEAN NOT NULL DEFAULT 0,
    book_start INTEGER,
    book_end INTEGER,
    has_chapter BOOLEAN NOT NULL DEFAULT 0,
    chapter_start INTEGER,
    chapter_end INTEGER,
    has_verse BOOLEAN NOT NULL DEFAULT 0,
    verse_start INTEGER,
    verse_end INTEGER,
    UNIQUE(plan_day_id, position)
);

CREATE TABLE IF NOT EXISTS cross_references (
    row_id INTEGER PRIMARY KEY AUTOINCREMENT,
    verse_id INTEGER NOT NULL,
    reference INTEGER NOT NULL,
    start_verse INTEGER NOT NULL,
    end_verse INTEGER
);
CREATE INDEX IF NOT EXISTS idx_cross_references_verse_id ON cross_references(verse_id);

-- Runtime state owned by the consuming application. Never written here.
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    plan_in_app_bible BOOLEAN NOT NULL DEFAULT 1,
    plan_external_bible TEXT,
    plan_wpm REAL NOT NULL DEFAULT 183,
    plan_notification BOOLEAN NOT NULL DEFAULT 0,
    plan_notification_time TEXT NOT NULL DEFAULT '18:30',
    reader_translation_id INTEGER REFERENCES translations(id),
    reader_cross_reference_sort TEXT NOT NULL DEFAULT 'r',
    reader_font_size REAL NOT NULL DEFAULT 16
);

CREATE TABLE IF NOT EXISTS user_plans (
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    plan_id INTEGER NOT NULL REFERENCES plans(id),
    PRIMARY KEY (user_id, position)
);

CREATE TABLE IF NOT EXISTS completed_readings (
    id TEXT PRIMARY KEY,
    user_id INTEGER REFERENCES users(id) ON DELETE CASCADE
);

-- Import tracking
CREATE TABLE IF NOT EXISTS import_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    resource TEXT NOT NULL,
    records INTEGER NOT NULL DEFAULT 0,
    imported_at TEXT NOT NULL
);
"#;
