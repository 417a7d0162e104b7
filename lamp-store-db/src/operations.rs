//! Insert operations for every importable record type.
//!
//! Every insert is a plain `INSERT`: a duplicate primary key is an error, never
//! a silent overwrite. Callers wrap a whole resource in one transaction.

use lamp_store_model::types::*;
use lamp_store_model::Resource;
use rusqlite::{Connection, params};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Failed to insert {entity_type} with id {id}: {source}")]
    Insert {
        entity_type: &'static str,
        id: i64,
        source: rusqlite::Error,
    },
    #[error("Unknown table: {0}")]
    UnknownTable(String),
}

/// A record type that can be written to the store.
pub trait Record {
    /// The resource file this type is decoded from.
    const RESOURCE: Resource;

    /// The table holding the top-level rows.
    const TABLE: &'static str;

    fn id(&self) -> i64;

    /// Write this record and all of its nested children.
    fn insert(&self, conn: &Connection) -> Result<(), OperationError>;
}

/// Attach entity context to a SQLite error.
fn insert_err<T: Record>(record: &T) -> impl FnOnce(rusqlite::Error) -> OperationError {
    let id = record.id();
    move |source| OperationError::Insert {
        entity_type: T::TABLE,
        id,
        source,
    }
}

// ── Genre / Book ────────────────────────────────────────────────────────────

impl Record for Genre {
    const RESOURCE: Resource = Resource::Genres;
    const TABLE: &'static str = "genres";

    fn id(&self) -> i64 {
        self.id
    }

    fn insert(&self, conn: &Connection) -> Result<(), OperationError> {
        conn.execute(
            "INSERT INTO genres (id, name) VALUES (?1, ?2)",
            params![self.id, self.name],
        )
        .map_err(insert_err(self))?;
        Ok(())
    }
}

impl Record for Book {
    const RESOURCE: Resource = Resource::Books;
    const TABLE: &'static str = "books";

    fn id(&self) -> i64 {
        self.id
    }

    fn insert(&self, conn: &Connection) -> Result<(), OperationError> {
        conn.execute(
            "INSERT INTO books (id, genre_id, name, osis_id, osis_paratext_abbreviation, testament)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                self.id,
                self.genre,
                self.name,
                self.osis_id,
                self.osis_paratext_abbreviation,
                self.testament,
            ],
        )
        .map_err(insert_err(self))?;
        Ok(())
    }
}

// ── Translation ─────────────────────────────────────────────────────────────

impl Record for Translation {
    const RESOURCE: Resource = Resource::Translations;
    const TABLE: &'static str = "translations";

    fn id(&self) -> i64 {
        self.id
    }

    fn insert(&self, conn: &Connection) -> Result<(), OperationError> {
        conn.execute(
            "INSERT INTO translations (id, abbreviation, language, name, url, license, full_description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                self.id,
                self.abbreviation,
                self.language,
                self.name,
                self.url,
                self.license,
                self.full_description,
            ],
        )
        .map_err(insert_err(self))?;

        // A translation carries tens of thousands of verses; reuse one statement.
        let mut stmt = conn.prepare_cached(
            "INSERT INTO verses (owner_translation_id, position, verse_id, book, chapter, verse, text, translation_ref)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for (position, verse) in self.verses.iter().enumerate() {
            stmt.execute(params![
                self.id,
                position as i64,
                verse.id,
                verse.book,
                verse.chapter,
                verse.verse,
                verse.text,
                verse.translation,
            ])
            .map_err(insert_err(self))?;
        }
        Ok(())
    }
}

// ── Plan ────────────────────────────────────────────────────────────────────

impl Record for Plan {
    const RESOURCE: Resource = Resource::Plans;
    const TABLE: &'static str = "plans";

    fn id(&self) -> i64 {
        self.id
    }

    fn insert(&self, conn: &Connection) -> Result<(), OperationError> {
        conn.execute(
            "INSERT INTO plans (id, author, name, short_description, full_description)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                self.id,
                self.author,
                self.name,
                self.short_description,
                self.full_description,
            ],
        )
        .map_err(insert_err(self))?;

        for (position, day) in self.days.iter().enumerate() {
            conn.execute(
                "INSERT INTO plan_days (plan_id, position, day) VALUES (?1, ?2, ?3)",
                params![self.id, position as i64, day.day],
            )
            .map_err(insert_err(self))?;
            let day_row = conn.last_insert_rowid();

            for (position, reading) in day.readings.iter().enumerate() {
                insert_reading(conn, day_row, position as i64, reading).map_err(insert_err(self))?;
            }
        }
        Ok(())
    }
}

fn insert_reading(
    conn: &Connection,
    plan_day_row: i64,
    position: i64,
    reading: &Reading,
) -> Result<(), rusqlite::Error> {
    let (has_book, book_start, book_end) = range_columns(reading.book);
    let (has_chapter, chapter_start, chapter_end) = range_columns(reading.chapter);
    let (has_verse, verse_start, verse_end) = range_columns(reading.verse);

    conn.execute(
        "INSERT INTO readings (plan_day_id, position,
             has_book, book_start, book_end,
             has_chapter, chapter_start, chapter_end,
             has_verse, verse_start, verse_end)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            plan_day_row,
            position,
            has_book,
            book_start,
            book_end,
            has_chapter,
            chapter_start,
            chapter_end,
            has_verse,
            verse_start,
            verse_end,
        ],
    )?;
    Ok(())
}

fn range_columns(range: Option<ReadingRange>) -> (bool, Option<i64>, Option<i64>) {
    match range {
        Some(r) => (true, r.start, r.end),
        None => (false, None, None),
    }
}

// ── Cross references ────────────────────────────────────────────────────────

impl Record for CrossReference {
    const RESOURCE: Resource = Resource::CrossReferences;
    const TABLE: &'static str = "cross_references";

    fn id(&self) -> i64 {
        self.id
    }

    fn insert(&self, conn: &Connection) -> Result<(), OperationError> {
        let mut stmt = conn.prepare_cached(
            "INSERT INTO cross_references (verse_id, reference, start_verse, end_verse)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        stmt.execute(params![
            self.id,
            self.reference,
            self.start_verse,
            self.end_verse,
        ])
        .map_err(insert_err(self))?;
        Ok(())
    }
}

// ── Import log ──────────────────────────────────────────────────────────────

/// Record a committed resource import. Returns the log row id.
pub fn insert_import_log(
    conn: &Connection,
    resource: Resource,
    records: u64,
    imported_at: &str,
) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO import_log (resource, records, imported_at) VALUES (?1, ?2, ?3)",
        params![resource.name(), records as i64, imported_at],
    )?;
    Ok(conn.last_insert_rowid())
}
