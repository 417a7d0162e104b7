//! Read-back queries for inspecting and verifying a store.
//!
//! Nested lists are rebuilt ordered by their stored `position`, so a record
//! read back here compares equal to the record that was decoded from JSON.

use lamp_store_model::types::*;
use rusqlite::{Connection, OptionalExtension, params};

use crate::operations::OperationError;
use crate::schema::CONTENT_TABLES;

const RUNTIME_TABLES: [&str; 4] = ["users", "user_plans", "completed_readings", "import_log"];

// ── Statistics ──────────────────────────────────────────────────────────────

/// Row counts for every content table.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub genres: i64,
    pub books: i64,
    pub translations: i64,
    pub verses: i64,
    pub plans: i64,
    pub plan_days: i64,
    pub readings: i64,
    pub cross_references: i64,
}

impl StoreStats {
    /// `(table, count)` pairs in display order.
    pub fn rows(&self) -> [(&'static str, i64); 8] {
        [
            ("genres", self.genres),
            ("books", self.books),
            ("translations", self.translations),
            ("verses", self.verses),
            ("plans", self.plans),
            ("plan_days", self.plan_days),
            ("readings", self.readings),
            ("cross_references", self.cross_references),
        ]
    }
}

/// Count rows in a known table. Unknown names are rejected rather than
/// interpolated into SQL.
pub fn count_rows(conn: &Connection, table: &str) -> Result<i64, OperationError> {
    if !CONTENT_TABLES.contains(&table) && !RUNTIME_TABLES.contains(&table) {
        return Err(OperationError::UnknownTable(table.to_string()));
    }
    let count = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
    Ok(count)
}

pub fn store_stats(conn: &Connection) -> Result<StoreStats, OperationError> {
    Ok(StoreStats {
        genres: count_rows(conn, "genres")?,
        books: count_rows(conn, "books")?,
        translations: count_rows(conn, "translations")?,
        verses: count_rows(conn, "verses")?,
        plans: count_rows(conn, "plans")?,
        plan_days: count_rows(conn, "plan_days")?,
        readings: count_rows(conn, "readings")?,
        cross_references: count_rows(conn, "cross_references")?,
    })
}

// ── Books / Genres ──────────────────────────────────────────────────────────

pub fn find_book(conn: &Connection, id: i64) -> Result<Option<Book>, OperationError> {
    conn.query_row(
        "SELECT id, genre_id, name, osis_id, osis_paratext_abbreviation, testament
         FROM books WHERE id = ?1",
        params![id],
        |row| {
            Ok(Book {
                id: row.get(0)?,
                genre: row.get(1)?,
                name: row.get(2)?,
                osis_id: row.get(3)?,
                osis_paratext_abbreviation: row.get(4)?,
                testament: row.get(5)?,
            })
        },
    )
    .optional()
    .map_err(Into::into)
}

pub fn list_genres(conn: &Connection) -> Result<Vec<Genre>, OperationError> {
    let mut stmt = conn.prepare("SELECT id, name FROM genres ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok(Genre {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Translations ────────────────────────────────────────────────────────────

/// Load a translation with all of its verses in source order.
pub fn load_translation(conn: &Connection, id: i64) -> Result<Option<Translation>, OperationError> {
    let header = conn
        .query_row(
            "SELECT id, abbreviation, language, name, url, license, full_description
             FROM translations WHERE id = ?1",
            params![id],
            |row| {
                Ok(Translation {
                    id: row.get(0)?,
                    abbreviation: row.get(1)?,
                    language: row.get(2)?,
                    name: row.get(3)?,
                    url: row.get(4)?,
                    license: row.get(5)?,
                    full_description: row.get(6)?,
                    verses: Vec::new(),
                })
            },
        )
        .optional()?;

    let Some(mut translation) = header else {
        return Ok(None);
    };

    let mut stmt = conn.prepare(
        "SELECT verse_id, book, chapter, verse, text, translation_ref
         FROM verses WHERE owner_translation_id = ?1 ORDER BY position",
    )?;
    let rows = stmt.query_map(params![id], |row| {
        Ok(Verse {
            id: row.get(0)?,
            book: row.get(1)?,
            chapter: row.get(2)?,
            verse: row.get(3)?,
            text: row.get(4)?,
            translation: row.get(5)?,
        })
    })?;
    translation.verses = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(Some(translation))
}

// ── Plans ───────────────────────────────────────────────────────────────────

/// Load a plan with its days and readings in source order.
pub fn load_plan(conn: &Connection, id: i64) -> Result<Option<Plan>, OperationError> {
    let header = conn
        .query_row(
            "SELECT id, author, name, short_description, full_description
             FROM plans WHERE id = ?1",
            params![id],
            |row| {
                Ok(Plan {
                    id: row.get(0)?,
                    author: row.get(1)?,
                    name: row.get(2)?,
                    short_description: row.get(3)?,
                    full_description: row.get(4)?,
                    days: Vec::new(),
                })
            },
        )
        .optional()?;

    let Some(mut plan) = header else {
        return Ok(None);
    };

    let mut day_stmt =
        conn.prepare("SELECT row_id, day FROM plan_days WHERE plan_id = ?1 ORDER BY position")?;
    let day_rows = day_stmt
        .query_map(params![id], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut reading_stmt = conn.prepare(
        "SELECT has_book, book_start, book_end,
                has_chapter, chapter_start, chapter_end,
                has_verse, verse_start, verse_end
         FROM readings WHERE plan_day_id = ?1 ORDER BY position",
    )?;

    for (row_id, day) in day_rows {
        let readings = reading_stmt
            .query_map(params![row_id], row_to_reading)?
            .collect::<Result<Vec<_>, _>>()?;
        plan.days.push(PlanDay { day, readings });
    }

    Ok(Some(plan))
}

// ── Cross references ────────────────────────────────────────────────────────

/// All cross references recorded for a verse, in insertion order.
pub fn cross_references_for(
    conn: &Connection,
    verse_id: i64,
) -> Result<Vec<CrossReference>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT verse_id, reference, start_verse, end_verse
         FROM cross_references WHERE verse_id = ?1 ORDER BY row_id",
    )?;
    let rows = stmt.query_map(params![verse_id], |row| {
        Ok(CrossReference {
            id: row.get(0)?,
            reference: row.get(1)?,
            start_verse: row.get(2)?,
            end_verse: row.get(3)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Import Log Queries ──────────────────────────────────────────────────────

/// One committed resource import.
#[derive(Debug, Clone)]
pub struct ImportLogEntry {
    pub id: i64,
    pub resource: String,
    pub records: i64,
    pub imported_at: String,
}

pub fn list_import_logs(conn: &Connection) -> Result<Vec<ImportLogEntry>, OperationError> {
    let mut stmt =
        conn.prepare("SELECT id, resource, records, imported_at FROM import_log ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok(ImportLogEntry {
            id: row.get(0)?,
            resource: row.get(1)?,
            records: row.get(2)?,
            imported_at: row.get(3)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Row Mapping Helpers ─────────────────────────────────────────────────────

fn row_to_reading(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reading> {
    Ok(Reading {
        book: range_from(row.get(0)?, row.get(1)?, row.get(2)?),
        chapter: range_from(row.get(3)?, row.get(4)?, row.get(5)?),
        verse: range_from(row.get(6)?, row.get(7)?, row.get(8)?),
    })
}

fn range_from(present: bool, start: Option<i64>, end: Option<i64>) -> Option<ReadingRange> {
    present.then_some(ReadingRange { start, end })
}
