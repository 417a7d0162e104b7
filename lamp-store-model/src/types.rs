//! Data model types for the bundled reading store.
//!
//! These mirror the JSON resources field-for-field. Decoding is strict: unknown
//! keys and missing required keys are rejected.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

// ── Genre ───────────────────────────────────────────────────────────────────

/// A grouping of books (Law, History, Gospels, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

// ── Book ────────────────────────────────────────────────────────────────────

/// A single book of the canon.
///
/// `genre` is a bare id. It is not checked against the genres resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub genre: i64,
    pub name: String,
    pub osis_id: String,
    pub osis_paratext_abbreviation: String,
    pub testament: String,
}

// ── Translation ─────────────────────────────────────────────────────────────

/// A translation and its full verse text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Translation {
    pub id: i64,
    pub abbreviation: String,
    pub language: String,
    pub name: String,
    pub url: String,
    pub license: String,
    pub full_description: String,
    pub verses: Vec<Verse>,
}

/// One verse of a translation. The JSON uses single-letter keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Verse {
    pub id: i64,
    #[serde(rename = "b")]
    pub book: i64,
    #[serde(rename = "c")]
    pub chapter: i64,
    #[serde(rename = "v")]
    pub verse: i64,
    #[serde(rename = "t")]
    pub text: String,
    #[serde(rename = "tr")]
    pub translation: i64,
}

// ── Plan ────────────────────────────────────────────────────────────────────

/// A reading plan made of numbered days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Plan {
    pub id: i64,
    pub author: String,
    pub name: String,
    pub short_description: String,
    pub full_description: String,
    #[serde(rename = "plan")]
    pub days: Vec<PlanDay>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanDay {
    pub day: i64,
    pub readings: Vec<Reading>,
}

/// A passage to read. Each of the three ranges is independently optional:
/// a reading may name a whole book, a chapter span, or a verse span.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Reading {
    #[serde(default)]
    pub book: Option<ReadingRange>,
    #[serde(default)]
    pub chapter: Option<ReadingRange>,
    #[serde(default)]
    pub verse: Option<ReadingRange>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadingRange {
    #[serde(default)]
    pub start: Option<i64>,
    #[serde(default)]
    pub end: Option<i64>,
}

impl ReadingRange {
    pub fn new(start: Option<i64>, end: Option<i64>) -> Self {
        Self { start, end }
    }
}

// ── Cross references ────────────────────────────────────────────────────────

/// A link from verse `id` to the verse span `start_verse..=end_verse`.
///
/// `id` repeats across entries: one verse usually has many references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrossReference {
    pub id: i64,
    #[serde(rename = "r")]
    pub reference: i64,
    #[serde(rename = "sv")]
    pub start_verse: i64,
    #[serde(rename = "ev", default)]
    pub end_verse: Option<i64>,
}

// ── Runtime state ───────────────────────────────────────────────────────────

/// Per-user settings owned by the consuming application.
///
/// The loader creates the table but never writes a row.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub plans: Vec<i64>,
    pub plan_in_app_bible: bool,
    pub plan_external_bible: Option<String>,
    pub plan_wpm: f64,
    pub plan_notification: bool,
    pub plan_notification_time: NaiveTime,
    pub reader_translation: Option<i64>,
    pub reader_cross_reference_sort: String,
    pub reader_font_size: f32,
    pub completed_readings: Vec<CompletedReading>,
}

impl User {
    pub const DEFAULT_TRANSLATION_ID: i64 = 3;
}

impl Default for User {
    fn default() -> Self {
        Self {
            plans: Vec::new(),
            plan_in_app_bible: true,
            plan_external_bible: None,
            plan_wpm: 183.0,
            plan_notification: false,
            plan_notification_time: NaiveTime::from_hms_opt(18, 30, 0).unwrap_or_default(),
            reader_translation: None,
            reader_cross_reference_sort: "r".to_string(),
            reader_font_size: 16.0,
            completed_readings: Vec::new(),
        }
    }
}

/// Marker for a finished plan reading, keyed by an app-defined string id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompletedReading {
    pub id: String,
}

impl CompletedReading {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
