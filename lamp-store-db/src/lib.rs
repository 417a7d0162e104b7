//! SQLite persistence layer for the bundled reading store.
//!
//! Provides schema creation, inserts for each record type, and read-back
//! queries backed by SQLite (via rusqlite with bundled feature).

pub mod operations;
pub mod queries;
pub mod schema;

pub use operations::{OperationError, Record, insert_import_log};
pub use queries::{
    ImportLogEntry, StoreStats, count_rows, cross_references_for, find_book, list_genres,
    list_import_logs, load_plan, load_translation, store_stats,
};
pub use schema::{SchemaError, open_database, open_memory, open_readonly};
