//! Import one JSON resource into the store.
//!
//! A resource is decoded completely before anything is written. The insert
//! itself runs in a single transaction: either every record of the file is
//! committed, or none is.

use std::fmt;
use std::path::Path;

use lamp_store_db::operations::{self, OperationError, Record};
use lamp_store_model::json::{self, JsonError};
use lamp_store_model::types::*;
use lamp_store_model::Resource;
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::progress::ImportProgress;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Database error: {0}")]
    Db(#[from] OperationError),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Statistics from one committed resource import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub records: u64,
    pub import_log_id: i64,
}

/// Why a resource was not imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No `<name>.json` in the source directory.
    NotFound,
    /// The file exists but could not be read.
    Unreadable(String),
    /// The file was read but did not decode.
    Decode(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotFound => f.write_str("file not found"),
            SkipReason::Unreadable(e) => write!(f, "unreadable: {e}"),
            SkipReason::Decode(e) => write!(f, "decode failed: {e}"),
        }
    }
}

/// Result of attempting one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceOutcome {
    Imported(ImportStats),
    Skipped(SkipReason),
}

impl ResourceOutcome {
    pub fn records(&self) -> u64 {
        match self {
            ResourceOutcome::Imported(stats) => stats.records,
            ResourceOutcome::Skipped(_) => 0,
        }
    }
}

/// Insert all records in one transaction, in slice order.
///
/// On any failure the transaction is dropped without commit, which rolls
/// back every row written for this call, including nested children.
pub fn insert_all<T: Record>(
    conn: &Connection,
    records: &[T],
    progress: Option<&dyn ImportProgress>,
) -> Result<ImportStats, ImportError> {
    let tx = conn.unchecked_transaction()?;

    for (i, record) in records.iter().enumerate() {
        record.insert(&tx)?;

        if let Some(p) = progress {
            p.on_record(T::RESOURCE, i + 1, records.len());
        }
    }

    let imported_at = chrono::Utc::now().to_rfc3339();
    let import_log_id =
        operations::insert_import_log(&tx, T::RESOURCE, records.len() as u64, &imported_at)?;

    tx.commit()?;

    Ok(ImportStats {
        records: records.len() as u64,
        import_log_id,
    })
}

/// Load `T`'s resource from `source_dir` and insert it.
///
/// A missing, unreadable or undecodable file is logged and reported as
/// skipped. Only store failures are returned as errors.
pub fn import_resource<T: Record + DeserializeOwned>(
    conn: &Connection,
    source_dir: &Path,
    progress: Option<&dyn ImportProgress>,
) -> Result<ResourceOutcome, ImportError> {
    let resource = T::RESOURCE;
    let records: Vec<T> = match json::load_resource(source_dir, resource) {
        Ok(Some(records)) => records,
        Ok(None) => {
            log::warn!(
                "{} not found in {}; skipping",
                resource.file_name(),
                source_dir.display()
            );
            return Ok(ResourceOutcome::Skipped(SkipReason::NotFound));
        }
        Err(e) => {
            log::warn!("Skipping {}: {}", resource.label().to_lowercase(), e);
            return Ok(ResourceOutcome::Skipped(skip_reason(e)));
        }
    };

    log::debug!("{} decoded: {} records", resource.label(), records.len());
    if let Some(p) = progress {
        p.on_phase(&format!("Importing {} {}", records.len(), resource.label().to_lowercase()));
    }

    let stats = insert_all(conn, &records, progress)?;

    if let Some(p) = progress {
        p.on_complete(&format!("{} count: {}", resource.label(), stats.records));
    }
    Ok(ResourceOutcome::Imported(stats))
}

/// Import a resource by kind, dispatching to its record type.
pub fn import_kind(
    conn: &Connection,
    resource: Resource,
    source_dir: &Path,
    progress: Option<&dyn ImportProgress>,
) -> Result<ResourceOutcome, ImportError> {
    match resource {
        Resource::Books => import_resource::<Book>(conn, source_dir, progress),
        Resource::Genres => import_resource::<Genre>(conn, source_dir, progress),
        Resource::Plans => import_resource::<Plan>(conn, source_dir, progress),
        Resource::Translations => import_resource::<Translation>(conn, source_dir, progress),
        Resource::CrossReferences => import_resource::<CrossReference>(conn, source_dir, progress),
    }
}

fn skip_reason(err: JsonError) -> SkipReason {
    if err.is_decode() {
        SkipReason::Decode(err.to_string())
    } else {
        SkipReason::Unreadable(err.to_string())
    }
}
