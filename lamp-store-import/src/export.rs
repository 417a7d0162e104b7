//! Finalize the working store and copy it out as a bundle artifact.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Could not leave WAL mode (journal_mode is '{0}')")]
    JournalMode(String),
    #[error("Export destination is the working store itself: {0}")]
    SamePath(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportStats {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Consume the connection, fold the write-ahead log into the main file, and
/// copy that single file to `dest`.
///
/// Side-files are never copied. Any existing file at `dest` is replaced,
/// unless it resolves to the working store itself.
pub fn export_store(
    conn: Connection,
    store_path: &Path,
    dest: &Path,
) -> Result<ExportStats, ExportError> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if dest == store_path || same_file(store_path, dest)? {
        return Err(ExportError::SamePath(dest.display().to_string()));
    }

    // Leaving WAL checkpoints every frame into the main file and makes the
    // copy openable from a read-only bundle.
    let mode: String = conn.query_row("PRAGMA journal_mode=DELETE", [], |row| row.get(0))?;
    if !mode.eq_ignore_ascii_case("delete") {
        return Err(ExportError::JournalMode(mode));
    }
    conn.close().map_err(|(_, e)| e)?;

    if dest.exists() {
        std::fs::remove_file(dest).map_err(|e| io_err(dest, e))?;
    }

    let bytes = std::fs::copy(store_path, dest).map_err(|e| io_err(store_path, e))?;
    log::debug!("Copied {} bytes to {}", bytes, dest.display());

    Ok(ExportStats {
        path: dest.to_path_buf(),
        bytes,
    })
}

/// Compare resolved locations, so `sub/../store.db` or a symlink still
/// matches the store. The parent of `dest` must already exist.
fn same_file(store_path: &Path, dest: &Path) -> Result<bool, ExportError> {
    let store = std::fs::canonicalize(store_path).map_err(|e| io_err(store_path, e))?;
    let resolved = match std::fs::canonicalize(dest) {
        Ok(p) => p,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let Some(name) = dest.file_name() else {
                return Ok(false);
            };
            let parent = match dest.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            std::fs::canonicalize(parent)
                .map_err(|e| io_err(parent, e))?
                .join(name)
        }
        Err(e) => return Err(io_err(dest, e)),
    };
    Ok(store == resolved)
}

fn io_err(path: &Path, source: std::io::Error) -> ExportError {
    ExportError::Io {
        path: path.display().to_string(),
        source,
    }
}
