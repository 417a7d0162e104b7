//! Delete a working store and its SQLite side-files.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
#[error("Failed to delete {path}: {source}")]
pub struct ResetError {
    pub path: String,
    pub source: std::io::Error,
}

/// What a reset removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetStats {
    pub files_removed: usize,
    pub bytes_freed: u64,
}

/// Side-file suffixes SQLite may leave next to a database.
const SIDE_FILE_SUFFIXES: [&str; 3] = ["-wal", "-shm", "-journal"];

/// The database file followed by every side-file SQLite may create for it.
pub fn store_files(path: &Path) -> Vec<PathBuf> {
    let mut files = vec![path.to_path_buf()];
    for suffix in SIDE_FILE_SUFFIXES {
        let mut name = OsString::from(path.as_os_str());
        name.push(suffix);
        files.push(PathBuf::from(name));
    }
    files
}

/// Remove the store at `path` along with its side-files.
///
/// Files that do not exist are ignored. Any other I/O error aborts the reset.
pub fn reset_store(path: &Path) -> Result<ResetStats, ResetError> {
    let mut stats = ResetStats::default();

    for file in store_files(path) {
        let size = std::fs::metadata(&file).map(|m| m.len()).unwrap_or(0);
        match std::fs::remove_file(&file) {
            Ok(()) => {
                log::debug!("Removed {}", file.display());
                stats.files_removed += 1;
                stats.bytes_freed += size;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ResetError {
                    path: file.display().to_string(),
                    source: e,
                });
            }
        }
    }

    Ok(stats)
}
