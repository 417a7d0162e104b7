//! JSON loading for the bundled source resources.
//!
//! Each resource is a single `<name>.json` file holding a top-level array of
//! records. A missing file is not an error: the caller skips that resource.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("{path} is not valid UTF-8: {source}")]
    Utf8 {
        path: String,
        source: std::string::FromUtf8Error,
    },
    #[error("JSON decode error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

impl JsonError {
    /// True when the file was readable but its contents did not match the
    /// expected shape.
    pub fn is_decode(&self) -> bool {
        matches!(self, JsonError::Utf8 { .. } | JsonError::Parse { .. })
    }
}

/// The five resource kinds the loader knows about, in import order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Books,
    Genres,
    Plans,
    Translations,
    CrossReferences,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Books,
        Resource::Genres,
        Resource::Plans,
        Resource::Translations,
        Resource::CrossReferences,
    ];

    /// Base name without extension; also the name recorded in the import log.
    pub fn name(self) -> &'static str {
        match self {
            Resource::Books => "books",
            Resource::Genres => "genres",
            Resource::Plans => "plans",
            Resource::Translations => "translations",
            Resource::CrossReferences => "cross_references",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.json", self.name())
    }

    pub fn label(self) -> &'static str {
        match self {
            Resource::Books => "Books",
            Resource::Genres => "Genres",
            Resource::Plans => "Plans",
            Resource::Translations => "Translations",
            Resource::CrossReferences => "Cross references",
        }
    }

    pub fn path_in(self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read a resource file as UTF-8 text.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn read_resource(dir: &Path, resource: Resource) -> Result<Option<String>, JsonError> {
    let path = resource.path_in(dir);
    let bytes = match std::fs::read(&path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(JsonError::Io {
                path: path.display().to_string(),
                source: e,
            });
        }
    };
    let text = String::from_utf8(bytes).map_err(|e| JsonError::Utf8 {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(Some(text))
}

/// Decode a top-level JSON array into records, preserving array order.
///
/// `origin` is only used for error messages.
pub fn decode_records<T: DeserializeOwned>(text: &str, origin: &Path) -> Result<Vec<T>, JsonError> {
    serde_json::from_str(text).map_err(|e| JsonError::Parse {
        path: origin.display().to_string(),
        source: e,
    })
}

/// Read and decode one resource from `dir`.
pub fn load_resource<T: DeserializeOwned>(
    dir: &Path,
    resource: Resource,
) -> Result<Option<Vec<T>>, JsonError> {
    let Some(text) = read_resource(dir, resource)? else {
        return Ok(None);
    };
    decode_records(&text, &resource.path_in(dir)).map(Some)
}
