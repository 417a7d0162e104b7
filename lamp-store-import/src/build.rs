//! The full bundle build: reset, import every resource, export.

use std::path::PathBuf;

use lamp_store_db::schema::{self, SchemaError};
use lamp_store_model::Resource;
use thiserror::Error;

use crate::export::{ExportError, ExportStats, export_store};
use crate::progress::ImportProgress;
use crate::reset::{ResetError, ResetStats, reset_store};
use crate::resource_import::{ImportError, ResourceOutcome, import_kind};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Reset failed: {0}")]
    Reset(#[from] ResetError),
    #[error("Failed to create directory {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to open store: {0}")]
    Open(#[from] SchemaError),
    #[error("Import of {resource} failed: {source}")]
    Import {
        resource: Resource,
        source: ImportError,
    },
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

/// Where a build reads from and writes to.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory holding the `<resource>.json` files.
    pub source_dir: PathBuf,
    /// Working store; deleted and recreated on every build.
    pub store_path: PathBuf,
    /// Final artifact location.
    pub output_path: PathBuf,
}

/// Everything a finished build did.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub reset: ResetStats,
    pub outcomes: Vec<(Resource, ResourceOutcome)>,
    pub export: ExportStats,
}

impl BuildReport {
    pub fn outcome(&self, resource: Resource) -> Option<&ResourceOutcome> {
        self.outcomes
            .iter()
            .find(|(r, _)| *r == resource)
            .map(|(_, o)| o)
    }

    pub fn imported_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, ResourceOutcome::Imported(_)))
            .count()
    }
}

/// Run the whole sequence.
///
/// Skipped resources do not stop the build. A store failure in any resource
/// does, and nothing is exported in that case.
pub fn build_bundle(
    opts: &BuildOptions,
    progress: Option<&dyn ImportProgress>,
) -> Result<BuildReport, BuildError> {
    let reset = reset_store(&opts.store_path)?;
    if reset.files_removed > 0 {
        log::debug!(
            "Removed {} previous store file(s) at {}",
            reset.files_removed,
            opts.store_path.display()
        );
    }

    if let Some(parent) = opts.store_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| BuildError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }
    let conn = schema::open_database(&opts.store_path)?;

    let mut outcomes = Vec::with_capacity(Resource::ALL.len());
    for resource in Resource::ALL {
        let outcome = import_kind(&conn, resource, &opts.source_dir, progress)
            .map_err(|source| BuildError::Import { resource, source })?;
        outcomes.push((resource, outcome));
    }

    let export = export_store(conn, &opts.store_path, &opts.output_path)?;

    Ok(BuildReport {
        reset,
        outcomes,
        export,
    })
}
