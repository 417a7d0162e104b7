//! Path configuration: CLI flags, then `settings.toml`, then defaults.
//!
//! The settings file lives at `~/.config/lamp-store/settings.toml` (or the
//! platform equivalent) and only has a `[paths]` table:
//!
//! ```toml
//! [paths]
//! source_dir = "/work/lamp/resources"
//! store_path = "/tmp/lamp/default.db"
//! output_dir = "/work/lamp-app/Resources"
//! file_name = "lamp.db"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::CliError;
use crate::cli_types::PathArgs;

pub(crate) const DEFAULT_FILE_NAME: &str = "lamp.db";

/// Canonical path to the settings file.
pub(crate) fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("lamp-store").join("settings.toml")
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    #[serde(default)]
    paths: PathSettings,
}

/// The `[paths]` table. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PathSettings {
    pub source_dir: Option<PathBuf>,
    pub store_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub file_name: Option<String>,
}

/// Read the `[paths]` table from `path`. A missing file yields empty settings.
pub(crate) fn load_settings(path: &Path) -> Result<PathSettings, CliError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(PathSettings::default()),
        Err(e) => {
            return Err(CliError::config(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )));
        }
    };
    let file: SettingsFile = toml::from_str(&contents)
        .map_err(|e| CliError::config(format!("Invalid {}: {}", path.display(), e)))?;
    Ok(file.paths)
}

/// Fully resolved locations for one run.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResolvedPaths {
    pub source_dir: PathBuf,
    pub store_path: PathBuf,
    pub output_dir: PathBuf,
    pub file_name: String,
}

impl ResolvedPaths {
    pub(crate) fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.file_name)
    }
}

pub(crate) fn default_source_dir() -> PathBuf {
    PathBuf::from("resources")
}

pub(crate) fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lamp-store")
        .join("default.db")
}

pub(crate) fn default_output_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Resolve each path using a priority chain:
///
/// 1. CLI override (if `Some`)
/// 2. Value from `settings.toml`
/// 3. Built-in default
pub(crate) fn resolve_paths(args: &PathArgs, settings: &PathSettings) -> ResolvedPaths {
    ResolvedPaths {
        source_dir: args
            .source_dir
            .clone()
            .or_else(|| settings.source_dir.clone())
            .unwrap_or_else(default_source_dir),
        store_path: args
            .store
            .clone()
            .or_else(|| settings.store_path.clone())
            .unwrap_or_else(default_store_path),
        output_dir: args
            .output_dir
            .clone()
            .or_else(|| settings.output_dir.clone())
            .unwrap_or_else(default_output_dir),
        file_name: args
            .file_name
            .clone()
            .or_else(|| settings.file_name.clone())
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
    }
}

/// Load the settings file and resolve paths against `args`.
pub(crate) fn resolve_from_settings(args: &PathArgs) -> Result<ResolvedPaths, CliError> {
    let settings = load_settings(&settings_path())?;
    let resolved = resolve_paths(args, &settings);
    validate_file_name(&resolved.file_name)?;
    Ok(resolved)
}

/// The artifact name must be a bare file name, not a path.
pub(crate) fn validate_file_name(name: &str) -> Result<(), CliError> {
    let is_bare = Path::new(name)
        .file_name()
        .is_some_and(|f| f == std::ffi::OsStr::new(name));
    if name.is_empty() || !is_bare {
        return Err(CliError::config(format!(
            "file_name must be a plain file name, got '{name}'"
        )));
    }
    Ok(())
}
