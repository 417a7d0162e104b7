//! Load the JSON resources into a fresh store and export it for bundling.
//!
//! This crate owns the ETL sequence: resetting the working store, importing
//! each resource in its own transaction, and copying the finished file out.

pub mod build;
pub mod export;
pub mod progress;
pub mod reset;
pub mod resource_import;

pub use build::{BuildError, BuildOptions, BuildReport, build_bundle};
pub use export::{ExportError, ExportStats, export_store};
pub use progress::{ImportProgress, LogProgress, SilentProgress};
pub use reset::{ResetError, ResetStats, reset_store, store_files};
pub use resource_import::{
    ImportError, ImportStats, ResourceOutcome, SkipReason, import_kind, import_resource,
    insert_all,
};
