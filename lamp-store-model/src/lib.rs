//! Record types and JSON ingestion for the bundled reading store.
//!
//! This crate has no database dependency. `lamp-store-db` maps these types to
//! tables; `lamp-store-import` drives the load.

pub mod json;
pub mod types;

pub use json::{JsonError, Resource, decode_records, load_resource, read_resource};
pub use types::*;
