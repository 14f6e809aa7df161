//! Column metadata and its ingestion.
//!
//! This module provides:
//! - The `ColumnRecord` value type
//! - The document loader producing records plus the optional last-run timestamp
//! - Last-run timestamp parsing and formatting

mod last_run;
mod loader;
mod record;

pub use last_run::{format_last_run, format_last_run_local, parse_last_run};
pub use loader::{LoadWarning, MetadataLoader, ParsedDocument};
pub use record::{canonical_name, ColumnRecord};
