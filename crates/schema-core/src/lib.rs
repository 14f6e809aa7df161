//! Schema Core - Headless library for browsing database table and column metadata.
//!
//! A schema description document (tables, their columns, and an optional
//! generation timestamp) is loaded once into an immutable [`MetadataStore`].
//! Two mirrored views, tables and columns, are then filtered by incremental
//! substring search, keeping the selected row stable as the search changes.
//!
//! # Example
//!
//! ```rust,ignore
//! use schema_library::{SchemaBrowser, ViewKind};
//!
//! fn main() -> schema_library::Result<()> {
//!     let mut browser = SchemaBrowser::open("tables.xml")?;
//!
//!     browser.set_query(ViewKind::Tables, "order item");
//!     for name in browser.visible_names(ViewKind::Tables) {
//!         println!("{}", name);
//!     }
//!
//!     for column in browser.selected_details(ViewKind::Tables) {
//!         println!("  {} {}", column.column_name, column.column_type);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod browser;
pub mod config;
pub mod error;
pub mod export;
pub mod index;
pub mod metadata;

pub use browser::{ListView, SchemaBrowser, SchemaBrowserBuilder, ViewSnapshot};
pub use error::{Result, SchemaError};
pub use index::{
    filter, filter_interruptible, matching_positions, track_selection, MetadataStore, QueryKey,
    ResultSet, SearchInterrupt, SearchPass, ViewKind,
};
pub use metadata::{ColumnRecord, LoadWarning, MetadataLoader, ParsedDocument};

/// Parse a document and build its store.
pub fn load_store(source: &[u8]) -> Result<MetadataStore> {
    MetadataStore::load(source)
}
