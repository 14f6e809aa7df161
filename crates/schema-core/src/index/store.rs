//! In-memory index of tables and columns.

use crate::index::query::QueryKey;
use crate::index::result_set::{filter, ResultSet};
use crate::metadata::{canonical_name, ColumnRecord, MetadataLoader, ParsedDocument};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Which of the two mirrored views a name list or lookup refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Tables,
    Columns,
}

impl ViewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::Tables => "tables",
            ViewKind::Columns => "columns",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Read-only index built once from a document's column records.
///
/// Holds table name → columns (document order), column name → columns across
/// all tables (sorted by table name), and both sorted name lists. Nothing
/// mutates a store after construction; a reload builds a new one.
#[derive(Debug, Clone, Default)]
pub struct MetadataStore {
    table_index: HashMap<String, Vec<ColumnRecord>>,
    column_index: HashMap<String, Vec<ColumnRecord>>,
    table_names: Vec<String>,
    column_names: Vec<String>,
    last_run: Option<i64>,
}

impl MetadataStore {
    /// Build the store from records in document order.
    pub fn new(records: Vec<ColumnRecord>, last_run: Option<i64>) -> Self {
        let mut table_index: HashMap<String, Vec<ColumnRecord>> = HashMap::new();
        let mut column_index: HashMap<String, Vec<ColumnRecord>> = HashMap::new();

        for mut record in records {
            record.table_name = canonical_name(&record.table_name);
            record.column_name = canonical_name(&record.column_name);

            column_index
                .entry(record.column_name.clone())
                .or_default()
                .push(record.clone());
            table_index
                .entry(record.table_name.clone())
                .or_default()
                .push(record);
        }

        for records in column_index.values_mut() {
            records.sort_by(ColumnRecord::cmp_by_table_name);
        }

        let mut table_names: Vec<String> = table_index.keys().cloned().collect();
        table_names.sort();
        let mut column_names: Vec<String> = column_index.keys().cloned().collect();
        column_names.sort();

        Self {
            table_index,
            column_index,
            table_names,
            column_names,
            last_run,
        }
    }

    /// Build the store from a parsed document.
    pub fn from_document(document: ParsedDocument) -> Self {
        Self::new(document.records, document.last_run)
    }

    /// Parse a document and build a store from it.
    pub fn load(source: &[u8]) -> Result<Self> {
        let start = Instant::now();
        let store = Self::from_document(MetadataLoader::load(source)?);
        store.log_loaded(start);
        Ok(store)
    }

    /// Read a document from disk and build a store from it.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let start = Instant::now();
        let store = Self::from_document(MetadataLoader::load_file(path)?);
        store.log_loaded(start);
        Ok(store)
    }

    fn log_loaded(&self, start: Instant) {
        info!(
            "Loaded {} tables and {} distinct columns in {:.2}ms",
            self.table_count(),
            self.column_count(),
            start.elapsed().as_secs_f64() * 1000.0
        );
    }

    /// Columns of a table in declaration order; empty if the table is unknown.
    pub fn columns_of_table(&self, name: &str) -> &[ColumnRecord] {
        self.table_index
            .get(&canonical_name(name))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every table's record for a column name, sorted by table name; empty if unknown.
    pub fn tables_of_column(&self, name: &str) -> &[ColumnRecord] {
        self.column_index
            .get(&canonical_name(name))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn table_names(&self) -> &[String] {
        &self.table_names
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn table_name_at(&self, index: usize) -> Option<&str> {
        self.table_names.get(index).map(String::as_str)
    }

    pub fn column_name_at(&self, index: usize) -> Option<&str> {
        self.column_names.get(index).map(String::as_str)
    }

    pub fn table_count(&self) -> usize {
        self.table_names.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_names.len()
    }

    /// Epoch milliseconds from the document's metadata section.
    pub fn last_run_timestamp(&self) -> Option<i64> {
        self.last_run
    }

    /// Sorted name list backing a view.
    pub fn names(&self, kind: ViewKind) -> &[String] {
        match kind {
            ViewKind::Tables => &self.table_names,
            ViewKind::Columns => &self.column_names,
        }
    }

    pub fn name_at(&self, kind: ViewKind, index: usize) -> Option<&str> {
        self.names(kind).get(index).map(String::as_str)
    }

    pub fn count(&self, kind: ViewKind) -> usize {
        self.names(kind).len()
    }

    /// Detail records for a name in a view.
    pub fn details(&self, kind: ViewKind, name: &str) -> &[ColumnRecord] {
        match kind {
            ViewKind::Tables => self.columns_of_table(name),
            ViewKind::Columns => self.tables_of_column(name),
        }
    }

    /// Positions of the names in a view matching a raw search string.
    pub fn query(&self, kind: ViewKind, raw: &str) -> ResultSet {
        filter(self.names(kind), &QueryKey::build(raw))
    }

    pub fn query_tables(&self, raw: &str) -> ResultSet {
        self.query(ViewKind::Tables, raw)
    }

    pub fn query_columns(&self, raw: &str) -> ResultSet {
        self.query(ViewKind::Columns, raw)
    }
}
