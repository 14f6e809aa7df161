//! Column metadata records.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Metadata for one column of one table, as declared in the source document.
///
/// Table and column names are canonical uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRecord {
    /// Declaration position within the table.
    pub order: i32,
    pub table_name: String,
    pub column_name: String,
    /// Column type exactly as declared.
    pub column_type: String,
    pub is_nullable: bool,
    pub is_primary_key: bool,
}

impl ColumnRecord {
    /// Display ordering for a column's records across tables.
    pub fn cmp_by_table_name(a: &ColumnRecord, b: &ColumnRecord) -> Ordering {
        a.table_name.cmp(&b.table_name)
    }
}

impl fmt::Display for ColumnRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}/{}",
            self.order,
            self.table_name,
            self.column_name,
            self.column_type,
            self.is_nullable,
            self.is_primary_key
        )
    }
}

/// Canonical form of a table or column name.
pub fn canonical_name(name: &str) -> String {
    name.trim().to_uppercase()
}
