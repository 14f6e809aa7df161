//! Plain-text export of names and their detail records.
//!
//! Detail tables are built from a closed list of (title, accessor) pairs per
//! view, so every exported cell comes from a typed field of [`ColumnRecord`].

use crate::config::ExportConfig;
use crate::index::{MetadataStore, ViewKind};
use crate::metadata::ColumnRecord;

/// One column of a detail table.
#[derive(Clone, Copy)]
pub struct DetailColumn {
    pub title: &'static str,
    pub value: fn(&ColumnRecord) -> String,
}

impl DetailColumn {
    pub const fn new(title: &'static str, value: fn(&ColumnRecord) -> String) -> Self {
        Self { title, value }
    }
}

impl std::fmt::Debug for DetailColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailColumn")
            .field("title", &self.title)
            .finish()
    }
}

fn order(record: &ColumnRecord) -> String {
    record.order.to_string()
}

fn column_type(record: &ColumnRecord) -> String {
    record.column_type.clone()
}

fn yes_no(flag: bool) -> String {
    String::from(if flag { "Yes" } else { "No" })
}

/// The column naming the other side of a detail record.
fn counterpart_column(kind: ViewKind) -> DetailColumn {
    match kind {
        ViewKind::Tables => DetailColumn::new("Column", |r| r.column_name.clone()),
        ViewKind::Columns => DetailColumn::new("Table", |r| r.table_name.clone()),
    }
}

/// Columns used when exporting detail records as text.
pub fn export_columns(kind: ViewKind) -> [DetailColumn; 5] {
    [
        DetailColumn::new("#", order),
        counterpart_column(kind),
        DetailColumn::new("Column Type", column_type),
        DetailColumn::new("Can Be Null?", |r| yes_no(r.is_nullable)),
        DetailColumn::new("Primary Key?", |r| yes_no(r.is_primary_key)),
    ]
}

/// Columns shown in an on-screen detail grid.
pub fn grid_columns(kind: ViewKind) -> [DetailColumn; 5] {
    [
        DetailColumn::new("#", order),
        counterpart_column(kind),
        DetailColumn::new("Column Type", column_type),
        DetailColumn::new("Null", |r| {
            String::from(if r.is_nullable { "" } else { "NOT NULL" })
        }),
        DetailColumn::new("Primary Key", |r| {
            String::from(if r.is_primary_key { "YES" } else { "" })
        }),
    ]
}

/// Rows of text cells laid out in padded columns.
#[derive(Debug, Clone, Default)]
pub struct TextTable {
    rows: Vec<Vec<String>>,
    widths: Vec<usize>,
}

impl TextTable {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        let mut widths: Vec<usize> = Vec::new();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(width) => *width = (*width).max(len),
                    None => widths.push(len),
                }
            }
        }
        Self { rows, widths }
    }

    /// Header row of titles followed by one row per record.
    pub fn from_records(columns: &[DetailColumn], records: &[ColumnRecord]) -> Self {
        let header: Vec<String> = columns.iter().map(|c| c.title.to_string()).collect();
        let rows: Vec<Vec<String>> = std::iter::once(header)
            .chain(
                records
                    .iter()
                    .map(|record| columns.iter().map(|c| (c.value)(record)).collect()),
            )
            .collect();
        Self::new(rows)
    }

    /// Each row as one line; every column but the last is padded to its
    /// widest cell plus `min_space`.
    pub fn lines(&self, min_space: usize) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| {
                let mut line = String::new();
                for (i, cell) in row.iter().enumerate() {
                    line.push_str(cell);
                    if i + 1 < row.len() {
                        let target = self.widths[i] + min_space;
                        let pad = target.saturating_sub(cell.chars().count());
                        line.extend(std::iter::repeat(' ').take(pad));
                    }
                }
                line
            })
            .collect()
    }

    /// All lines, each terminated by the export line ending.
    pub fn render(&self) -> String {
        self.lines(ExportConfig::MIN_COLUMN_SPACING)
            .iter()
            .map(|line| format!("{}{}", line, ExportConfig::LINE_ENDING))
            .collect()
    }
}

/// Names separated by the export line ending.
pub fn format_names<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(ExportConfig::LINE_ENDING)
}

/// Detail table for one name, as exported text.
pub fn format_details(store: &MetadataStore, kind: ViewKind, name: &str) -> String {
    TextTable::from_records(&export_columns(kind), store.details(kind, name)).render()
}

/// Each name followed by its detail table.
pub fn format_with_details<S: AsRef<str>>(
    store: &MetadataStore,
    kind: ViewKind,
    names: &[S],
) -> String {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            format!(
                "{}{}{}",
                name,
                ExportConfig::LINE_ENDING,
                format_details(store, kind, name)
            )
        })
        .collect::<Vec<_>>()
        .join(ExportConfig::LINE_ENDING)
}
