//! One-shot commands: list, show, and info.

use anyhow::{bail, Result};
use schema_library::export::{self, TextTable};
use schema_library::{ColumnRecord, MetadataStore, SchemaBrowser, ViewKind};
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;

/// One listed name, with its detail records when requested.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListEntry<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a [ColumnRecord]>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StoreInfo {
    tables: usize,
    columns: usize,
    last_run: Option<i64>,
    status: String,
}

/// Print the names matching every term, optionally with their detail tables.
pub fn list<W: Write>(
    store: &Arc<MetadataStore>,
    kind: ViewKind,
    terms: &[String],
    details: bool,
    json: bool,
    out: &mut W,
) -> Result<()> {
    let raw = terms.join(" ");
    let builder = SchemaBrowser::builder();
    let builder = match kind {
        ViewKind::Tables => builder.table_query(raw),
        ViewKind::Columns => builder.column_query(raw),
    };
    let browser = builder.build(Arc::clone(store));

    if json {
        let entries: Vec<ListEntry<'_>> = browser
            .visible_names(kind)
            .into_iter()
            .map(|name| ListEntry {
                name,
                details: details.then(|| store.details(kind, name)),
            })
            .collect();
        serde_json::to_writer_pretty(&mut *out, &entries)?;
        writeln!(out)?;
    } else if details {
        write!(out, "{}", browser.export_visible(kind, true))?;
    } else {
        for name in browser.visible_names(kind) {
            writeln!(out, "{}", name)?;
        }
    }
    Ok(())
}

/// Print the detail grid for one name.
pub fn show<W: Write>(
    store: &MetadataStore,
    kind: ViewKind,
    name: &str,
    json: bool,
    out: &mut W,
) -> Result<()> {
    let records = store.details(kind, name);
    if records.is_empty() {
        let noun = match kind {
            ViewKind::Tables => "table",
            ViewKind::Columns => "column",
        };
        bail!("No {} named '{}'", noun, name);
    }

    if json {
        serde_json::to_writer_pretty(&mut *out, records)?;
        writeln!(out)?;
    } else {
        let table = TextTable::from_records(&export::grid_columns(kind), records);
        for line in table.lines(schema_library::config::ExportConfig::MIN_COLUMN_SPACING) {
            writeln!(out, "{}", line.trim_end())?;
        }
    }
    Ok(())
}

/// Print table and column counts and the status line.
pub fn info<W: Write>(store: &Arc<MetadataStore>, json: bool, out: &mut W) -> Result<()> {
    let status = SchemaBrowser::new(Arc::clone(store)).status_line();
    if json {
        let info = StoreInfo {
            tables: store.table_count(),
            columns: store.column_count(),
            last_run: store.last_run_timestamp(),
            status,
        };
        serde_json::to_writer_pretty(&mut *out, &info)?;
        writeln!(out)?;
    } else {
        writeln!(out, "Tables:  {}", store.table_count())?;
        writeln!(out, "Columns: {}", store.column_count())?;
        writeln!(out, "{}", status)?;
    }
    Ok(())
}
