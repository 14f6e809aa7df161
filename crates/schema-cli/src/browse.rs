//! Line-oriented browsing session.
//!
//! Each input line is either a search string for the active view or a
//! `:`-prefixed command. After every line the active view is redrawn with the
//! selected row marked.

use anyhow::Result;
use schema_library::{
    ColumnRecord, MetadataStore, SchemaBrowser, SchemaError, SearchInterrupt, ViewKind,
};
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Query(String),
    Switch(ViewKind),
    Select(Option<usize>),
    Reload,
    Export { details: bool },
    Help,
    Quit,
    Unknown(String),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let Some(command) = line.trim().strip_prefix(':') else {
            return Input::Query(line.to_string());
        };
        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("tables"), None) => Input::Switch(ViewKind::Tables),
            (Some("columns"), None) => Input::Switch(ViewKind::Columns),
            (Some("select"), None) => Input::Select(None),
            (Some("select"), Some(row)) => match row.parse() {
                Ok(row) => Input::Select(Some(row)),
                Err(_) => Input::Unknown(line.to_string()),
            },
            (Some("reload"), None) => Input::Reload,
            (Some("export"), None) => Input::Export { details: false },
            (Some("export"), Some("details")) => Input::Export { details: true },
            (Some("help"), None) => Input::Help,
            (Some("quit" | "q"), None) => Input::Quit,
            _ => Input::Unknown(line.to_string()),
        }
    }
}

const HELP: &str = "\
Type to search the active view. Commands:
  :tables | :columns   switch view
  :select [N]          select row N (no N clears)
  :reload              reload the schema file
  :export [details]    print the visible rows as export text
  :quit                leave";

/// Run a session until `:quit` or end of input.
pub fn run<R: BufRead, W: Write>(
    store: Arc<MetadataStore>,
    path: &Path,
    interrupt: &SearchInterrupt,
    input: R,
    out: &mut W,
) -> Result<()> {
    let mut browser = SchemaBrowser::new(store);
    let mut active = ViewKind::Tables;

    writeln!(out, "{}", browser.status_line())?;
    render(&browser, active, out)?;

    for line in input.lines() {
        let line = line?;
        let parsed = Input::parse(&line);
        debug!("Session input {:?}", parsed);

        match parsed {
            Input::Query(raw) => {
                let _pass = interrupt.begin();
                match browser.set_query_interruptible(active, &raw, interrupt) {
                    Ok(_) => {}
                    Err(SchemaError::Interrupted) => {
                        writeln!(out, "Search interrupted")?;
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Input::Switch(kind) => active = kind,
            Input::Select(row) => browser.select(active, row),
            Input::Reload => match browser.reload_from_path(path) {
                Ok(()) => writeln!(out, "{}", browser.status_line())?,
                Err(e) => {
                    warn!("Reload failed: {}", e);
                    writeln!(out, "Reload failed: {}", e)?;
                }
            },
            Input::Export { details } => {
                writeln!(out, "{}", browser.export_visible(active, details))?;
                continue;
            }
            Input::Help => {
                writeln!(out, "{}", HELP)?;
                continue;
            }
            Input::Quit => break,
            Input::Unknown(text) => {
                writeln!(out, "Unknown command: {} (try :help)", text.trim())?;
                continue;
            }
        }
        render(&browser, active, out)?;
    }

    out.flush()?;
    Ok(())
}

/// Draw the active view: search string, rows, and the selected row's details.
fn render<W: Write>(browser: &SchemaBrowser, kind: ViewKind, out: &mut W) -> Result<()> {
    let view = browser.view(kind);
    writeln!(
        out,
        "[{}] search: {:?} ({} rows)",
        kind,
        view.query(),
        view.row_count()
    )?;

    let selected = view.selected_index();
    for (row, name) in browser.visible_names(kind).into_iter().enumerate() {
        let marker = if selected == Some(row) { '>' } else { ' ' };
        writeln!(out, "{} {:>4}  {}", marker, row, name)?;
    }

    for record in browser.selected_details(kind) {
        writeln!(
            out,
            "      {:>3} {} {}{}{}",
            record.order,
            counterpart(kind, record),
            record.column_type,
            if record.is_nullable { "" } else { " NOT NULL" },
            if record.is_primary_key { " PK" } else { "" }
        )?;
    }
    Ok(())
}

/// The name on the other side of a detail record.
fn counterpart(kind: ViewKind, record: &ColumnRecord) -> &str {
    match kind {
        ViewKind::Tables => &record.column_name,
        ViewKind::Columns => &record.table_name,
    }
}
