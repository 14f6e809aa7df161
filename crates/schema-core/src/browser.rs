//! Browsing session over a metadata store.
//!
//! A [`SchemaBrowser`] holds two independently filtered views, one over table
//! names and one over column names. Each view remembers its search string, its
//! current result set, and its selected row. Changing a search string
//! recomputes the view and carries the selection over with
//! [`track_selection`].

use crate::config::DisplayConfig;
use crate::export;
use crate::index::{
    filter, filter_interruptible, track_selection, MetadataStore, QueryKey, ResultSet,
    SearchInterrupt, ViewKind,
};
use crate::metadata::{format_last_run_local, ColumnRecord};
use crate::Result;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// One filtered, selectable list of names.
#[derive(Debug, Clone)]
pub struct ListView {
    kind: ViewKind,
    key: QueryKey,
    results: ResultSet,
    selected: Option<usize>,
}

impl ListView {
    fn new(kind: ViewKind, raw: &str, names: &[String], select_first: bool) -> Self {
        let key = QueryKey::build(raw);
        let results = filter(names, &key);
        let selected = (select_first && !results.is_empty()).then_some(0);
        Self {
            kind,
            key,
            results,
            selected,
        }
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    /// The raw search string currently applied.
    pub fn query(&self) -> &str {
        self.key.raw()
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn row_count(&self) -> usize {
        self.results.len()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    fn selected_name<'a>(&self, names: &'a [String]) -> Option<&'a str> {
        self.selected
            .and_then(|row| self.results.name_at(row, names))
    }

    /// Apply a new search string; `false` if it is the one already applied.
    fn requery(&mut self, raw: &str, names: &[String]) -> bool {
        if self.key.is_based_on(raw) {
            return false;
        }
        let key = QueryKey::build(raw);
        let results = filter(names, &key);
        self.replace_results(key, results, names);
        true
    }

    /// As [`ListView::requery`], leaving the view untouched if interrupted.
    fn requery_interruptible(
        &mut self,
        raw: &str,
        names: &[String],
        interrupt: &SearchInterrupt,
    ) -> Result<bool> {
        if self.key.is_based_on(raw) {
            return Ok(false);
        }
        let key = QueryKey::build(raw);
        let results = filter_interruptible(names, &key, interrupt)?;
        self.replace_results(key, results, names);
        Ok(true)
    }

    fn replace_results(&mut self, key: QueryKey, results: ResultSet, names: &[String]) {
        let previous_value = self.selected_name(names).map(str::to_owned);
        let previous_index = self.selected;
        self.commit(key, results, names, previous_index, previous_value.as_deref());
    }

    fn commit(
        &mut self,
        key: QueryKey,
        results: ResultSet,
        names: &[String],
        previous_index: Option<usize>,
        previous_value: Option<&str>,
    ) {
        self.selected = track_selection(previous_index, previous_value, &results, names);
        debug!(
            "Filtered {} {:?}: {} of {} rows, selected {:?}",
            self.kind,
            key.raw(),
            results.len(),
            names.len(),
            self.selected
        );
        self.key = key;
        self.results = results;
    }
}

/// Serializable picture of one view, for front ends that render JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub kind: ViewKind,
    pub query: String,
    pub rows: Vec<String>,
    pub selected: Option<usize>,
    pub details: Vec<ColumnRecord>,
}

/// Builder for configuring a [`SchemaBrowser`].
///
/// # Example
///
/// ```rust,ignore
/// let browser = SchemaBrowser::builder()
///     .table_query("order")
///     .build_from_path("tables.xml")?;
/// ```
#[derive(Debug, Clone)]
pub struct SchemaBrowserBuilder {
    table_query: String,
    column_query: String,
    select_first: bool,
}

impl Default for SchemaBrowserBuilder {
    fn default() -> Self {
        Self {
            table_query: String::new(),
            column_query: String::new(),
            select_first: true,
        }
    }
}

impl SchemaBrowserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial search string for the tables view.
    ///
    /// Default: empty (all tables)
    pub fn table_query(mut self, raw: impl Into<String>) -> Self {
        self.table_query = raw.into();
        self
    }

    /// Initial search string for the columns view.
    ///
    /// Default: empty (all columns)
    pub fn column_query(mut self, raw: impl Into<String>) -> Self {
        self.column_query = raw.into();
        self
    }

    /// Select the first row of each non-empty view on start.
    ///
    /// Default: `true`
    pub fn select_first(mut self, enable: bool) -> Self {
        self.select_first = enable;
        self
    }

    pub fn build(self, store: Arc<MetadataStore>) -> SchemaBrowser {
        let tables = ListView::new(
            ViewKind::Tables,
            &self.table_query,
            store.table_names(),
            self.select_first,
        );
        let columns = ListView::new(
            ViewKind::Columns,
            &self.column_query,
            store.column_names(),
            self.select_first,
        );
        SchemaBrowser {
            store,
            tables,
            columns,
        }
    }

    pub fn build_from_bytes(self, source: &[u8]) -> Result<SchemaBrowser> {
        Ok(self.build(Arc::new(MetadataStore::load(source)?)))
    }

    pub fn build_from_path(self, path: impl AsRef<Path>) -> Result<SchemaBrowser> {
        Ok(self.build(Arc::new(MetadataStore::load_file(path)?)))
    }
}

/// Two mirrored views over one shared, immutable store.
#[derive(Debug, Clone)]
pub struct SchemaBrowser {
    store: Arc<MetadataStore>,
    tables: ListView,
    columns: ListView,
}

impl SchemaBrowser {
    pub fn builder() -> SchemaBrowserBuilder {
        SchemaBrowserBuilder::new()
    }

    /// Browse an already-built store with default options.
    pub fn new(store: Arc<MetadataStore>) -> Self {
        Self::builder().build(store)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().build_from_path(path)
    }

    pub fn from_bytes(source: &[u8]) -> Result<Self> {
        Self::builder().build_from_bytes(source)
    }

    /// The store backing both views. Cloning the `Arc` is the way to share it.
    pub fn store(&self) -> &Arc<MetadataStore> {
        &self.store
    }

    pub fn view(&self, kind: ViewKind) -> &ListView {
        match kind {
            ViewKind::Tables => &self.tables,
            ViewKind::Columns => &self.columns,
        }
    }

    fn view_and_names_mut(&mut self, kind: ViewKind) -> (&mut ListView, &[String]) {
        match kind {
            ViewKind::Tables => (&mut self.tables, self.store.table_names()),
            ViewKind::Columns => (&mut self.columns, self.store.column_names()),
        }
    }

    /// Change a view's search string.
    ///
    /// Returns `true` if the view was recomputed, `false` if `raw` is
    /// byte-identical to the search string already applied.
    pub fn set_query(&mut self, kind: ViewKind, raw: &str) -> bool {
        let (view, names) = self.view_and_names_mut(kind);
        view.requery(raw, names)
    }

    /// Change a view's search string while a search pass may be interrupted.
    ///
    /// The caller brackets the call with [`SearchInterrupt::begin`]. On
    /// [`crate::SchemaError::Interrupted`] the view keeps its previous search
    /// string, rows, and selection.
    pub fn set_query_interruptible(
        &mut self,
        kind: ViewKind,
        raw: &str,
        interrupt: &SearchInterrupt,
    ) -> Result<bool> {
        let (view, names) = self.view_and_names_mut(kind);
        view.requery_interruptible(raw, names, interrupt)
    }

    /// Select a row; `None` or an out-of-range row clears the selection.
    pub fn select(&mut self, kind: ViewKind, row: Option<usize>) {
        let (view, _) = self.view_and_names_mut(kind);
        view.selected = row.filter(|&row| row < view.results.len());
    }

    pub fn selected_index(&self, kind: ViewKind) -> Option<usize> {
        self.view(kind).selected
    }

    pub fn selected_name(&self, kind: ViewKind) -> Option<&str> {
        self.view(kind).selected_name(self.store.names(kind))
    }

    /// Detail records for the selected name; empty when nothing is selected.
    pub fn selected_details(&self, kind: ViewKind) -> &[ColumnRecord] {
        match self.selected_name(kind) {
            Some(name) => self.store.details(kind, name),
            None => &[],
        }
    }

    pub fn row_count(&self, kind: ViewKind) -> usize {
        self.view(kind).row_count()
    }

    /// Names currently visible in a view, in display order.
    pub fn visible_names(&self, kind: ViewKind) -> Vec<&str> {
        self.view(kind)
            .results
            .names(self.store.names(kind))
            .collect()
    }

    pub fn snapshot(&self, kind: ViewKind) -> ViewSnapshot {
        let view = self.view(kind);
        ViewSnapshot {
            kind,
            query: view.query().to_string(),
            rows: self
                .visible_names(kind)
                .into_iter()
                .map(String::from)
                .collect(),
            selected: view.selected,
            details: self.selected_details(kind).to_vec(),
        }
    }

    /// Status text: when the schema was generated, or "Ready" if unknown.
    pub fn status_line(&self) -> String {
        self.store
            .last_run_timestamp()
            .and_then(format_last_run_local)
            .unwrap_or_else(|| DisplayConfig::STATUS_READY.to_string())
    }

    /// Visible names of a view as export text, optionally with detail tables.
    pub fn export_visible(&self, kind: ViewKind, with_details: bool) -> String {
        let names = self.visible_names(kind);
        if with_details {
            export::format_with_details(&self.store, kind, &names)
        } else {
            export::format_names(&names)
        }
    }

    /// The selected name as export text; empty when nothing is selected.
    pub fn export_selected(&self, kind: ViewKind, with_details: bool) -> String {
        let names: Vec<&str> = self.selected_name(kind).into_iter().collect();
        if with_details {
            export::format_with_details(&self.store, kind, &names)
        } else {
            export::format_names(&names)
        }
    }

    /// Swap in a new store, re-filtering both views with their current
    /// search strings and carrying selections over by name.
    pub fn replace_store(&mut self, store: Arc<MetadataStore>) {
        let previous = [ViewKind::Tables, ViewKind::Columns].map(|kind| {
            let view = self.view(kind);
            (
                view.selected,
                view.selected_name(self.store.names(kind)).map(str::to_owned),
            )
        });

        self.store = store;

        for (kind, (previous_index, previous_value)) in
            [ViewKind::Tables, ViewKind::Columns].into_iter().zip(previous)
        {
            let (view, names) = self.view_and_names_mut(kind);
            let key = view.key.clone();
            let results = filter(names, &key);
            view.commit(key, results, names, previous_index, previous_value.as_deref());
        }

        info!(
            "Store replaced: {} tables, {} columns",
            self.store.table_count(),
            self.store.column_count()
        );
    }

    /// Reload from disk. On error the current store and views are kept.
    pub fn reload_from_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let store = MetadataStore::load_file(path)?;
        self.replace_store(Arc::new(store));
        Ok(())
    }

    /// Reload from an in-memory document. On error the current store and views are kept.
    pub fn reload_from_bytes(&mut self, source: &[u8]) -> Result<()> {
        let store = MetadataStore::load(source)?;
        self.replace_store(Arc::new(store));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit_store() -> Arc<MetadataStore> {
        let records = ["APPLE", "APPLEPIE", "BANANA"]
            .iter()
            .enumerate()
            .map(|(i, table)| ColumnRecord {
                order: 1,
                table_name: table.to_string(),
                column_name: format!("COL_{}", i),
                column_type: "INT".to_string(),
                is_nullable: false,
                is_primary_key: true,
            })
            .collect();
        Arc::new(MetadataStore::new(records, None))
    }

    #[test]
    fn test_starts_with_first_row_selected() {
        let browser = SchemaBrowser::new(fruit_store());
        assert_eq!(browser.row_count(ViewKind::Tables), 3);
        assert_eq!(browser.selected_name(ViewKind::Tables), Some("APPLE"));
        assert_eq!(browser.selected_name(ViewKind::Columns), Some("COL_0"));
    }

    #[test]
    fn test_builder_options() {
        let browser = SchemaBrowser::builder()
            .table_query("pie")
            .select_first(false)
            .build(fruit_store());
        assert_eq!(browser.visible_names(ViewKind::Tables), ["APPLEPIE"]);
        assert_eq!(browser.selected_index(ViewKind::Tables), None);
        assert!(browser.selected_details(ViewKind::Tables).is_empty());
    }

    #[test]
    fn test_same_query_is_not_recomputed() {
        let mut browser = SchemaBrowser::new(fruit_store());
        assert!(browser.set_query(ViewKind::Tables, "app"));
        assert!(!browser.set_query(ViewKind::Tables, "app"));
        assert!(browser.set_query(ViewKind::Tables, "APP"));
    }

    #[test]
    fn test_selection_follows_name() {
        let mut browser = SchemaBrowser::new(fruit_store());
        browser.select(ViewKind::Tables, Some(1));
        assert_eq!(browser.selected_name(ViewKind::Tables), Some("APPLEPIE"));

        browser.set_query(ViewKind::Tables, "pie");
        assert_eq!(browser.selected_index(ViewKind::Tables), Some(0));
        assert_eq!(browser.selected_name(ViewKind::Tables), Some("APPLEPIE"));

        browser.set_query(ViewKind::Tables, "");
        assert_eq!(browser.selected_name(ViewKind::Tables), Some("APPLEPIE"));
    }

    #[test]
    fn test_selection_cleared_then_restored() {
        let mut browser = SchemaBrowser::new(fruit_store());
        browser.set_query(ViewKind::Tables, "zzz");
        assert_eq!(browser.selected_index(ViewKind::Tables), None);

        browser.set_query(ViewKind::Tables, "an");
        assert_eq!(browser.selected_name(ViewKind::Tables), Some("BANANA"));
    }

    #[test]
    fn test_views_are_independent() {
        let mut browser = SchemaBrowser::new(fruit_store());
        browser.set_query(ViewKind::Columns, "2");
        assert_eq!(browser.visible_names(ViewKind::Columns), ["COL_2"]);
        assert_eq!(browser.row_count(ViewKind::Tables), 3);
    }

    #[test]
    fn test_interruptible_query_applies_like_plain_query() {
        let mut browser = SchemaBrowser::new(fruit_store());
        let interrupt = SearchInterrupt::new();
        let _pass = interrupt.begin();

        assert!(browser
            .set_query_interruptible(ViewKind::Tables, "app", &interrupt)
            .unwrap());
        assert_eq!(browser.visible_names(ViewKind::Tables), ["APPLE", "APPLEPIE"]);
        assert!(!browser
            .set_query_interruptible(ViewKind::Tables, "app", &interrupt)
            .unwrap());
    }

    #[test]
    fn test_interrupted_query_keeps_view() {
        let mut browser = SchemaBrowser::new(fruit_store());
        browser.set_query(ViewKind::Tables, "an");
        let interrupt = SearchInterrupt::new();

        let pass = interrupt.begin();
        assert!(interrupt.interrupt());
        let err = browser
            .set_query_interruptible(ViewKind::Tables, "app", &interrupt)
            .unwrap_err();
        assert!(matches!(err, crate::SchemaError::Interrupted));
        drop(pass);

        assert_eq!(browser.view(ViewKind::Tables).query(), "an");
        assert_eq!(browser.visible_names(ViewKind::Tables), ["BANANA"]);
        assert_eq!(browser.selected_name(ViewKind::Tables), Some("BANANA"));
    }

    #[test]
    fn test_select_out_of_range_clears() {
        let mut browser = SchemaBrowser::new(fruit_store());
        browser.select(ViewKind::Tables, Some(10));
        assert_eq!(browser.selected_index(ViewKind::Tables), None);
    }

    #[test]
    fn test_selected_details_and_export() {
        let browser = SchemaBrowser::new(fruit_store());
        assert_eq!(browser.selected_details(ViewKind::Tables).len(), 1);
        assert_eq!(browser.export_selected(ViewKind::Tables, false), "APPLE");
        assert_eq!(
            browser.export_visible(ViewKind::Tables, false),
            "APPLE\r\nAPPLEPIE\r\nBANANA"
        );
        assert!(browser
            .export_visible(ViewKind::Tables, true)
            .contains("COL_1"));
    }

    #[test]
    fn test_status_line_without_timestamp() {
        let browser = SchemaBrowser::new(fruit_store());
        assert_eq!(browser.status_line(), "Ready");
    }

    #[test]
    fn test_snapshot_serializes() {
        let browser = SchemaBrowser::new(fruit_store());
        let json = serde_json::to_value(browser.snapshot(ViewKind::Tables)).unwrap();
        assert_eq!(json["kind"], "tables");
        assert_eq!(json["rows"][2], "BANANA");
        assert_eq!(json["selected"], 0);
        assert_eq!(json["details"][0]["columnName"], "COL_0");
    }
}
