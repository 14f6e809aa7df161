//! Centralized configuration for the schema library.
//!
//! This module provides the constants that describe the source document format,
//! export formatting, status display, and search behavior.

/// Source document format.
pub struct DocumentConfig;

impl DocumentConfig {
    pub const DEFAULT_FILE_NAME: &'static str = "tables.xml";

    // Element names
    pub const TABLE_ELEMENT: &'static str = "table";
    pub const COLUMN_ELEMENT: &'static str = "col";
    pub const LAST_RUN_ELEMENT: &'static str = "lastrun";

    // Attribute names
    pub const TABLE_NAME_ATTR: &'static str = "id";
    pub const TYPE_ATTR: &'static str = "type";
    pub const NULLABLE_ATTR: &'static str = "nullable";
    pub const PRIMARY_KEY_ATTR: &'static str = "pk";
    pub const ORDER_ATTR: &'static str = "order";

    /// Flag value meaning "true"; any other value is false.
    pub const FLAG_TRUE: &'static str = "1";
}

/// Plain-text export formatting.
pub struct ExportConfig;

impl ExportConfig {
    pub const LINE_ENDING: &'static str = "\r\n";
    pub const MIN_COLUMN_SPACING: usize = 3;
}

/// Status and timestamp display.
pub struct DisplayConfig;

impl DisplayConfig {
    pub const STATUS_READY: &'static str = "Ready";
    pub const LAST_RUN_FORMAT: &'static str = "Schema generated on %B %d, %Y at %I:%M:%S %p";
}

/// Search engine tuning.
pub struct SearchConfig;

impl SearchConfig {
    /// How many names the interruptible filter scans between interrupt checks.
    pub const INTERRUPT_CHECK_INTERVAL: usize = 256;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_interval_is_positive() {
        assert!(SearchConfig::INTERRUPT_CHECK_INTERVAL > 0);
    }

    #[test]
    fn test_export_line_ending() {
        assert_eq!(ExportConfig::LINE_ENDING, "\r\n");
        assert!(ExportConfig::MIN_COLUMN_SPACING >= 1);
    }
}
