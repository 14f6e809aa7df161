//! Error types for the schema library.
//!
//! Parse failures are fatal to store construction: a document either yields a
//! complete store or one of the parse variants below, never a partial store.
//! Unknown table or column names are not errors; lookups return empty slices.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the schema library.
#[derive(Debug, Error)]
pub enum SchemaError {
    // Document errors
    #[error("Malformed document at byte {position}: {message}")]
    Xml { message: String, position: u64 },

    #[error("Element <{element}> at byte {position} is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: String,
        attribute: String,
        position: u64,
    },

    #[error("Invalid column order '{value}' at byte {position}")]
    InvalidOrder { value: String, position: u64 },

    #[error("Table section at byte {position} has no name")]
    MissingTableName { position: u64 },

    #[error("Column section in table {table} at byte {position} has no column name")]
    MissingColumnName { table: String, position: u64 },

    #[error("Column section at byte {position} is not inside a table section")]
    ColumnOutsideTable { position: u64 },

    #[error("Table section at byte {position} opens inside another table section")]
    NestedTable { position: u64 },

    #[error("Column section at byte {position} opens inside another column section")]
    NestedColumn { position: u64 },

    #[error("Document has no root element")]
    MissingRoot,

    #[error("Second root element at byte {position}")]
    MultipleRoots { position: u64 },

    #[error("Text outside the root element at byte {position}")]
    TextOutsideRoot { position: u64 },

    #[error("Unexpected end of document with {open_elements} unclosed element(s)")]
    UnexpectedEof { open_elements: usize },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Search interrupted")]
    Interrupted,
}

/// Result type alias for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

impl From<std::io::Error> for SchemaError {
    fn from(err: std::io::Error) -> Self {
        SchemaError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        SchemaError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl SchemaError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            return SchemaError::FileNotFound(path);
        }
        SchemaError::Io {
            message: err.to_string(),
            path: Some(path),
            source: Some(err),
        }
    }

    /// Create a markup error from any parser error.
    pub(crate) fn xml(err: impl std::fmt::Display, position: u64) -> Self {
        SchemaError::Xml {
            message: err.to_string(),
            position,
        }
    }

    /// Whether this error means the source document could not be turned into a store.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            SchemaError::Xml { .. }
                | SchemaError::MissingAttribute { .. }
                | SchemaError::InvalidOrder { .. }
                | SchemaError::MissingTableName { .. }
                | SchemaError::MissingColumnName { .. }
                | SchemaError::ColumnOutsideTable { .. }
                | SchemaError::NestedTable { .. }
                | SchemaError::NestedColumn { .. }
                | SchemaError::MissingRoot
                | SchemaError::MultipleRoots { .. }
                | SchemaError::TextOutsideRoot { .. }
                | SchemaError::UnexpectedEof { .. }
        )
    }
}
