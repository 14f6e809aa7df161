//! Parser for the schema description document.
//!
//! The document looks like:
//!
//! ```xml
//! <schema>
//!   <metadata><lastrun>1609459200000</lastrun></metadata>
//!   <table id="users">
//!     <col type="INT" nullable="0" pk="1" order="1">id</col>
//!     <col type="VARCHAR" nullable="1" pk="0" order="2">name</col>
//!   </table>
//! </schema>
//! ```
//!
//! Exactly one root element is required and no text may appear outside it.
//! Sections do not nest: a `table` inside a `table` or a `col` inside a `col`
//! is an error. Elements other than `table`, `col`, and `lastrun` are ignored.
//! Any column problem fails the whole load; a bad `lastrun` value only drops
//! the timestamp. The encoding named in the XML declaration is honoured.

use crate::config::DocumentConfig;
use crate::metadata::last_run::parse_last_run;
use crate::metadata::record::{canonical_name, ColumnRecord};
use crate::{Result, SchemaError};
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;
use tracing::{debug, warn};

/// Non-fatal conditions found while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// The metadata timestamp was present but not an integer.
    InvalidTimestamp { raw: String },
}

/// Everything extracted from one document.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    /// Column records in document order.
    pub records: Vec<ColumnRecord>,
    /// Epoch milliseconds from the metadata section, if present and valid.
    pub last_run: Option<i64>,
    pub warnings: Vec<LoadWarning>,
}

/// Loads column records from a schema description document.
pub struct MetadataLoader;

impl MetadataLoader {
    /// Parse a document held in memory.
    pub fn load(source: &[u8]) -> Result<ParsedDocument> {
        let mut reader = Reader::from_reader(source);
        let mut buf = Vec::new();
        let mut builder = DocumentBuilder::default();
        let mut depth = 0usize;
        let mut root_seen = false;

        loop {
            let position = reader.buffer_position() as u64;
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| SchemaError::xml(e, reader.buffer_position() as u64))?;

            match event {
                Event::Start(e) => {
                    if depth == 0 {
                        enter_root(&mut root_seen, position)?;
                    }
                    depth += 1;
                    builder.start_element(&e, reader.decoder(), position)?;
                }
                Event::Empty(e) => {
                    if depth == 0 {
                        enter_root(&mut root_seen, position)?;
                    }
                    builder.start_element(&e, reader.decoder(), position)?;
                    builder.end_element(e.local_name().as_ref(), position)?;
                }
                Event::End(e) => {
                    depth = depth.saturating_sub(1);
                    builder.end_element(e.local_name().as_ref(), position)?;
                }
                Event::Text(t) => {
                    let text = t.unescape().map_err(|e| SchemaError::xml(e, position))?;
                    if depth > 0 {
                        builder.text(&text);
                    } else if !text.trim().is_empty() {
                        return Err(SchemaError::TextOutsideRoot { position });
                    }
                }
                Event::CData(t) => {
                    if depth == 0 {
                        return Err(SchemaError::TextOutsideRoot { position });
                    }
                    let text = t.decode().map_err(|e| SchemaError::xml(e, position))?;
                    builder.text(&text);
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if depth > 0 {
            return Err(SchemaError::UnexpectedEof {
                open_elements: depth,
            });
        }
        if !root_seen {
            return Err(SchemaError::MissingRoot);
        }

        let document = builder.finish();
        debug!(
            "Parsed {} column records (last run: {:?})",
            document.records.len(),
            document.last_run
        );
        Ok(document)
    }

    /// Read and parse a document from disk.
    pub fn load_file(path: impl AsRef<Path>) -> Result<ParsedDocument> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| SchemaError::io_with_path(e, path))?;
        Self::load(&bytes)
    }
}

/// Attributes of a column section, waiting for its name text.
struct PendingColumn {
    table_name: String,
    column_type: String,
    is_nullable: bool,
    is_primary_key: bool,
    order: i32,
    text: String,
}

#[derive(Default)]
struct DocumentBuilder {
    table_name: Option<String>,
    column: Option<PendingColumn>,
    last_run_text: Option<String>,
    in_last_run: bool,
    records: Vec<ColumnRecord>,
}

impl DocumentBuilder {
    fn start_element(
        &mut self,
        e: &BytesStart<'_>,
        decoder: Decoder,
        position: u64,
    ) -> Result<()> {
        let name = e.local_name();
        let name = name.as_ref();

        if name == DocumentConfig::TABLE_ELEMENT.as_bytes() {
            if self.table_name.is_some() {
                return Err(SchemaError::NestedTable { position });
            }
            let id = attribute(e, DocumentConfig::TABLE_NAME_ATTR, decoder, position)?
                .map(|id| canonical_name(&id))
                .filter(|id| !id.is_empty())
                .ok_or(SchemaError::MissingTableName { position })?;
            self.table_name = Some(id);
        } else if name == DocumentConfig::COLUMN_ELEMENT.as_bytes() {
            if self.column.is_some() {
                return Err(SchemaError::NestedColumn { position });
            }
            let table_name = self
                .table_name
                .clone()
                .ok_or(SchemaError::ColumnOutsideTable { position })?;

            let column_type = required_attribute(e, DocumentConfig::TYPE_ATTR, decoder, position)?;
            let nullable = required_attribute(e, DocumentConfig::NULLABLE_ATTR, decoder, position)?;
            let pk = required_attribute(e, DocumentConfig::PRIMARY_KEY_ATTR, decoder, position)?;
            let order = required_attribute(e, DocumentConfig::ORDER_ATTR, decoder, position)?;
            let order = order
                .parse::<i32>()
                .map_err(|_| SchemaError::InvalidOrder {
                    value: order.clone(),
                    position,
                })?;

            self.column = Some(PendingColumn {
                table_name,
                column_type,
                is_nullable: nullable == DocumentConfig::FLAG_TRUE,
                is_primary_key: pk == DocumentConfig::FLAG_TRUE,
                order,
                text: String::new(),
            });
        } else if name == DocumentConfig::LAST_RUN_ELEMENT.as_bytes() {
            self.in_last_run = true;
            self.last_run_text = Some(String::new());
        }

        Ok(())
    }

    fn end_element(&mut self, name: &[u8], position: u64) -> Result<()> {
        if name == DocumentConfig::TABLE_ELEMENT.as_bytes() {
            self.table_name = None;
        } else if name == DocumentConfig::COLUMN_ELEMENT.as_bytes() {
            if let Some(column) = self.column.take() {
                let column_name = canonical_name(&column.text);
                if column_name.is_empty() {
                    return Err(SchemaError::MissingColumnName {
                        table: column.table_name,
                        position,
                    });
                }
                self.records.push(ColumnRecord {
                    order: column.order,
                    table_name: column.table_name,
                    column_name,
                    column_type: column.column_type,
                    is_nullable: column.is_nullable,
                    is_primary_key: column.is_primary_key,
                });
            }
        } else if name == DocumentConfig::LAST_RUN_ELEMENT.as_bytes() {
            self.in_last_run = false;
        }

        Ok(())
    }

    fn text(&mut self, text: &str) {
        if let Some(column) = self.column.as_mut() {
            column.text.push_str(text);
        } else if self.in_last_run {
            if let Some(last_run) = self.last_run_text.as_mut() {
                last_run.push_str(text);
            }
        }
    }

    fn finish(self) -> ParsedDocument {
        let mut warnings = Vec::new();
        let last_run = match self.last_run_text {
            Some(raw) => {
                let parsed = parse_last_run(&raw);
                if parsed.is_none() && !raw.trim().is_empty() {
                    warn!("Ignoring invalid last-run timestamp: {}", raw.trim());
                    warnings.push(LoadWarning::InvalidTimestamp {
                        raw: raw.trim().to_string(),
                    });
                }
                parsed
            }
            None => None,
        };

        ParsedDocument {
            records: self.records,
            last_run,
            warnings,
        }
    }
}

fn attribute(
    e: &BytesStart<'_>,
    name: &str,
    decoder: Decoder,
    position: u64,
) -> Result<Option<String>> {
    match e.try_get_attribute(name) {
        Ok(Some(attr)) => attr
            .decode_and_unescape_value(decoder)
            .map(|value| Some(value.into_owned()))
            .map_err(|err| SchemaError::xml(err, position)),
        Ok(None) => Ok(None),
        Err(err) => Err(SchemaError::xml(err, position)),
    }
}

fn required_attribute(
    e: &BytesStart<'_>,
    name: &str,
    decoder: Decoder,
    position: u64,
) -> Result<String> {
    attribute(e, name, decoder, position)?.ok_or_else(|| SchemaError::MissingAttribute {
        element: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
        attribute: name.to_string(),
        position,
    })
}

/// Only one top-level element may open.
fn enter_root(root_seen: &mut bool, position: u64) -> Result<()> {
    if *root_seen {
        return Err(SchemaError::MultipleRoots { position });
    }
    *root_seen = true;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const USERS: &str = r#"<?xml version="1.0"?>
<schema>
  <metadata><lastrun>1609459200000</lastrun></metadata>
  <table id="users">
    <col type="INT" nullable="0" pk="1" order="1">id</col>
    <col type="VARCHAR(64)" nullable="1" pk="0" order="2">name</col>
  </table>
</schema>"#;

    fn with_column(col: &str) -> String {
        format!(r#"<schema><table id="t">{}</table></schema>"#, col)
    }

    #[test]
    fn test_load_users() {
        let doc = MetadataLoader::load(USERS.as_bytes()).unwrap();
        assert_eq!(doc.last_run, Some(1_609_459_200_000));
        assert!(doc.warnings.is_empty());
        assert_eq!(
            doc.records,
            vec![
                ColumnRecord {
                    order: 1,
                    table_name: "USERS".into(),
                    column_name: "ID".into(),
                    column_type: "INT".into(),
                    is_nullable: false,
                    is_primary_key: true,
                },
                ColumnRecord {
                    order: 2,
                    table_name: "USERS".into(),
                    column_name: "NAME".into(),
                    column_type: "VARCHAR(64)".into(),
                    is_nullable: true,
                    is_primary_key: false,
                },
            ]
        );
    }

    #[test]
    fn test_invalid_timestamp_is_absent_with_warning() {
        let xml = r#"<schema><metadata><lastrun>not-a-number</lastrun></metadata>
            <table id="t"><col type="INT" nullable="0" pk="0" order="1">a</col></table></schema>"#;
        let doc = MetadataLoader::load(xml.as_bytes()).unwrap();
        assert_eq!(doc.last_run, None);
        assert_eq!(
            doc.warnings,
            vec![LoadWarning::InvalidTimestamp {
                raw: "not-a-number".into()
            }]
        );
        assert_eq!(doc.records.len(), 1);
    }

    #[test]
    fn test_missing_timestamp() {
        let doc = MetadataLoader::load(with_column(
            r#"<col type="INT" nullable="0" pk="0" order="1">a</col>"#,
        ).as_bytes())
        .unwrap();
        assert_eq!(doc.last_run, None);
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn test_missing_order_is_fatal() {
        let xml = with_column(r#"<col type="INT" nullable="0" pk="0">a</col>"#);
        let err = MetadataLoader::load(xml.as_bytes()).unwrap_err();
        assert!(err.is_parse_error());
        assert!(matches!(
            err,
            SchemaError::MissingAttribute { ref attribute, .. } if attribute == "order"
        ));
    }

    #[test]
    fn test_each_required_attribute_is_checked() {
        for (missing, col) in [
            ("type", r#"<col nullable="0" pk="0" order="1">a</col>"#),
            ("nullable", r#"<col type="INT" pk="0" order="1">a</col>"#),
            ("pk", r#"<col type="INT" nullable="0" order="1">a</col>"#),
        ] {
            let err = MetadataLoader::load(with_column(col).as_bytes()).unwrap_err();
            match err {
                SchemaError::MissingAttribute { attribute, .. } => assert_eq!(attribute, missing),
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_non_numeric_order_is_fatal() {
        let xml = with_column(r#"<col type="INT" nullable="0" pk="0" order="first">a</col>"#);
        let err = MetadataLoader::load(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidOrder { ref value, .. } if value == "first"));
    }

    #[test]
    fn test_unterminated_document_is_fatal() {
        let xml = r#"<schema><table id="t"><col type="INT" nullable="0" pk="0" order="1">a</col>"#;
        let err = MetadataLoader::load(xml.as_bytes()).unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_mismatched_end_tag_is_fatal() {
        let xml = r#"<schema><table id="t"></schema></table>"#;
        let err = MetadataLoader::load(xml.as_bytes()).unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_table_without_id_is_fatal() {
        let xml = r#"<schema><table><col type="INT" nullable="0" pk="0" order="1">a</col></table></schema>"#;
        let err = MetadataLoader::load(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, SchemaError::MissingTableName { .. }));
    }

    #[test]
    fn test_column_outside_table_is_fatal() {
        let xml = r#"<schema><col type="INT" nullable="0" pk="0" order="1">a</col></schema>"#;
        let err = MetadataLoader::load(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, SchemaError::ColumnOutsideTable { .. }));
    }

    #[test]
    fn test_empty_column_name_is_fatal() {
        let xml = with_column(r#"<col type="INT" nullable="0" pk="0" order="1"/>"#);
        let err = MetadataLoader::load(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, SchemaError::MissingColumnName { ref table, .. } if table == "T"));
    }

    #[test]
    fn test_flags_other_than_one_are_false() {
        let xml = with_column(r#"<col type="INT" nullable="yes" pk="true" order="1">a</col>"#);
        let doc = MetadataLoader::load(xml.as_bytes()).unwrap();
        assert!(!doc.records[0].is_nullable);
        assert!(!doc.records[0].is_primary_key);
    }

    #[test]
    fn test_entities_and_whitespace_in_names() {
        let xml = r#"<schema><table id="a&amp;b"><col type="CHAR" nullable="1" pk="0" order="3">
            Amount
        </col></table></schema>"#;
        let doc = MetadataLoader::load(xml.as_bytes()).unwrap();
        assert_eq!(doc.records[0].table_name, "A&B");
        assert_eq!(doc.records[0].column_name, "AMOUNT");
        assert_eq!(doc.records[0].order, 3);
    }

    #[test]
    fn test_empty_document_has_no_records() {
        let doc = MetadataLoader::load(b"<schema/>").unwrap();
        assert!(doc.records.is_empty());
        assert_eq!(doc.last_run, None);
    }

    #[test]
    fn test_padded_order_is_fatal() {
        let xml = with_column(r#"<col type="INT" nullable="0" pk="0" order=" 3 ">a</col>"#);
        let err = MetadataLoader::load(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidOrder { ref value, .. } if value == " 3 "));
    }

    #[test]
    fn test_input_without_root_element_is_fatal() {
        for input in [&b""[..], b"   \n", b"hello world", br#"{"tables": ["users"]}"#] {
            let err = MetadataLoader::load(input).unwrap_err();
            assert!(err.is_parse_error(), "input {:?}", String::from_utf8_lossy(input));
        }
        assert!(matches!(
            MetadataLoader::load(b"").unwrap_err(),
            SchemaError::MissingRoot
        ));
        assert!(matches!(
            MetadataLoader::load(b"hello").unwrap_err(),
            SchemaError::TextOutsideRoot { .. }
        ));
    }

    #[test]
    fn test_second_root_element_is_fatal() {
        let xml = format!(
            "<a/>{}",
            with_column(r#"<col type="INT" nullable="0" pk="0" order="1">a</col>"#)
        );
        let err = MetadataLoader::load(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, SchemaError::MultipleRoots { .. }));
    }

    #[test]
    fn test_text_after_root_is_fatal() {
        let err = MetadataLoader::load(b"<schema/>\ntrailing").unwrap_err();
        assert!(matches!(err, SchemaError::TextOutsideRoot { .. }));

        let doc = MetadataLoader::load(b"\n<schema/>\n\n").unwrap();
        assert!(doc.records.is_empty());
    }

    #[test]
    fn test_nested_column_is_fatal() {
        let xml = with_column(
            r#"<col type="INT" nullable="0" pk="0" order="1">outer<col type="INT" nullable="0" pk="0" order="2">inner</col></col>"#,
        );
        let err = MetadataLoader::load(xml.as_bytes()).unwrap_err();
        assert!(err.is_parse_error());
        assert!(matches!(err, SchemaError::NestedColumn { .. }));
    }

    #[test]
    fn test_nested_table_is_fatal() {
        let xml = r#"<schema><table id="outer"><table id="inner"><col type="INT" nullable="0" pk="0" order="1">a</col></table>
            <col type="INT" nullable="0" pk="0" order="2">b</col></table></schema>"#;
        let err = MetadataLoader::load(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, SchemaError::NestedTable { .. }));
    }

    #[test]
    fn test_declared_latin1_encoding_is_decoded() {
        let mut xml = br#"<?xml version="1.0" encoding="ISO-8859-1"?><schema><table id="caf"#.to_vec();
        xml.push(0xE9);
        xml.extend_from_slice(br#""><col type="INT" nullable="0" pk="0" order="1">ann"#);
        xml.push(0xE9);
        xml.extend_from_slice(b"e</col></table></schema>");

        let doc = MetadataLoader::load(&xml).unwrap();
        assert_eq!(doc.records[0].table_name, "CAF\u{c9}");
        assert_eq!(doc.records[0].column_name, "ANN\u{c9}E");
    }
}
