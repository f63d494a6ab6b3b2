//! XML dataset file source
//!
//! Decoded at the event level so element text reaches the record unchanged,
//! surrounding whitespace included.

use async_trait::async_trait;
use quick_xml::{events::Event, Reader};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::{LoadError, Record, RecordSource};

/// Element holding one record, directly under the document root
const ROW: &[u8] = b"row";

/// Depth of the `<row>` element and of its field elements
const ROW_DEPTH: usize = 2;
const FIELD_DEPTH: usize = 3;

#[derive(Debug, Error)]
enum DecodeError {
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),

    #[error("invalid {field} value: {value:?}")]
    Field { field: &'static str, value: String },

    #[error("row without {0}")]
    Missing(&'static str),
}

/// Fields collected for the `<row>` being read
#[derive(Debug, Default)]
struct RowFields {
    id: Option<i64>,
    guid: String,
    age: Option<i64>,
    first_name: Option<String>,
    last_name: Option<String>,
    about: String,
    gender: String,
}

impl RowFields {
    fn set(&mut self, name: &[u8], text: String) -> Result<(), DecodeError> {
        match name {
            b"id" => self.id = Some(parse_int("id", text)?),
            b"age" => self.age = Some(parse_int("age", text)?),
            b"guid" => self.guid = text,
            b"first_name" => self.first_name = Some(text),
            b"last_name" => self.last_name = Some(text),
            b"about" => self.about = text,
            b"gender" => self.gender = text,
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<Record, DecodeError> {
        Ok(Record {
            id: self.id.ok_or(DecodeError::Missing("id"))?,
            guid: self.guid,
            age: self.age.ok_or(DecodeError::Missing("age"))?,
            first_name: self.first_name.ok_or(DecodeError::Missing("first_name"))?,
            last_name: self.last_name.ok_or(DecodeError::Missing("last_name"))?,
            about: self.about,
            gender: self.gender,
        })
    }
}

fn parse_int(field: &'static str, text: String) -> Result<i64, DecodeError> {
    text.trim()
        .parse()
        .map_err(|_| DecodeError::Field { field, value: text })
}

/// Walk `<root><row>...</row>...</root>`, ignoring unknown elements
fn decode(document: &str) -> Result<Vec<Record>, DecodeError> {
    let mut reader = Reader::from_str(document);
    reader.config_mut().trim_text(false);

    let mut records = Vec::new();
    let mut row: Option<RowFields> = None;
    let mut field: Option<(Vec<u8>, String)> = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                if depth == ROW_DEPTH && e.local_name().as_ref() == ROW {
                    row = Some(RowFields::default());
                } else if depth == FIELD_DEPTH && row.is_some() {
                    field = Some((e.local_name().as_ref().to_vec(), String::new()));
                }
            }
            Event::Empty(e) => {
                if depth + 1 == ROW_DEPTH && e.local_name().as_ref() == ROW {
                    records.push(RowFields::default().finish()?);
                } else if depth + 1 == FIELD_DEPTH {
                    if let Some(row) = row.as_mut() {
                        row.set(e.local_name().as_ref(), String::new())?;
                    }
                }
            }
            Event::Text(t) if depth == FIELD_DEPTH => {
                if let Some((_, text)) = field.as_mut() {
                    text.push_str(&t.unescape()?);
                }
            }
            Event::CData(c) if depth == FIELD_DEPTH => {
                if let Some((_, text)) = field.as_mut() {
                    text.push_str(std::str::from_utf8(&c)?);
                }
            }
            Event::End(_) => {
                if depth == FIELD_DEPTH {
                    if let (Some(row), Some((name, text))) = (row.as_mut(), field.take()) {
                        row.set(&name, text)?;
                    }
                } else if depth == ROW_DEPTH {
                    if let Some(row) = row.take() {
                        records.push(row.finish()?);
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(records)
}

/// Reads records from an XML file on every [`load`](RecordSource::load)
#[derive(Debug, Clone)]
pub struct XmlFileSource {
    path: PathBuf,
}

impl XmlFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a dataset document already held in memory
    pub fn parse(&self, document: &str) -> Result<Vec<Record>, LoadError> {
        decode(document).map_err(|e| LoadError::Decode {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl RecordSource for XmlFileSource {
    async fn load(&self) -> Result<Vec<Record>, LoadError> {
        let document = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| LoadError::Read {
                path: self.path.display().to_string(),
                source,
            })?;

        let records = self.parse(&document)?;
        tracing::debug!(
            path = %self.path.display(),
            count = records.len(),
            "Loaded dataset"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<root>
  <row>
    <id>0</id>
    <guid>1a6fa827-62f1-45f6-b579-aaead2b47169</guid>
    <isActive>false</isActive>
    <age>22</age>
    <first_name>Boyd</first_name>
    <last_name>Wolf</last_name>
    <gender>male</gender>
    <about>Nulla cillum enim voluptate.</about>
  </row>
  <row>
    <id>1</id>
    <guid>46c06b5e-dd08-4e26-bf85-b15d280e5e07</guid>
    <age>21</age>
    <first_name>Hilda</first_name>
    <last_name>Mayer</last_name>
    <gender>female</gender>
    <about>Sit commodo consectetur minim amet ex.</about>
  </row>
</root>"#;

    #[test]
    fn test_parse_ignores_unknown_elements() {
        let source = XmlFileSource::new("inline.xml");
        let records = source.parse(DOCUMENT).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 0);
        assert_eq!(records[0].full_name(), "Boyd Wolf");
        assert_eq!(records[1].gender, "female");
        assert_eq!(records[1].about, "Sit commodo consectetur minim amet ex.");
    }

    #[test]
    fn test_parse_rejects_malformed_document() {
        let source = XmlFileSource::new("broken.xml");
        let err = source.parse("<root><row><id>zero</id></row></root>").unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
    }

    #[test]
    fn test_parse_keeps_text_exactly() {
        let source = XmlFileSource::new("inline.xml");
        let records = source
            .parse(
                "<root><row><id>7</id><age> 40 </age><first_name> Ann</first_name>\
                 <last_name>Lee </last_name><about>Minim labore ipsum.\n</about>\
                 <gender>female</gender></row></root>",
            )
            .unwrap();

        assert_eq!(records[0].age, 40);
        assert_eq!(records[0].first_name, " Ann");
        assert_eq!(records[0].last_name, "Lee ");
        assert_eq!(records[0].about, "Minim labore ipsum.\n");
    }

    #[test]
    fn test_parse_unescapes_entities_and_cdata() {
        let source = XmlFileSource::new("inline.xml");
        let records = source
            .parse(
                "<root><row><id>1</id><age>2</age><first_name>A</first_name>\
                 <last_name>B</last_name><about>Tom &amp; Jerry <![CDATA[<3]]></about>\
                 <gender/></row></root>",
            )
            .unwrap();

        assert_eq!(records[0].about, "Tom & Jerry <3");
        assert_eq!(records[0].gender, "");
    }

    #[test]
    fn test_parse_requires_identity_fields() {
        let source = XmlFileSource::new("partial.xml");
        let err = source
            .parse("<root><row><id>1</id><age>2</age><first_name>A</first_name></row></root>")
            .unwrap_err();
        assert!(err.to_string().contains("last_name"));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DOCUMENT.as_bytes()).unwrap();

        let source = XmlFileSource::new(file.path());
        let records = source.load().await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let source = XmlFileSource::new("/nonexistent/dataset.xml");
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/dataset.xml"));
    }
}
