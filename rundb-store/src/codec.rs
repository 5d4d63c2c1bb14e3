//! Record codecs
//!
//! A store writes every record in one of two textual formats, chosen when the
//! store is opened. Each format has one `Codec` implementation.

use rundb_core::{Document, Format, Record};
use serde_json::Value;

use crate::error::{Result, StoreError};

/// Encode and decode records in one textual format
pub trait Codec: Send + Sync {
    fn format(&self) -> Format;

    fn encode(&self, record: &Record) -> Result<String>;

    fn decode(&self, text: &str) -> Result<Record>;
}

/// YAML files (`.yaml`)
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl Codec for YamlCodec {
    fn format(&self) -> Format {
        Format::Yaml
    }

    fn encode(&self, record: &Record) -> Result<String> {
        serde_yaml::to_string(record.as_value()).map_err(|e| StoreError::Encode(e.to_string()))
    }

    fn decode(&self, text: &str) -> Result<Record> {
        serde_yaml::from_str::<Value>(text)
            .map(Record::from)
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

/// Pretty-printed JSON files (`.json`)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn format(&self) -> Format {
        Format::Json
    }

    fn encode(&self, record: &Record) -> Result<String> {
        serde_json::to_string_pretty(record.as_value())
            .map_err(|e| StoreError::Encode(e.to_string()))
    }

    fn decode(&self, text: &str) -> Result<Record> {
        serde_json::from_str::<Value>(text)
            .map(Record::from)
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

/// The codec for a format
pub fn codec_for(format: Format) -> &'static dyn Codec {
    match format {
        Format::Yaml => &YamlCodec,
        Format::Json => &JsonCodec,
    }
}

/// The format a store was opened with
///
/// Parsing never fails: an unknown name is remembered and reported as
/// `StoreError::UnsupportedFormat` by the first encode or decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSelection(std::result::Result<Format, String>);

impl FormatSelection {
    pub fn parse(name: &str) -> Self {
        Self(name.parse::<Format>())
    }

    pub fn format(&self) -> Result<Format> {
        self.0.clone().map_err(StoreError::UnsupportedFormat)
    }

    pub fn codec(&self) -> Result<&'static dyn Codec> {
        self.format().map(codec_for)
    }

    /// File extension, without the dot
    pub fn extension(&self) -> Result<&'static str> {
        self.format().map(|f| f.extension())
    }

    /// Encode a document, preferring its own serializer
    pub fn dumps(&self, document: &dyn Document) -> Result<String> {
        let codec = self.codec()?;
        match document.encode_with(codec.format()) {
            Some(text) => Ok(text),
            None => codec.encode(&document.to_record()),
        }
    }

    pub fn loads(&self, text: &str) -> Result<Record> {
        self.codec()?.decode(text)
    }
}

impl From<Format> for FormatSelection {
    fn from(format: Format) -> Self {
        Self(Ok(format))
    }
}
