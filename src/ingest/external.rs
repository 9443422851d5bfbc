//! Seam for parsers of binary formats (spreadsheets, columnar files)
//!
//! The SDK recognizes these formats but does not decode them. Callers that
//! have a decoder register it on the [`Ingestor`](super::Ingestor); its
//! records then go through the same inference path as JSON objects.

use serde_json::{Map, Value as JsonValue};

/// A record produced by an external parser: column name to raw value
pub type ExternalRecord = Map<String, JsonValue>;

/// Decoder for a binary input format
pub trait ExternalParser: Send + Sync {
    /// Decode `bytes` into records, or return a human readable failure reason
    fn parse(&self, file_name: &str, bytes: &[u8]) -> Result<Vec<ExternalRecord>, String>;
}

impl<F> ExternalParser for F
where
    F: Fn(&str, &[u8]) -> Result<Vec<ExternalRecord>, String> + Send + Sync,
{
    fn parse(&self, file_name: &str, bytes: &[u8]) -> Result<Vec<ExternalRecord>, String> {
        self(file_name, bytes)
    }
}
