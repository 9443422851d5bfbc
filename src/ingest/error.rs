//! Error types for ingestion

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::source::DataFormat;

/// Errors that can occur while turning a file into a dataset
///
/// Every variant carries the offending file name so that a batch caller can
/// report it without extra bookkeeping.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IngestError {
    /// File exceeds the configured size ceiling
    #[error("File too large: {file_name} is {size} bytes (limit {limit})")]
    TooLarge {
        file_name: String,
        size: u64,
        limit: u64,
    },

    /// Extension and MIME type are both unrecognized
    #[error("Unsupported format: {file_name} - {reason}")]
    UnsupportedFormat { file_name: String, reason: String },

    /// JSON could not be parsed
    #[error("Malformed JSON in {file_name}: {reason}")]
    MalformedJson { file_name: String, reason: String },

    /// JSON parsed but is not an object or an array of objects
    #[error("Invalid JSON structure in {file_name}: expected object at record {record}, found {found}")]
    InvalidStructure {
        file_name: String,
        record: usize,
        found: String,
    },

    /// Delimited text could not be read
    #[error("Malformed delimited text in {file_name}: {reason}")]
    MalformedDelimited { file_name: String, reason: String },

    /// Content is not valid UTF-8
    #[error("Invalid encoding in {file_name}: {reason}")]
    InvalidEncoding { file_name: String, reason: String },

    /// Nothing to ingest (no header line, no records)
    #[error("Empty input: {file_name}")]
    Empty { file_name: String },

    /// Binary format with no registered parser
    #[error("No parser registered for {format} input: {file_name}")]
    ParserUnavailable {
        file_name: String,
        format: DataFormat,
    },

    /// External parser reported a failure
    #[error("External parser failed for {file_name}: {reason}")]
    ExternalParser { file_name: String, reason: String },

    /// IO error while reading a local file
    #[error("IO error reading {file_name}: {reason}")]
    Io { file_name: String, reason: String },

    /// Invalid glob pattern
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

impl IngestError {
    /// Name of the file the error refers to
    pub fn file_name(&self) -> &str {
        match self {
            IngestError::TooLarge { file_name, .. }
            | IngestError::UnsupportedFormat { file_name, .. }
            | IngestError::MalformedJson { file_name, .. }
            | IngestError::InvalidStructure { file_name, .. }
            | IngestError::MalformedDelimited { file_name, .. }
            | IngestError::InvalidEncoding { file_name, .. }
            | IngestError::Empty { file_name }
            | IngestError::ParserUnavailable { file_name, .. }
            | IngestError::ExternalParser { file_name, .. }
            | IngestError::Io { file_name, .. } => file_name,
            IngestError::InvalidPattern(pattern) => pattern,
        }
    }

    /// Convert into the per-file error record handed to callers
    pub fn to_file_error(&self) -> FileError {
        FileError {
            file_name: self.file_name().to_string(),
            message: self.to_string(),
        }
    }

    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            IngestError::TooLarge {
                file_name, limit, ..
            } => {
                format!(
                    "{file_name} exceeds the upload limit of {limit} bytes.\n\n\
                    Hint: Split the file or raise maxFileSize in the configuration."
                )
            }
            IngestError::UnsupportedFormat { file_name, reason } => {
                format!(
                    "Cannot read {file_name}: {reason}\n\n\
                    Hint: Supported formats are csv, tsv, txt, json, jsonl."
                )
            }
            IngestError::MalformedJson { file_name, reason } => {
                format!(
                    "JSON parse error in {file_name}:\n{reason}\n\n\
                    Hint: Check the JSON syntax, or use .jsonl for one object per line."
                )
            }
            IngestError::ParserUnavailable { file_name, format } => {
                format!(
                    "{file_name} is a {format} file but no parser is registered for it.\n\n\
                    Hint: Convert the file to csv or json first."
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Per-file error record reported by batch ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileError {
    pub file_name: String,
    pub message: String,
}

impl From<IngestError> for FileError {
    fn from(err: IngestError) -> Self {
        err.to_file_error()
    }
}
