//! Input format recognition from file names and MIME types

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::IngestError;

/// Recognized input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataFormat {
    /// Comma-separated values
    Csv,
    /// Tab-separated values
    Tsv,
    /// Plain text, one row per line
    Text,
    /// Newline-delimited JSON objects
    JsonLines,
    /// JSON array of objects, or a single object
    Json,
    /// Excel / OpenDocument spreadsheets (external parser)
    Spreadsheet,
    /// Parquet / Avro / ORC (external parser)
    Columnar,
}

impl DataFormat {
    /// Detect the format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(DataFormat::Csv),
            "tsv" | "tab" => Some(DataFormat::Tsv),
            "txt" | "log" | "text" => Some(DataFormat::Text),
            "jsonl" | "ndjson" => Some(DataFormat::JsonLines),
            "json" => Some(DataFormat::Json),
            "xlsx" | "xls" | "ods" => Some(DataFormat::Spreadsheet),
            "parquet" | "avro" | "orc" => Some(DataFormat::Columnar),
            _ => None,
        }
    }

    /// Detect the format from a MIME type (parameters such as charset are ignored)
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "text/csv" | "application/csv" => Some(DataFormat::Csv),
            "text/tab-separated-values" => Some(DataFormat::Tsv),
            "text/plain" => Some(DataFormat::Text),
            "application/x-ndjson" | "application/jsonl" | "application/x-jsonlines" => {
                Some(DataFormat::JsonLines)
            }
            "application/json" | "text/json" => Some(DataFormat::Json),
            "application/vnd.ms-excel"
            | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            | "application/vnd.oasis.opendocument.spreadsheet" => Some(DataFormat::Spreadsheet),
            "application/vnd.apache.parquet" | "application/x-parquet" | "application/avro" => {
                Some(DataFormat::Columnar)
            }
            _ => None,
        }
    }

    /// Detect the format of an upload
    ///
    /// The file extension wins; the MIME type is consulted when the extension
    /// is missing or unknown.
    pub fn detect(file_name: &str, mime: Option<&str>) -> Result<Self, IngestError> {
        let by_extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(DataFormat::from_extension);

        by_extension
            .or_else(|| mime.and_then(DataFormat::from_mime))
            .ok_or_else(|| IngestError::UnsupportedFormat {
                file_name: file_name.to_string(),
                reason: match mime {
                    Some(m) => format!("unrecognized extension and MIME type '{m}'"),
                    None => "unrecognized extension".to_string(),
                },
            })
    }

    /// Whether the format is parsed by an external collaborator
    pub fn is_binary(&self) -> bool {
        matches!(self, DataFormat::Spreadsheet | DataFormat::Columnar)
    }

    pub fn delimiter(&self) -> Option<u8> {
        match self {
            DataFormat::Csv => Some(b','),
            DataFormat::Tsv => Some(b'\t'),
            _ => None,
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataFormat::Csv => "csv",
            DataFormat::Tsv => "tsv",
            DataFormat::Text => "text",
            DataFormat::JsonLines => "json-lines",
            DataFormat::Json => "json",
            DataFormat::Spreadsheet => "spreadsheet",
            DataFormat::Columnar => "columnar",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(DataFormat::detect("a.CSV", None).unwrap(), DataFormat::Csv);
        assert_eq!(DataFormat::detect("a.tsv", None).unwrap(), DataFormat::Tsv);
        assert_eq!(DataFormat::detect("a.ndjson", None).unwrap(), DataFormat::JsonLines);
        assert_eq!(DataFormat::detect("a.json", None).unwrap(), DataFormat::Json);
        assert_eq!(DataFormat::detect("a.xlsx", None).unwrap(), DataFormat::Spreadsheet);
        assert_eq!(DataFormat::detect("a.parquet", None).unwrap(), DataFormat::Columnar);
    }

    #[test]
    fn test_detect_falls_back_to_mime() {
        assert_eq!(
            DataFormat::detect("upload", Some("text/csv; charset=utf-8")).unwrap(),
            DataFormat::Csv
        );
        assert_eq!(
            DataFormat::detect("data.bin", Some("application/json")).unwrap(),
            DataFormat::Json
        );
    }

    #[test]
    fn test_detect_unrecognized() {
        let err = DataFormat::detect("image.png", Some("image/png")).unwrap_err();
        match err {
            IngestError::UnsupportedFormat { file_name, reason } => {
                assert_eq!(file_name, "image.png");
                assert!(reason.contains("image/png"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_binary_formats() {
        assert!(DataFormat::Spreadsheet.is_binary());
        assert!(!DataFormat::Csv.is_binary());
        assert_eq!(DataFormat::Tsv.delimiter(), Some(b'\t'));
    }
}
