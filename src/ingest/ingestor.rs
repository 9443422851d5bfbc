//! Ingestion boundary: raw uploads in, typed datasets out

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, info_span, warn};

use super::config::IngestConfig;
use super::error::{FileError, IngestError};
use super::external::ExternalParser;
use super::inferrer::SchemaInferrer;
use super::parser::{self, RawTable};
use super::source::DataFormat;
use crate::models::{Dataset, Schema};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// A raw upload awaiting ingestion
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content: Vec<u8>,
    pub mime: Option<String>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
            mime: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

/// A successfully ingested file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestedFile {
    pub file_name: String,
    pub format: DataFormat,
    pub dataset: Dataset,
    /// Leading rows rendered as JSON objects
    pub preview_rows: Vec<serde_json::Value>,
    /// SHA-256 of the raw bytes
    pub content_hash: String,
}

impl IngestedFile {
    pub fn schema(&self) -> &Schema {
        &self.dataset.schema
    }
}

/// Result of ingesting several files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub files: Vec<IngestedFile>,
    pub errors: Vec<FileError>,
    /// Files skipped because identical content was already ingested
    pub skipped: usize,
}

/// Turns uploads into typed datasets
#[derive(Clone, Default)]
pub struct Ingestor {
    config: IngestConfig,
    external: HashMap<DataFormat, Arc<dyn ExternalParser>>,
}

impl fmt::Debug for Ingestor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ingestor")
            .field("config", &self.config)
            .field("external", &self.external.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Ingestor {
    pub fn new() -> Self {
        Self::with_config(IngestConfig::default())
    }

    pub fn with_config(config: IngestConfig) -> Self {
        Self {
            config,
            external: HashMap::new(),
        }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Register a decoder for a binary format
    pub fn register_parser(
        mut self,
        format: DataFormat,
        parser: impl ExternalParser + 'static,
    ) -> Self {
        self.external.insert(format, Arc::new(parser));
        self
    }

    /// Ingest raw bytes, detecting the format from the name and MIME type
    pub fn ingest_bytes(
        &self,
        file_name: &str,
        bytes: &[u8],
        mime: Option<&str>,
    ) -> Result<IngestedFile, IngestError> {
        let format = DataFormat::detect(file_name, mime)?;
        self.ingest_as(file_name, bytes, format)
    }

    /// Ingest text content with an explicit format
    pub fn ingest_str(
        &self,
        file_name: &str,
        content: &str,
        format: DataFormat,
    ) -> Result<IngestedFile, IngestError> {
        self.ingest_as(file_name, content.as_bytes(), format)
    }

    /// Ingest raw bytes in a known format
    pub fn ingest_as(
        &self,
        file_name: &str,
        bytes: &[u8],
        format: DataFormat,
    ) -> Result<IngestedFile, IngestError> {
        let _span = info_span!("ingest", file = %file_name, %format, bytes = bytes.len()).entered();

        self.check_size(file_name, bytes.len() as u64)?;

        let table = if format.is_binary() {
            self.parse_external(file_name, format, bytes)?
        } else {
            let content = decode_utf8(file_name, bytes)?;
            self.parse_text(file_name, format, content)?
        };

        let inferrer = SchemaInferrer::with_config(self.config.clone());
        let mut dataset = inferrer.build_dataset(table);
        if !format.is_binary() {
            dataset.schema.encoding = Some("utf-8".to_string());
        }

        let preview_rows = dataset
            .rows
            .iter()
            .take(self.config.preview_rows)
            .map(|row| dataset.row_to_json(row))
            .collect();

        info!(
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "File ingested"
        );

        Ok(IngestedFile {
            file_name: file_name.to_string(),
            format,
            dataset,
            preview_rows,
            content_hash: content_hash(bytes),
        })
    }

    /// Ingest several uploads; failures are collected, never fatal
    ///
    /// Only content that ingested successfully counts as seen, so a repeated
    /// upload of a failing file reports its own error.
    pub fn ingest_batch(&self, uploads: &[FileUpload]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        let mut ingested = HashSet::new();

        for upload in uploads {
            if ingested.contains(&content_hash(&upload.content)) {
                debug!(file = %upload.file_name, "Skipping duplicate content");
                outcome.skipped += 1;
                continue;
            }

            match self.ingest_bytes(&upload.file_name, &upload.content, upload.mime.as_deref()) {
                Ok(file) => {
                    ingested.insert(file.content_hash.clone());
                    outcome.files.push(file);
                }
                Err(e) => {
                    warn!(file = %upload.file_name, error = %e, "Ingestion failed");
                    outcome.errors.push(e.to_file_error());
                }
            }
        }

        info!(
            ingested = outcome.files.len(),
            failed = outcome.errors.len(),
            skipped = outcome.skipped,
            "Batch ingestion finished"
        );

        outcome
    }

    /// Read and ingest a local file
    #[cfg(feature = "native-fs")]
    pub fn ingest_path(&self, path: &std::path::Path) -> Result<IngestedFile, IngestError> {
        let file_name = file_name_of(path);
        let metadata = std::fs::metadata(path).map_err(|e| io_error(&file_name, e))?;
        self.check_size(&file_name, metadata.len())?;
        let bytes = std::fs::read(path).map_err(|e| io_error(&file_name, e))?;

        self.ingest_bytes(&file_name, &bytes, None)
    }

    /// Ingest every local file matching `pattern` under `base_path`
    ///
    /// Files over the size ceiling are reported without being read.
    #[cfg(feature = "native-fs")]
    pub fn ingest_local(
        &self,
        base_path: &std::path::Path,
        pattern: &str,
    ) -> Result<BatchOutcome, IngestError> {
        let mut uploads = Vec::new();
        let mut rejected = Vec::new();

        for found in discover_local_files(base_path, pattern)? {
            let file_name = found.file_name();
            let content = self
                .check_size(&file_name, found.size)
                .and_then(|()| std::fs::read(&found.path).map_err(|e| io_error(&file_name, e)));
            match content {
                Ok(content) => uploads.push(FileUpload::new(file_name, content)),
                Err(e) => {
                    warn!(file = %file_name, error = %e, "Local file rejected");
                    rejected.push(e.to_file_error());
                }
            }
        }

        let mut outcome = self.ingest_batch(&uploads);
        outcome.errors.extend(rejected);
        Ok(outcome)
    }

    fn check_size(&self, file_name: &str, size: u64) -> Result<(), IngestError> {
        let limit = self.config.max_file_size;
        if limit > 0 && size > limit {
            return Err(IngestError::TooLarge {
                file_name: file_name.to_string(),
                size,
                limit,
            });
        }
        Ok(())
    }

    fn parse_text(
        &self,
        file_name: &str,
        format: DataFormat,
        content: &str,
    ) -> Result<RawTable, IngestError> {
        match format {
            DataFormat::Csv | DataFormat::Tsv => {
                let delimiter = format.delimiter().unwrap_or(b',');
                parser::parse_delimited(file_name, content, delimiter, &self.config)
            }
            DataFormat::Text => parser::parse_lines(file_name, content, &self.config),
            DataFormat::JsonLines => parser::parse_json_lines(file_name, content, &self.config),
            DataFormat::Json => parser::parse_json(file_name, content, &self.config),
            DataFormat::Spreadsheet | DataFormat::Columnar => Err(IngestError::ParserUnavailable {
                file_name: file_name.to_string(),
                format,
            }),
        }
    }

    fn parse_external(
        &self,
        file_name: &str,
        format: DataFormat,
        bytes: &[u8],
    ) -> Result<RawTable, IngestError> {
        let parser = self
            .external
            .get(&format)
            .ok_or_else(|| IngestError::ParserUnavailable {
                file_name: file_name.to_string(),
                format,
            })?;

        let records = parser
            .parse(file_name, bytes)
            .map_err(|reason| IngestError::ExternalParser {
                file_name: file_name.to_string(),
                reason,
            })?;

        parser::tabulate_objects(file_name, records, &self.config)
    }
}

fn decode_utf8<'a>(file_name: &str, bytes: &'a [u8]) -> Result<&'a str, IngestError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    std::str::from_utf8(bytes).map_err(|e| IngestError::InvalidEncoding {
        file_name: file_name.to_string(),
        reason: e.to_string(),
    })
}

fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// A local file matched by [`discover_local_files`]
#[cfg(feature = "native-fs")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: std::path::PathBuf,
    /// Size in bytes at discovery time
    pub size: u64,
}

#[cfg(feature = "native-fs")]
impl DiscoveredFile {
    pub fn file_name(&self) -> String {
        file_name_of(&self.path)
    }
}

#[cfg(feature = "native-fs")]
fn file_name_of(path: &std::path::Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(feature = "native-fs")]
fn io_error(file_name: &str, e: std::io::Error) -> IngestError {
    IngestError::Io {
        file_name: file_name.to_string(),
        reason: e.to_string(),
    }
}

/// Regular files matching `pattern`, ordered by path
///
/// Relative patterns are resolved against `base_path`.
#[cfg(feature = "native-fs")]
pub fn discover_local_files(
    base_path: &std::path::Path,
    pattern: &str,
) -> Result<Vec<DiscoveredFile>, IngestError> {
    let resolved = base_path.join(pattern);
    let paths = glob::glob(&resolved.to_string_lossy())
        .map_err(|e| IngestError::InvalidPattern(format!("{} ({})", pattern, e.msg)))?;

    let mut found: Vec<DiscoveredFile> = paths
        .filter_map(|entry| {
            entry
                .map_err(|e| debug!(path = %e.path().display(), "Skipping unreadable match"))
                .ok()
        })
        .filter_map(|path| {
            let metadata = std::fs::metadata(&path).ok()?;
            metadata.is_file().then(|| DiscoveredFile {
                size: metadata.len(),
                path,
            })
        })
        .collect();

    found.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(found)
}
