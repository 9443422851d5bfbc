//! Configuration for ingestion and schema inference

use serde::{Deserialize, Serialize};

/// Default upload ceiling: 50 MiB
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Configuration for ingestion and schema inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IngestConfig {
    /// Files larger than this many bytes are rejected (0 = no limit)
    pub max_file_size: u64,

    /// Number of leading rows used for type inference (0 = all)
    pub sample_size: usize,

    /// Number of rows returned as a preview
    pub preview_rows: usize,

    /// Maximum number of sample values kept per column
    pub max_samples: usize,

    /// Cell contents treated as missing in addition to empty strings
    pub null_tokens: Vec<String>,

    /// Enable semantic format detection on string columns
    pub detect_formats: bool,

    /// Share of sampled values that must match a format (0.0 - 1.0)
    pub format_confidence_threshold: f64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            sample_size: 100,
            preview_rows: 10,
            max_samples: 5,
            null_tokens: Vec::new(),
            detect_formats: true,
            format_confidence_threshold: 0.9,
        }
    }
}

impl IngestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> IngestConfigBuilder {
        IngestConfigBuilder::default()
    }

    /// Whether a trimmed cell should be read as missing
    pub fn is_null_token(&self, cell: &str) -> bool {
        let cell = cell.trim();
        cell.is_empty() || self.null_tokens.iter().any(|t| t == cell)
    }
}

/// Builder for IngestConfig
#[derive(Debug, Default)]
pub struct IngestConfigBuilder {
    config: IngestConfig,
}

impl IngestConfigBuilder {
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    pub fn sample_size(mut self, size: usize) -> Self {
        self.config.sample_size = size;
        self
    }

    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.config.preview_rows = rows;
        self
    }

    pub fn max_samples(mut self, max: usize) -> Self {
        self.config.max_samples = max;
        self
    }

    pub fn null_token(mut self, token: impl Into<String>) -> Self {
        self.config.null_tokens.push(token.into());
        self
    }

    pub fn detect_formats(mut self, detect: bool) -> Self {
        self.config.detect_formats = detect;
        self
    }

    pub fn format_confidence_threshold(mut self, threshold: f64) -> Self {
        self.config.format_confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn build(self) -> IngestConfig {
        self.config
    }
}
