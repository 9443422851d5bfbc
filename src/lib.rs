//! Data Profiling SDK - schema inference, profiling and insights for tabular files
//!
//! Provides:
//! - Ingestion of csv, tsv, text, JSON and JSON lines uploads
//! - Schema inference with typed cells
//! - Per-column statistical summaries
//! - Data quality scoring
//! - Pairwise correlation of numeric columns
//! - Rule-based insights ranked by impact
//!
//! ```rust
//! use data_profiling_sdk::{Ingestor, ProfilingEngine};
//!
//! let file = Ingestor::new()
//!     .ingest_bytes("flags.json", br#"[{"ok": "true"}, {"ok": "false"}]"#, None)
//!     .unwrap();
//! let report = ProfilingEngine::new().analyze(&file.dataset);
//!
//! assert_eq!(report.summaries[0].column, "ok");
//! ```

pub mod config;
pub mod ingest;
pub mod models;
pub mod profiling;

pub use config::{ConfigError, ProfilerConfig};
pub use ingest::{
    BatchOutcome, DataFormat, FileError, FileUpload, IngestConfig, IngestError, IngestedFile,
    Ingestor, SchemaInferrer,
};
pub use models::{Column, ColumnType, Dataset, Row, Schema, Value};
pub use profiling::{
    AnalysisConfig, AnalysisError, AnalysisReport, Correlation, DataQualityMetric, Impact,
    Insight, InsightType, ProfilingEngine, QualityStatus, StatisticalSummary,
};
