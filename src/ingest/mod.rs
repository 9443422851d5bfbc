//! Ingestion and schema inference
//!
//! Turns raw uploads into typed [`Dataset`](crate::models::Dataset)s.
//!
//! ## Features
//!
//! - **Format recognition** - by file extension, falling back to MIME type
//! - **Parsing** - delimited text (csv/tsv), line text, JSON and JSON lines
//! - **Type inference** - boolean, number, date or string per column
//! - **Format detection** - email, uuid, uri, ... hints on string columns
//! - **Batch ingestion** - per-file errors, duplicate content skipped
//!
//! ## Example
//!
//! ```rust
//! use data_profiling_sdk::ingest::Ingestor;
//! use data_profiling_sdk::models::ColumnType;
//!
//! let file = Ingestor::new()
//!     .ingest_bytes("scores.csv", b"name,score\nAlice,9.5\nBob,7\n", None)
//!     .unwrap();
//!
//! assert_eq!(file.schema().columns[1].column_type, ColumnType::Number);
//! ```

mod config;
mod error;
mod external;
mod formats;
mod inferrer;
mod ingestor;
mod parser;
mod source;

pub use config::{DEFAULT_MAX_FILE_SIZE, IngestConfig, IngestConfigBuilder};
pub use error::{FileError, IngestError};
pub use external::{ExternalParser, ExternalRecord};
pub use formats::{Format, detect_format, dominant_format, format_confidence};
pub use inferrer::{InferenceStats, SchemaInferrer, infer_type};
#[cfg(feature = "native-fs")]
pub use ingestor::{DiscoveredFile, discover_local_files};
pub use ingestor::{BatchOutcome, FileUpload, IngestedFile, Ingestor};
pub use parser::{LINE_COLUMN, RawTable};
pub use source::DataFormat;
