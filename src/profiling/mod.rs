//! Profiling and insight generation
//!
//! Computes facts about a typed [`Dataset`](crate::models::Dataset):
//!
//! - **Statistical summaries** - counts, central tendency, spread, quartiles
//!   and value distributions per column
//! - **Quality metrics** - completeness, uniqueness and consistency
//! - **Correlations** - Pearson coefficients between numeric columns
//! - **Insights** - rule-based observations ranked by impact
//!
//! ## Example
//!
//! ```rust
//! use data_profiling_sdk::ingest::Ingestor;
//! use data_profiling_sdk::profiling::{InsightType, ProfilingEngine};
//!
//! let file = Ingestor::new()
//!     .ingest_bytes("xy.csv", b"x,y\n1,2\n2,4\n3,6\n4,8\n5,10\n", None)
//!     .unwrap();
//! let report = ProfilingEngine::new().analyze(&file.dataset);
//!
//! assert_eq!(report.insights_of(InsightType::Correlation).len(), 1);
//! ```

mod config;
pub mod correlation;
mod engine;
mod error;
pub mod insights;
pub mod quality;
mod report;
pub mod summary;

pub use config::{AnalysisConfig, AnalysisConfigBuilder, QualityThresholds, QuantileMethod, VarianceKind};
pub use correlation::{Correlation, Direction, Strength, correlate, correlation_between, pearson};
pub use engine::ProfilingEngine;
pub use error::{AnalysisError, AnalysisResult};
pub use insights::{Impact, Insight, InsightType, OutlierFences, filter_by_type, rank};
pub use quality::{DataQualityMetric, QualityStatus, assess};
pub use report::AnalysisReport;
pub use summary::{DistributionEntry, StatisticalSummary, quantile, summarize};
