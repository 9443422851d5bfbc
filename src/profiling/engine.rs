//! Profiling engine: runs every analysis stage over a dataset

use std::time::Instant;

use tracing::{debug, info, info_span};

use super::config::AnalysisConfig;
use super::correlation::correlate;
#[cfg(feature = "async")]
use super::error::{AnalysisError, AnalysisResult};
use super::insights::{rank, synthesize};
use super::quality::assess;
use super::report::AnalysisReport;
use super::summary::summarize;
use crate::models::Dataset;

/// Stateless analysis engine
///
/// `analyze` is a pure function of the dataset and the configuration, so one
/// engine can be shared across threads and calls.
#[derive(Debug, Clone, Default)]
pub struct ProfilingEngine {
    config: AnalysisConfig,
}

impl ProfilingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run a full analysis pass
    pub fn analyze(&self, dataset: &Dataset) -> AnalysisReport {
        let _span = info_span!(
            "analysis_run",
            rows = dataset.row_count(),
            columns = dataset.column_count()
        )
        .entered();
        let start = Instant::now();

        let sampled;
        let data = if self.config.max_rows > 0 && dataset.row_count() > self.config.max_rows {
            sampled = dataset.strided(self.config.max_rows);
            info!(
                rows = dataset.row_count(),
                sampled_rows = sampled.row_count(),
                "Down-sampling dataset before analysis"
            );
            &sampled
        } else {
            dataset
        };

        let summaries = summarize(data, &self.config);
        debug!(columns = summaries.len(), "Summaries computed");

        let quality = assess(data, &self.config.quality);
        debug!(metrics = quality.len(), "Quality assessed");

        let correlations = correlate(data);
        debug!(pairs = correlations.len(), "Correlations computed");

        let mut insights = synthesize(
            data,
            &summaries,
            &quality,
            &correlations,
            self.config.outlier_examples,
        );
        if self.config.rank_insights {
            rank(&mut insights);
        }

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            insights = insights.len(),
            "Analysis completed"
        );

        AnalysisReport {
            row_count: dataset.row_count(),
            sampled_row_count: data.row_count(),
            summaries,
            quality,
            correlations,
            insights,
        }
    }

    /// Run [`analyze`](Self::analyze) on the blocking thread pool
    #[cfg(feature = "async")]
    pub async fn analyze_async(&self, dataset: Dataset) -> AnalysisResult<AnalysisReport> {
        let engine = self.clone();
        tokio::task::spawn_blocking(move || engine.analyze(&dataset))
            .await
            .map_err(|e| AnalysisError::Task(e.to_string()))
    }
}
