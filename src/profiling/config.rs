//! Configuration for the profiling engine

use serde::{Deserialize, Serialize};

/// How quartiles and the median are picked from sorted values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuantileMethod {
    /// `sorted[floor(p * n)]`, no interpolation
    #[default]
    NearestRank,
    /// Linear interpolation between closest ranks
    Linear,
}

/// Divisor used for the variance behind `stdDev`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceKind {
    /// Divide by `n`
    #[default]
    Population,
    /// Divide by `n - 1`
    Sample,
}

/// Status boundaries for quality metrics, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QualityThresholds {
    /// Values at or above this are `good`
    pub good: f64,
    /// Values at or above this (and below `good`) are `warning`
    pub warning: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            good: 95.0,
            warning: 80.0,
        }
    }
}

/// Configuration for an analysis pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfig {
    /// Datasets larger than this are down-sampled by fixed stride (0 = no cap)
    pub max_rows: usize,

    pub quantile_method: QuantileMethod,

    pub variance: VarianceKind,

    /// Number of entries kept in a value distribution
    pub distribution_limit: usize,

    /// Non-string columns get a distribution only up to this many distinct values
    pub distribution_unique_threshold: usize,

    /// Example rows attached to an outlier insight
    pub outlier_examples: usize,

    pub quality: QualityThresholds,

    /// Sort insights by impact, then confidence
    pub rank_insights: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_rows: 100_000,
            quantile_method: QuantileMethod::NearestRank,
            variance: VarianceKind::Population,
            distribution_limit: 10,
            distribution_unique_threshold: 20,
            outlier_examples: 5,
            quality: QualityThresholds::default(),
            rank_insights: true,
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }
}

/// Builder for AnalysisConfig
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn max_rows(mut self, rows: usize) -> Self {
        self.config.max_rows = rows;
        self
    }

    pub fn quantile_method(mut self, method: QuantileMethod) -> Self {
        self.config.quantile_method = method;
        self
    }

    pub fn variance(mut self, variance: VarianceKind) -> Self {
        self.config.variance = variance;
        self
    }

    pub fn distribution_limit(mut self, limit: usize) -> Self {
        self.config.distribution_limit = limit;
        self
    }

    pub fn distribution_unique_threshold(mut self, threshold: usize) -> Self {
        self.config.distribution_unique_threshold = threshold;
        self
    }

    pub fn outlier_examples(mut self, examples: usize) -> Self {
        self.config.outlier_examples = examples;
        self
    }

    pub fn quality_thresholds(mut self, good: f64, warning: f64) -> Self {
        let good = good.clamp(0.0, 100.0);
        self.config.quality = QualityThresholds {
            good,
            warning: warning.clamp(0.0, good),
        };
        self
    }

    pub fn rank_insights(mut self, rank: bool) -> Self {
        self.config.rank_insights = rank;
        self
    }

    pub fn build(self) -> AnalysisConfig {
        self.config
    }
}
