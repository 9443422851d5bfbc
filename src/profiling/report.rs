//! The result of one analysis pass

use serde::{Deserialize, Serialize};

use super::correlation::Correlation;
use super::error::AnalysisResult;
use super::insights::{Insight, InsightType, filter_by_type};
use super::quality::{DataQualityMetric, QualityStatus};
use super::summary::StatisticalSummary;

/// Summaries, quality metrics, correlations and insights for one dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Rows in the dataset handed to the engine
    pub row_count: usize,
    /// Rows actually analysed after down-sampling
    pub sampled_row_count: usize,
    pub summaries: Vec<StatisticalSummary>,
    pub quality: Vec<DataQualityMetric>,
    pub correlations: Vec<Correlation>,
    pub insights: Vec<Insight>,
}

impl AnalysisReport {
    pub fn is_sampled(&self) -> bool {
        self.sampled_row_count < self.row_count
    }

    pub fn summary(&self, column: &str) -> Option<&StatisticalSummary> {
        self.summaries.iter().find(|s| s.column == column)
    }

    pub fn metric(&self, metric: &str) -> Option<&DataQualityMetric> {
        self.quality.iter().find(|m| m.metric == metric)
    }

    /// Insights of one type; the report is left untouched
    pub fn insights_of(&self, insight_type: InsightType) -> Vec<&Insight> {
        filter_by_type(&self.insights, insight_type)
    }

    /// Worst status across the quality metrics
    pub fn overall_status(&self) -> QualityStatus {
        if self.quality.iter().any(|m| m.status == QualityStatus::Error) {
            QualityStatus::Error
        } else if self.quality.iter().any(|m| m.status == QualityStatus::Warning) {
            QualityStatus::Warning
        } else {
            QualityStatus::Good
        }
    }

    pub fn to_json_pretty(&self) -> AnalysisResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> AnalysisResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
