//! Rule-based insight synthesis
//!
//! Rules run in a fixed order over the summaries, quality metrics and
//! correlations of one analysis pass:
//!
//! 1. high variability (coefficient of variation above 1)
//! 2. missing data (more than 10% nulls in a column)
//! 3. outliers outside the IQR fences
//! 4. strong correlations
//! 5. failed quality metrics
//!
//! Insight ids are UUID v5 values derived from the rule and its subject, so
//! the same dataset always yields the same ids.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::correlation::{Correlation, Strength};
use super::quality::{DataQualityMetric, QualityStatus};
use super::summary::StatisticalSummary;
use crate::models::{ColumnType, Dataset};

/// Share of nulls above which a column is reported as incomplete
pub const MISSING_DATA_RATIO: f64 = 0.1;
/// IQR multiplier for the outlier fences
pub const OUTLIER_FENCE: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Pattern,
    Outlier,
    Trend,
    Quality,
    Correlation,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::Pattern => "pattern",
            InsightType::Outlier => "outlier",
            InsightType::Trend => "trend",
            InsightType::Quality => "quality",
            InsightType::Correlation => "correlation",
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pattern" => Ok(InsightType::Pattern),
            "outlier" => Ok(InsightType::Outlier),
            "trend" => Ok(InsightType::Trend),
            "quality" => Ok(InsightType::Quality),
            "correlation" => Ok(InsightType::Correlation),
            other => Err(format!("Unknown insight type: {}", other)),
        }
    }
}

/// Business impact of an insight; ordered `Low < Medium < High`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
    High,
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Impact::Low => "low",
            Impact::Medium => "medium",
            Impact::High => "high",
        })
    }
}

/// A synthesized observation about the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub title: String,
    pub description: String,
    /// In `[0, 1]`
    pub confidence: f64,
    pub impact: Impact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Insight {
    fn new(
        rule: &str,
        subject: &str,
        insight_type: InsightType,
        title: String,
        description: String,
        confidence: f64,
        impact: Impact,
    ) -> Self {
        Self {
            id: generate_id(rule, subject),
            insight_type,
            title,
            description,
            confidence,
            impact,
            recommendation: None,
            data: None,
        }
    }

    fn with_recommendation(mut self, recommendation: Option<String>) -> Self {
        self.recommendation = recommendation;
        self
    }

    fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Deterministic id for an insight produced by `rule` about `subject`
pub fn generate_id(rule: &str, subject: &str) -> Uuid {
    let key = format!("insight:{}:{}", rule, subject);
    Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes())
}

/// Tukey fences around the interquartile range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierFences {
    pub lower: f64,
    pub upper: f64,
}

impl OutlierFences {
    pub fn from_quartiles(q1: f64, q3: f64) -> Self {
        let iqr = q3 - q1;
        Self {
            lower: q1 - OUTLIER_FENCE * iqr,
            upper: q3 + OUTLIER_FENCE * iqr,
        }
    }

    pub fn from_summary(summary: &StatisticalSummary) -> Option<Self> {
        Some(Self::from_quartiles(summary.q1?, summary.q3?))
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Run every rule in order
///
/// Returns insights in rule order; see [`rank`] for impact ordering.
pub fn synthesize(
    dataset: &Dataset,
    summaries: &[StatisticalSummary],
    quality: &[DataQualityMetric],
    correlations: &[Correlation],
    outlier_examples: usize,
) -> Vec<Insight> {
    let mut insights = Vec::new();
    insights.extend(summaries.iter().filter_map(high_variability));
    insights.extend(summaries.iter().filter_map(missing_data));
    insights.extend(
        summaries
            .iter()
            .filter_map(|summary| outliers(dataset, summary, outlier_examples)),
    );
    insights.extend(correlations.iter().filter_map(strong_correlation));
    insights.extend(quality.iter().filter_map(quality_failure));
    insights
}

fn high_variability(summary: &StatisticalSummary) -> Option<Insight> {
    if summary.column_type != ColumnType::Number {
        return None;
    }
    let cv = summary.coefficient_of_variation()?;
    if cv <= 1.0 {
        return None;
    }

    Some(
        Insight::new(
            "variability",
            &summary.column,
            InsightType::Pattern,
            format!("High variability in {}", summary.column),
            format!(
                "Values in {} vary widely relative to their mean (coefficient of variation {:.2})",
                summary.column, cv
            ),
            0.8,
            Impact::Medium,
        )
        .with_data(json!({
            "column": summary.column,
            "mean": summary.mean,
            "stdDev": summary.std_dev,
            "coefficientOfVariation": cv,
        })),
    )
}

fn missing_data(summary: &StatisticalSummary) -> Option<Insight> {
    if summary.null_count as f64 <= MISSING_DATA_RATIO * summary.count as f64 {
        return None;
    }
    let percentage = summary.null_count as f64 / summary.count as f64 * 100.0;

    Some(
        Insight::new(
            "missing",
            &summary.column,
            InsightType::Quality,
            format!("Missing data in {}", summary.column),
            format!(
                "{} of {} values ({:.1}%) in {} are missing",
                summary.null_count, summary.count, percentage, summary.column
            ),
            1.0,
            Impact::High,
        )
        .with_recommendation(Some(format!(
            "Impute or backfill missing values in {}, or exclude it from analysis",
            summary.column
        )))
        .with_data(json!({
            "column": summary.column,
            "nullCount": summary.null_count,
            "count": summary.count,
            "percentage": percentage,
        })),
    )
}

fn outliers(dataset: &Dataset, summary: &StatisticalSummary, examples: usize) -> Option<Insight> {
    if summary.column_type != ColumnType::Number {
        return None;
    }
    let fences = OutlierFences::from_summary(summary)?;
    let index = dataset.schema.index_of(&summary.column)?;

    let flagged: Vec<_> = dataset
        .rows
        .iter()
        .filter(|row| {
            row.get(index)
                .as_f64()
                .is_some_and(|value| !fences.contains(value))
        })
        .collect();
    if flagged.is_empty() {
        return None;
    }

    let rows: Vec<_> = flagged
        .iter()
        .take(examples)
        .map(|row| dataset.row_to_json(row))
        .collect();

    Some(
        Insight::new(
            "outliers",
            &summary.column,
            InsightType::Outlier,
            format!("Outliers detected in {}", summary.column),
            format!(
                "{} value(s) in {} fall outside [{}, {}]",
                flagged.len(),
                summary.column,
                fences.lower,
                fences.upper
            ),
            0.7,
            Impact::Medium,
        )
        .with_recommendation(Some(format!(
            "Check whether the extreme values in {} are entry errors or genuine events",
            summary.column
        )))
        .with_data(json!({
            "column": summary.column,
            "lowerBound": fences.lower,
            "upperBound": fences.upper,
            "count": flagged.len(),
            "rows": rows,
        })),
    )
}

fn strong_correlation(correlation: &Correlation) -> Option<Insight> {
    if correlation.strength != Strength::Strong {
        return None;
    }
    // JSON pair; column names may contain any separator
    let subject = json!([correlation.column1, correlation.column2]).to_string();

    Some(
        Insight::new(
            "correlation",
            &subject,
            InsightType::Correlation,
            format!(
                "Strong correlation between {} and {}",
                correlation.column1, correlation.column2
            ),
            format!(
                "{} and {} have a strong {} correlation (r = {:.2})",
                correlation.column1,
                correlation.column2,
                correlation.direction,
                correlation.coefficient
            ),
            0.9,
            Impact::High,
        )
        .with_data(json!({
            "column1": correlation.column1,
            "column2": correlation.column2,
            "coefficient": correlation.coefficient,
            "direction": correlation.direction,
        })),
    )
}

fn quality_failure(metric: &DataQualityMetric) -> Option<Insight> {
    if metric.status != QualityStatus::Error {
        return None;
    }

    Some(
        Insight::new(
            "quality",
            &metric.metric,
            InsightType::Quality,
            format!("{} issue", metric.metric),
            format!("{} is {:.1}%: {}", metric.metric, metric.value, metric.description),
            1.0,
            Impact::High,
        )
        .with_recommendation(metric.recommendation.clone()),
    )
}

/// Stable sort by descending impact, then descending confidence
pub fn rank(insights: &mut [Insight]) {
    insights.sort_by(|a, b| {
        b.impact
            .cmp(&a.impact)
            .then_with(|| b.confidence.total_cmp(&a.confidence))
    });
}

/// Insights of one type, in their current order
pub fn filter_by_type(insights: &[Insight], insight_type: InsightType) -> Vec<&Insight> {
    insights
        .iter()
        .filter(|insight| insight.insight_type == insight_type)
        .collect()
}
