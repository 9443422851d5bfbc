//! Data quality metrics: completeness, uniqueness and consistency

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::config::QualityThresholds;
use crate::models::{ColumnType, Dataset, Value};

pub const COMPLETENESS: &str = "Completeness";
pub const UNIQUENESS: &str = "Uniqueness";
pub const CONSISTENCY: &str = "Consistency";

/// Classification of a metric value against the thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityStatus {
    Good,
    Warning,
    Error,
}

impl QualityStatus {
    pub fn classify(value: f64, thresholds: &QualityThresholds) -> Self {
        if value >= thresholds.good {
            QualityStatus::Good
        } else if value >= thresholds.warning {
            QualityStatus::Warning
        } else {
            QualityStatus::Error
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityStatus::Good => "good",
            QualityStatus::Warning => "warning",
            QualityStatus::Error => "error",
        }
    }
}

impl fmt::Display for QualityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One evaluated quality dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityMetric {
    pub metric: String,
    /// Percentage in `[0, 100]`
    pub value: f64,
    pub status: QualityStatus,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl DataQualityMetric {
    fn new(
        metric: &str,
        value: f64,
        thresholds: &QualityThresholds,
        description: String,
        recommendation: &str,
    ) -> Self {
        let status = QualityStatus::classify(value, thresholds);
        Self {
            metric: metric.to_string(),
            value,
            status,
            description,
            recommendation: (status != QualityStatus::Good).then(|| recommendation.to_string()),
        }
    }
}

/// Evaluate every applicable quality dimension
///
/// Completeness is always present. Uniqueness and consistency are omitted
/// when no column qualifies.
pub fn assess(dataset: &Dataset, thresholds: &QualityThresholds) -> Vec<DataQualityMetric> {
    let mut metrics = vec![completeness(dataset, thresholds)];
    metrics.extend(uniqueness(dataset, thresholds));
    metrics.extend(consistency(dataset, thresholds));
    metrics
}

pub fn completeness(dataset: &Dataset, thresholds: &QualityThresholds) -> DataQualityMetric {
    let total = dataset.row_count() * dataset.column_count();
    let nulls: usize = (0..dataset.column_count())
        .map(|i| dataset.column_values(i).filter(|v| v.is_null()).count())
        .sum();

    let value = if total == 0 {
        100.0
    } else {
        (total - nulls) as f64 / total as f64 * 100.0
    };

    DataQualityMetric::new(
        COMPLETENESS,
        value,
        thresholds,
        format!("{} of {} cells are populated", total - nulls, total),
        "Fill in or impute missing values, or drop incomplete rows",
    )
}

pub fn uniqueness(dataset: &Dataset, thresholds: &QualityThresholds) -> Option<DataQualityMetric> {
    let scores: Vec<f64> = dataset
        .schema
        .columns
        .iter()
        .enumerate()
        .filter(|(_, column)| column.unique)
        .filter_map(|(i, _)| {
            let non_null: Vec<&Value> = dataset.column_values(i).filter(|v| !v.is_null()).collect();
            if non_null.is_empty() {
                return None;
            }
            let distinct: HashSet<_> = non_null.iter().map(|v| v.key()).collect();
            Some(distinct.len() as f64 / non_null.len() as f64 * 100.0)
        })
        .collect();

    let value = mean(&scores)?;
    Some(DataQualityMetric::new(
        UNIQUENESS,
        value,
        thresholds,
        format!("Average distinctness across {} key column(s)", scores.len()),
        "Remove duplicate records in columns expected to be unique",
    ))
}

pub fn consistency(dataset: &Dataset, thresholds: &QualityThresholds) -> Option<DataQualityMetric> {
    let scores: Vec<f64> = dataset
        .schema
        .columns
        .iter()
        .enumerate()
        .filter(|(_, column)| column.column_type == ColumnType::Number)
        .filter_map(|(i, _)| {
            let (castable, non_null) = dataset
                .column_values(i)
                .filter(|v| !v.is_null())
                .fold((0usize, 0usize), |(ok, all), v| {
                    (ok + usize::from(v.as_f64().is_some()), all + 1)
                });
            (non_null > 0).then(|| castable as f64 / non_null as f64 * 100.0)
        })
        .collect();

    let value = mean(&scores)?;
    Some(DataQualityMetric::new(
        CONSISTENCY,
        value,
        thresholds,
        format!("Share of valid numbers across {} numeric column(s)", scores.len()),
        "Standardize numeric formats and fix values that are not numbers",
    ))
}

fn mean(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Column, Row, Schema};

    fn thresholds() -> QualityThresholds {
        QualityThresholds::default()
    }

    #[test]
    fn test_classify() {
        assert_eq!(QualityStatus::classify(95.0, &thresholds()), QualityStatus::Good);
        assert_eq!(QualityStatus::classify(80.0, &thresholds()), QualityStatus::Warning);
        assert_eq!(QualityStatus::classify(79.9, &thresholds()), QualityStatus::Error);
    }

    #[test]
    fn test_completeness_counts_all_cells() {
        let schema = Schema::new(
            vec![
                Column::new("a", ColumnType::Number),
                Column::new("b", ColumnType::String),
            ],
            0,
        );
        let rows = vec![
            Row::new(vec![Value::Number(1.0), Value::Null]),
            Row::new(vec![Value::Number(2.0), Value::Text("x".to_string())]),
        ];
        let metric = completeness(&Dataset::new(schema, rows), &thresholds());

        assert_eq!(metric.value, 75.0);
        assert_eq!(metric.status, QualityStatus::Error);
        assert!(metric.recommendation.is_some());
    }

    #[test]
    fn test_completeness_of_empty_dataset() {
        let schema = Schema::new(vec![Column::new("a", ColumnType::String)], 0);
        let metric = completeness(&Dataset::new(schema, vec![]), &thresholds());
        assert_eq!(metric.value, 100.0);
        assert_eq!(metric.status, QualityStatus::Good);
        assert!(metric.recommendation.is_none());
    }

    #[test]
    fn test_optional_metrics_omitted() {
        let schema = Schema::new(vec![Column::new("a", ColumnType::String)], 0);
        let rows = vec![Row::new(vec![Value::Text("x".to_string())])];
        let metrics = assess(&Dataset::new(schema, rows), &thresholds());
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].metric, COMPLETENESS);
    }

    #[test]
    fn test_uniqueness_over_unique_columns() {
        let schema = Schema::new(
            vec![
                Column::new("id", ColumnType::String).with_unique(true),
                Column::new("empty", ColumnType::String).with_unique(true),
            ],
            0,
        );
        let rows = vec![
            Row::new(vec![Value::Text("a".to_string()), Value::Null]),
            Row::new(vec![Value::Text("a".to_string()), Value::Null]),
        ];
        let metric = uniqueness(&Dataset::new(schema, rows), &thresholds()).unwrap();
        // The all-null column is skipped
        assert_eq!(metric.value, 50.0);
    }

    #[test]
    fn test_consistency_counts_castable_numbers() {
        let schema = Schema::new(vec![Column::new("n", ColumnType::Number)], 0);
        let rows = vec![
            Row::new(vec![Value::Number(1.0)]),
            Row::new(vec![Value::Number(2.0)]),
            Row::new(vec![Value::Number(3.0)]),
            Row::new(vec![Value::Text("oops".to_string())]),
            Row::new(vec![Value::Null]),
        ];
        let metric = consistency(&Dataset::new(schema, rows), &thresholds()).unwrap();
        assert_eq!(metric.value, 75.0);
        assert_eq!(metric.status, QualityStatus::Error);
    }
}
