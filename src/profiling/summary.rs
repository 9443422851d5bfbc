//! Per-column statistical summaries

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::config::{AnalysisConfig, QuantileMethod, VarianceKind};
use crate::models::{ColumnType, Dataset, Value};

/// One entry of a value-frequency distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionEntry {
    pub value: Value,
    pub count: usize,
    /// Share of non-null values, in percent
    pub percentage: f64,
}

/// Statistical summary of one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticalSummary {
    pub column: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Number of rows
    pub count: usize,
    pub null_count: usize,
    /// Distinct non-null values
    pub unique_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q3: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<Vec<DistributionEntry>>,
}

impl StatisticalSummary {
    pub fn non_null_count(&self) -> usize {
        self.count - self.null_count
    }

    /// Interquartile range, when both quartiles are known
    pub fn iqr(&self) -> Option<f64> {
        Some(self.q3? - self.q1?)
    }

    /// Coefficient of variation (`stdDev / mean`), undefined for a zero mean
    pub fn coefficient_of_variation(&self) -> Option<f64> {
        let mean = self.mean?;
        if mean == 0.0 {
            return None;
        }
        Some(self.std_dev? / mean)
    }
}

/// Numeric statistics over the valid values of a column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericStats {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
}

impl NumericStats {
    /// Compute statistics; `None` when there are no values
    pub fn compute(mut values: Vec<f64>, config: &AnalysisConfig) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);

        let n = values.len() as f64;
        let min = values[0];
        let max = values[values.len() - 1];
        // Summation error can push the mean a hair past the extremes
        let mean = (values.iter().sum::<f64>() / n).clamp(min, max);

        let squared: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        let divisor = match config.variance {
            VarianceKind::Population => n,
            VarianceKind::Sample => n - 1.0,
        };
        let std_dev = if divisor > 0.0 {
            (squared / divisor).sqrt()
        } else {
            0.0
        };

        let method = config.quantile_method;
        Some(Self {
            mean,
            median: quantile(&values, 0.5, method),
            std_dev,
            min,
            max,
            q1: quantile(&values, 0.25, method),
            q3: quantile(&values, 0.75, method),
        })
    }
}

/// Pick the `p` quantile from ascending, non-empty values
pub fn quantile(sorted: &[f64], p: f64, method: QuantileMethod) -> f64 {
    let last = sorted.len() - 1;
    match method {
        QuantileMethod::NearestRank => {
            let index = (p * sorted.len() as f64).floor() as usize;
            sorted[index.min(last)]
        }
        QuantileMethod::Linear => {
            let rank = p * last as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let weight = rank - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * weight
        }
    }
}

/// Most frequent value; ties go to the first value to reach the top count
pub fn mode<'a>(values: impl IntoIterator<Item = &'a Value>) -> Option<Value> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut best: Option<&Value> = None;
    let mut best_count = 0;

    for value in values {
        let count = counts.entry(value.key().into_owned()).or_insert(0);
        *count += 1;
        if *count > best_count {
            best_count = *count;
            best = Some(value);
        }
    }

    best.cloned()
}

/// Value frequencies in first-seen order
fn frequencies<'a>(values: &[&'a Value]) -> Vec<(&'a Value, usize)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(&Value, usize)> = Vec::new();

    for &value in values {
        match index.get(value.key().as_ref()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value.key().into_owned(), counts.len());
                counts.push((value, 1));
            }
        }
    }

    counts
}

/// Summarize a single column
pub fn summarize_column(dataset: &Dataset, index: usize, config: &AnalysisConfig) -> StatisticalSummary {
    let column = &dataset.schema.columns[index];
    let non_null: Vec<&Value> = dataset.column_values(index).filter(|v| !v.is_null()).collect();

    let counts = frequencies(&non_null);
    let unique_count = counts.len();

    let numeric = if column.column_type == ColumnType::Number {
        NumericStats::compute(non_null.iter().filter_map(|v| v.as_f64()).collect(), config)
    } else {
        None
    };

    let distribution = (column.column_type == ColumnType::String
        || unique_count <= config.distribution_unique_threshold)
        .then(|| top_values(counts, non_null.len(), config.distribution_limit));

    StatisticalSummary {
        column: column.name.clone(),
        column_type: column.column_type,
        count: dataset.row_count(),
        null_count: dataset.row_count() - non_null.len(),
        unique_count,
        mean: numeric.map(|s| s.mean),
        median: numeric.map(|s| s.median),
        mode: mode(non_null.iter().copied()),
        std_dev: numeric.map(|s| s.std_dev),
        min: numeric.map(|s| s.min),
        max: numeric.map(|s| s.max),
        q1: numeric.map(|s| s.q1),
        q3: numeric.map(|s| s.q3),
        distribution,
    }
}

fn top_values(
    mut counts: Vec<(&Value, usize)>,
    total: usize,
    limit: usize,
) -> Vec<DistributionEntry> {
    // Stable: equal counts keep first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(limit)
        .map(|(value, count)| DistributionEntry {
            value: value.clone(),
            count,
            percentage: count as f64 / total as f64 * 100.0,
        })
        .collect()
}

/// Summarize every column, in schema order
pub fn summarize(dataset: &Dataset, config: &AnalysisConfig) -> Vec<StatisticalSummary> {
    (0..dataset.column_count())
        .map(|index| summarize_column(dataset, index, config))
        .collect()
}
