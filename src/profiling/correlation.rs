//! Pairwise Pearson correlation between numeric columns

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::Dataset;

/// Pairs below this absolute coefficient are not reported
pub const MIN_REPORTED: f64 = 0.3;
pub const STRONG: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Weak,
    Moderate,
    Strong,
}

impl Strength {
    pub fn classify(coefficient: f64) -> Self {
        let r = coefficient.abs();
        if r >= STRONG {
            Strength::Strong
        } else if r >= MIN_REPORTED {
            Strength::Moderate
        } else {
            Strength::Weak
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strength::Weak => "weak",
            Strength::Moderate => "moderate",
            Strength::Strong => "strong",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    pub fn of(coefficient: f64) -> Self {
        if coefficient >= 0.0 {
            Direction::Positive
        } else {
            Direction::Negative
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Positive => "positive",
            Direction::Negative => "negative",
        })
    }
}

/// Linear correlation between two numeric columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Correlation {
    pub column1: String,
    pub column2: String,
    /// Pearson coefficient in `[-1, 1]`
    pub coefficient: f64,
    pub strength: Strength,
    pub direction: Direction,
}

impl Correlation {
    pub fn new(column1: impl Into<String>, column2: impl Into<String>, coefficient: f64) -> Self {
        Self {
            column1: column1.into(),
            column2: column2.into(),
            coefficient,
            strength: Strength::classify(coefficient),
            direction: Direction::of(coefficient),
        }
    }

    pub fn is_meaningful(&self) -> bool {
        self.coefficient.abs() >= MIN_REPORTED
    }
}

/// Pearson's r from mean-centred sums
///
/// Returns `None` for fewer than two pairs and `0.0` when either side has no
/// variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);

    // A constant side would otherwise leave rounding residue in its variance
    if is_constant(xs) || is_constant(ys) {
        return Some(0.0);
    }

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mean_x, y - mean_y);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denominator = (sxx * syy).sqrt();
    if sxx <= 0.0 || syy <= 0.0 || !denominator.is_finite() {
        return Some(0.0);
    }

    Some((sxy / denominator).clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Values of two columns from rows where both cells are numbers
fn paired_samples(dataset: &Dataset, a: usize, b: usize) -> (Vec<f64>, Vec<f64>) {
    dataset
        .rows
        .iter()
        .filter_map(|row| Some((row.get(a).as_f64()?, row.get(b).as_f64()?)))
        .unzip()
}

/// Correlation between two columns, regardless of strength
///
/// `None` when the columns are unknown or share fewer than two numeric rows.
pub fn correlation_between(dataset: &Dataset, column1: &str, column2: &str) -> Option<Correlation> {
    let a = dataset.schema.index_of(column1)?;
    let b = dataset.schema.index_of(column2)?;
    let (xs, ys) = paired_samples(dataset, a, b);
    let r = pearson(&xs, &ys)?;
    Some(Correlation::new(column1, column2, r))
}

/// Meaningful correlations over all numeric column pairs, in schema order
pub fn correlate(dataset: &Dataset) -> Vec<Correlation> {
    let numeric = dataset.schema.numeric_columns();
    let mut correlations = Vec::new();

    for (i, &a) in numeric.iter().enumerate() {
        for &b in &numeric[i + 1..] {
            let (xs, ys) = paired_samples(dataset, a, b);
            let Some(r) = pearson(&xs, &ys) else {
                continue;
            };
            let correlation = Correlation::new(
                dataset.schema.columns[a].name.as_str(),
                dataset.schema.columns[b].name.as_str(),
                r,
            );
            if correlation.is_meaningful() {
                correlations.push(correlation);
            }
        }
    }

    correlations
}
