//! Typed rows and the dataset handed to the profiling engine

use serde::{Deserialize, Serialize};

use super::schema::Schema;
use super::value::Value;

/// A row of typed cells, positionally aligned with [`Schema::columns`]
///
/// Cells past the end of the row read as [`Value::Null`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    values: Vec<Value>,
}

static NULL: Value = Value::Null;

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Cell at a column position
    pub fn get(&self, index: usize) -> &Value {
        self.values.get(index).unwrap_or(&NULL)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A schema together with its typed rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub schema: Schema,
    pub rows: Vec<Row>,
}

impl Dataset {
    /// Build a dataset, truncating rows that carry more cells than columns
    pub fn new(mut schema: Schema, mut rows: Vec<Row>) -> Self {
        let width = schema.columns.len();
        for row in &mut rows {
            row.values.truncate(width);
        }
        schema.row_count = rows.len();
        Self { schema, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.schema.columns.len()
    }

    /// All cells of one column, in row order
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().map(move |row| row.get(index))
    }

    /// Render a row as a JSON object keyed by column name
    pub fn row_to_json(&self, row: &Row) -> serde_json::Value {
        let map = self
            .schema
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| (column.name.clone(), row.get(i).to_json()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }

    /// Keep every `stride`-th row starting from the first
    ///
    /// Used to bound the analysed row count deterministically.
    pub fn strided(&self, max_rows: usize) -> Dataset {
        if max_rows == 0 || self.rows.len() <= max_rows {
            return self.clone();
        }
        let stride = self.rows.len().div_ceil(max_rows);
        let rows = self.rows.iter().step_by(stride).cloned().collect();
        Dataset::new(self.schema.clone(), rows)
    }
}
