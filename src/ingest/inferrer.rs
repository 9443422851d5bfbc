//! Schema inference engine

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

use super::config::IngestConfig;
use super::formats::dominant_format;
use super::parser::RawTable;
use crate::models::value::{parse_date, raw_as_bool, raw_as_number};
use crate::models::{Column, ColumnType, Dataset, Row, Schema, Value};

/// Statistics from schema inference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceStats {
    /// Total records in the table
    pub records_processed: usize,
    /// Records used for type inference
    pub records_sampled: usize,
    /// Number of columns discovered
    pub columns_discovered: usize,
    /// Column count per inferred type
    pub type_distribution: BTreeMap<String, usize>,
}

/// Infers column types from a raw table and casts its cells
#[derive(Debug, Clone, Default)]
pub struct SchemaInferrer {
    config: IngestConfig,
}

impl SchemaInferrer {
    /// Create a new schema inferrer with default configuration
    pub fn new() -> Self {
        Self::with_config(IngestConfig::default())
    }

    /// Create a new schema inferrer with custom configuration
    pub fn with_config(config: IngestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    fn sampled_rows(&self, table: &RawTable) -> usize {
        match self.config.sample_size {
            0 => table.records.len(),
            n => n.min(table.records.len()),
        }
    }

    /// Infer the schema of a raw table from its leading sample rows
    pub fn infer_schema(&self, table: &RawTable) -> Schema {
        let sampled = self.sampled_rows(table);

        let columns = table
            .headers
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let values: Vec<&JsonValue> =
                    (0..sampled).map(|record| table.cell(record, index)).collect();
                self.infer_column(name, &values)
            })
            .collect();

        Schema::new(columns, table.records.len())
    }

    /// Infer a single column from its sampled raw values (nulls included)
    pub fn infer_column(&self, name: &str, sampled: &[&JsonValue]) -> Column {
        let non_null: Vec<&JsonValue> = sampled.iter().copied().filter(|v| !v.is_null()).collect();
        let column_type = infer_type(&non_null);

        let typed: Vec<Value> = non_null
            .iter()
            .map(|raw| Value::cast(raw, column_type))
            .collect();
        let distinct = typed.iter().map(|v| v.key()).collect::<HashSet<_>>().len();

        let format = if self.config.detect_formats && column_type == ColumnType::String {
            let texts: Vec<&str> = non_null.iter().filter_map(|v| v.as_str()).collect();
            dominant_format(&texts, self.config.format_confidence_threshold)
        } else {
            None
        };

        Column {
            name: name.to_string(),
            column_type,
            nullable: non_null.len() < sampled.len(),
            unique: distinct == non_null.len(),
            samples: typed.into_iter().take(self.config.max_samples).collect(),
            format,
        }
    }

    /// Infer a schema and cast every cell of the table into typed rows
    pub fn build_dataset(&self, table: RawTable) -> Dataset {
        let schema = self.infer_schema(&table);
        let types: Vec<ColumnType> = schema.columns.iter().map(|c| c.column_type).collect();

        let rows = table
            .records
            .iter()
            .map(|record| {
                Row::new(
                    types
                        .iter()
                        .enumerate()
                        .map(|(i, ty)| {
                            record
                                .get(i)
                                .map(|raw| Value::cast(raw, *ty))
                                .unwrap_or(Value::Null)
                        })
                        .collect(),
                )
            })
            .collect();

        debug!(
            columns = schema.columns.len(),
            rows = table.records.len(),
            "Schema inferred"
        );

        Dataset::new(schema, rows)
    }

    /// Summarize what inference saw for a table
    pub fn stats(&self, schema: &Schema) -> InferenceStats {
        let mut type_distribution = BTreeMap::new();
        for column in &schema.columns {
            *type_distribution
                .entry(column.column_type.to_string())
                .or_insert(0) += 1;
        }

        InferenceStats {
            records_processed: schema.row_count,
            records_sampled: match self.config.sample_size {
                0 => schema.row_count,
                n => n.min(schema.row_count),
            },
            columns_discovered: schema.columns.len(),
            type_distribution,
        }
    }
}

/// Infer a column type from its non-null raw values
///
/// Rules apply in order: boolean, number, date, string. A column with no
/// values at all is a string column.
pub fn infer_type(values: &[&JsonValue]) -> ColumnType {
    if values.is_empty() {
        return ColumnType::String;
    }

    if values.iter().all(|v| raw_as_bool(v).is_some()) {
        ColumnType::Boolean
    } else if values.iter().all(|v| raw_as_number(v).is_some()) {
        ColumnType::Number
    } else if values
        .iter()
        .all(|v| v.as_str().and_then(parse_date).is_some())
    {
        ColumnType::Date
    } else {
        ColumnType::String
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::Format;
    use serde_json::json;

    fn table(headers: &[&str], records: Vec<Vec<JsonValue>>) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            records,
        }
    }

    fn refs(values: &[JsonValue]) -> Vec<&JsonValue> {
        values.iter().collect()
    }

    #[test]
    fn test_infer_boolean_from_strings() {
        let values = [json!("true"), json!("false"), json!("true")];
        let refs: Vec<&JsonValue> = values.iter().collect();
        assert_eq!(infer_type(&refs), ColumnType::Boolean);
    }

    #[test]
    fn test_infer_number_then_date_then_string() {
        let numbers = [json!("1"), json!(2.5), json!("-3")];
        let dates = [json!("2024-01-01"), json!("2024/02/01")];
        let text = [json!("2024-01-01"), json!("hello")];

        assert_eq!(infer_type(&refs(&numbers)), ColumnType::Number);
        assert_eq!(infer_type(&refs(&dates)), ColumnType::Date);
        assert_eq!(infer_type(&refs(&text)), ColumnType::String);
        assert_eq!(infer_type(&[]), ColumnType::String);
    }

    #[test]
    fn test_booleans_win_over_numbers() {
        let values = [json!(true), json!("FALSE")];
        let refs: Vec<&JsonValue> = values.iter().collect();
        assert_eq!(infer_type(&refs), ColumnType::Boolean);
    }

    #[test]
    fn test_nullable_and_unique() {
        let raw = table(
            &["id", "group"],
            vec![
                vec![json!("1"), json!("a")],
                vec![json!("2"), json!("a")],
                vec![JsonValue::Null, json!("b")],
            ],
        );
        let schema = SchemaInferrer::new().infer_schema(&raw);

        let id = &schema.columns[0];
        assert_eq!(id.column_type, ColumnType::Number);
        assert!(id.nullable);
        assert!(id.unique);

        let group = &schema.columns[1];
        assert!(!group.nullable);
        assert!(!group.unique);
        assert_eq!(schema.row_count, 3);
    }

    #[test]
    fn test_samples_are_first_non_null_values() {
        let records = (0..8).map(|i| vec![json!(i.to_string())]).collect();
        let mut raw = table(&["n"], records);
        raw.records.insert(0, vec![JsonValue::Null]);

        let schema = SchemaInferrer::new().infer_schema(&raw);
        let samples = &schema.columns[0].samples;
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0], Value::Number(0.0));
        assert_eq!(samples[4], Value::Number(4.0));
    }

    #[test]
    fn test_inference_limited_to_sample_rows() {
        let config = IngestConfig::builder().sample_size(2).build();
        let raw = table(
            &["v"],
            vec![vec![json!("1")], vec![json!("2")], vec![json!("oops")]],
        );
        let dataset = SchemaInferrer::with_config(config).build_dataset(raw);

        assert_eq!(dataset.schema.columns[0].column_type, ColumnType::Number);
        assert_eq!(dataset.rows[2].get(0), &Value::Text("oops".to_string()));
        assert_eq!(dataset.row_count(), 3);
    }

    #[test]
    fn test_string_format_detection() {
        let raw = table(
            &["email"],
            vec![vec![json!("a@example.com")], vec![json!("b@example.com")]],
        );
        let schema = SchemaInferrer::new().infer_schema(&raw);
        assert_eq!(schema.columns[0].format, Some(Format::Email));

        let config = IngestConfig::builder().detect_formats(false).build();
        let schema = SchemaInferrer::with_config(config).infer_schema(&raw);
        assert_eq!(schema.columns[0].format, None);
    }

    #[test]
    fn test_stats() {
        let raw = table(
            &["a", "b"],
            vec![vec![json!("1"), json!("x")], vec![json!("2"), json!("y")]],
        );
        let inferrer = SchemaInferrer::new();
        let schema = inferrer.infer_schema(&raw);
        let stats = inferrer.stats(&schema);
        assert_eq!(stats.records_processed, 2);
        assert_eq!(stats.columns_discovered, 2);
        assert_eq!(stats.type_distribution["number"], 1);
        assert_eq!(stats.type_distribution["string"], 1);
    }
}
