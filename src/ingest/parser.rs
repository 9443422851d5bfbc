//! Parsers that turn text content into a raw, untyped table

use std::collections::HashSet;

use serde_json::{Map, Value as JsonValue};

use super::config::IngestConfig;
use super::error::IngestError;

/// Column name used for line-oriented text
pub const LINE_COLUMN: &str = "line";

/// Untyped table: header names plus positional raw cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<JsonValue>>,
}

impl RawTable {
    /// Cell at (record, column); missing cells read as null
    pub fn cell(&self, record: usize, column: usize) -> &JsonValue {
        static NULL: JsonValue = JsonValue::Null;
        self.records
            .get(record)
            .and_then(|r| r.get(column))
            .unwrap_or(&NULL)
    }
}

/// Parse delimited text: the first record is the header
pub fn parse_delimited(
    file_name: &str,
    content: &str,
    delimiter: u8,
    config: &IngestConfig,
) -> Result<RawTable, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let malformed = |e: csv::Error| IngestError::MalformedDelimited {
        file_name: file_name.to_string(),
        reason: e.to_string(),
    };

    let header_record = reader.headers().map_err(malformed)?.clone();
    if header_record.iter().all(|h| h.trim().is_empty()) {
        return Err(IngestError::Empty {
            file_name: file_name.to_string(),
        });
    }
    let headers = normalize_headers(header_record.iter());
    let width = headers.len();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(malformed)?;
        let cells = record
            .iter()
            .take(width)
            .map(|cell| text_cell(cell, config))
            .collect();
        records.push(cells);
    }

    Ok(RawTable { headers, records })
}

/// Parse line-oriented text: every non-empty line is one row of [`LINE_COLUMN`]
pub fn parse_lines(file_name: &str, content: &str, config: &IngestConfig) -> Result<RawTable, IngestError> {
    let records: Vec<Vec<JsonValue>> = content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(|line| vec![text_cell(line, config)])
        .collect();

    if records.is_empty() {
        return Err(IngestError::Empty {
            file_name: file_name.to_string(),
        });
    }

    Ok(RawTable {
        headers: vec![LINE_COLUMN.to_string()],
        records,
    })
}

/// Parse a JSON document: an array of objects or a single object
pub fn parse_json(file_name: &str, content: &str, config: &IngestConfig) -> Result<RawTable, IngestError> {
    let value: JsonValue =
        serde_json::from_str(content).map_err(|e| IngestError::MalformedJson {
            file_name: file_name.to_string(),
            reason: e.to_string(),
        })?;

    let items = match value {
        JsonValue::Array(items) => items,
        object @ JsonValue::Object(_) => vec![object],
        other => {
            return Err(IngestError::InvalidStructure {
                file_name: file_name.to_string(),
                record: 0,
                found: json_type_name(&other).to_string(),
            });
        }
    };

    let mut objects = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match item {
            JsonValue::Object(map) => objects.push(map),
            other => {
                return Err(IngestError::InvalidStructure {
                    file_name: file_name.to_string(),
                    record: index,
                    found: json_type_name(&other).to_string(),
                });
            }
        }
    }

    tabulate_objects(file_name, objects, config)
}

/// Parse newline-delimited JSON objects
pub fn parse_json_lines(
    file_name: &str,
    content: &str,
    config: &IngestConfig,
) -> Result<RawTable, IngestError> {
    let mut objects = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let value: JsonValue =
            serde_json::from_str(trimmed).map_err(|e| IngestError::MalformedJson {
                file_name: file_name.to_string(),
                reason: format!("line {}: {}", index + 1, e),
            })?;

        match value {
            JsonValue::Object(map) => objects.push(map),
            other => {
                return Err(IngestError::InvalidStructure {
                    file_name: file_name.to_string(),
                    record: index,
                    found: json_type_name(&other).to_string(),
                });
            }
        }
    }

    tabulate_objects(file_name, objects, config)
}

/// Lay out JSON objects as a table
///
/// Columns are the union of keys seen in the first `sample_size` objects, in
/// first-seen order. Keys that only appear later are dropped.
pub fn tabulate_objects(
    file_name: &str,
    objects: Vec<Map<String, JsonValue>>,
    config: &IngestConfig,
) -> Result<RawTable, IngestError> {
    if objects.is_empty() {
        return Err(IngestError::Empty {
            file_name: file_name.to_string(),
        });
    }

    let scan = if config.sample_size == 0 {
        objects.len()
    } else {
        config.sample_size.min(objects.len())
    };

    let mut seen = HashSet::new();
    let mut headers = Vec::new();
    for object in &objects[..scan] {
        for key in object.keys() {
            if seen.insert(key.as_str()) {
                headers.push(key.clone());
            }
        }
    }

    let records = objects
        .iter()
        .map(|object| {
            headers
                .iter()
                .map(|key| match object.get(key) {
                    Some(JsonValue::String(s)) => text_cell(s, config),
                    Some(other) => other.clone(),
                    None => JsonValue::Null,
                })
                .collect()
        })
        .collect();

    Ok(RawTable { headers, records })
}

fn text_cell(cell: &str, config: &IngestConfig) -> JsonValue {
    if config.is_null_token(cell) {
        JsonValue::Null
    } else {
        JsonValue::String(cell.to_string())
    }
}

/// Trim header names, name blank headers and de-duplicate repeats
fn normalize_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut headers = Vec::new();

    for (index, name) in raw.enumerate() {
        let base = match name.trim() {
            "" => format!("column_{}", index + 1),
            trimmed => trimmed.to_string(),
        };

        let mut candidate = base.clone();
        let mut suffix = 2;
        while seen.contains(&candidate) {
            candidate = format!("{base}_{suffix}");
            suffix += 1;
        }
        seen.insert(candidate.clone());
        headers.push(candidate);
    }

    headers
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> IngestConfig {
        IngestConfig::default()
    }

    #[test]
    fn test_parse_csv_zips_headers() {
        let table = parse_delimited("a.csv", "name,age\nAlice,30\nBob,25\n", b',', &config()).unwrap();
        assert_eq!(table.headers, vec!["name", "age"]);
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.cell(1, 0), &json!("Bob"));
        assert_eq!(table.cell(0, 1), &json!("30"));
    }

    #[test]
    fn test_parse_csv_short_and_long_records() {
        let table = parse_delimited("a.csv", "a,b\n1\n1,2,3\n", b',', &config()).unwrap();
        assert_eq!(table.records[0].len(), 1);
        assert!(table.cell(0, 1).is_null());
        assert_eq!(table.records[1].len(), 2);
    }

    #[test]
    fn test_parse_csv_quoting_and_empty_cells() {
        let table = parse_delimited(
            "a.csv",
            "name,city\n\"Smith, J\",\n",
            b',',
            &config(),
        )
        .unwrap();
        assert_eq!(table.cell(0, 0), &json!("Smith, J"));
        assert!(table.cell(0, 1).is_null());
    }

    #[test]
    fn test_parse_tsv() {
        let table = parse_delimited("a.tsv", "a\tb\n1\t2\n", b'\t', &config()).unwrap();
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.cell(0, 1), &json!("2"));
    }

    #[test]
    fn test_header_normalization() {
        let table = parse_delimited("a.csv", "id, id ,,x\n1,2,3,4\n", b',', &config()).unwrap();
        assert_eq!(table.headers, vec!["id", "id_2", "column_3", "x"]);
    }

    #[test]
    fn test_parse_csv_empty() {
        let err = parse_delimited("a.csv", "", b',', &config()).unwrap_err();
        assert!(matches!(err, IngestError::Empty { .. }));
    }

    #[test]
    fn test_null_tokens_applied() {
        let config = IngestConfig::builder().null_token("NA").build();
        let table = parse_delimited("a.csv", "x\nNA\n1\n", b',', &config).unwrap();
        assert!(table.cell(0, 0).is_null());
        assert_eq!(table.cell(1, 0), &json!("1"));
    }

    #[test]
    fn test_parse_lines() {
        let table = parse_lines("a.txt", "first\r\n\nsecond\n", &config()).unwrap();
        assert_eq!(table.headers, vec![LINE_COLUMN]);
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.cell(1, 0), &json!("second"));
    }

    #[test]
    fn test_parse_json_wraps_bare_object() {
        let table = parse_json("a.json", r#"{"a": 1, "b": "x"}"#, &config()).unwrap();
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.records.len(), 1);
    }

    #[test]
    fn test_parse_json_union_of_keys() {
        let table = parse_json(
            "a.json",
            r#"[{"a": 1}, {"b": 2}, {"a": 3, "c": null}]"#,
            &config(),
        )
        .unwrap();
        assert_eq!(table.headers, vec!["a", "b", "c"]);
        assert!(table.cell(0, 1).is_null());
        assert_eq!(table.cell(1, 1), &json!(2));
    }

    #[test]
    fn test_parse_json_keys_limited_to_sample() {
        let config = IngestConfig::builder().sample_size(1).build();
        let table = parse_json("a.json", r#"[{"a": 1}, {"a": 2, "late": 3}]"#, &config).unwrap();
        assert_eq!(table.headers, vec!["a"]);
        assert_eq!(table.records[1].len(), 1);
    }

    #[test]
    fn test_parse_json_malformed() {
        let err = parse_json("bad.json", "[{\"a\": }]", &config()).unwrap_err();
        match err {
            IngestError::MalformedJson { file_name, .. } => assert_eq!(file_name, "bad.json"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_json_rejects_scalars() {
        let err = parse_json("a.json", "[1, 2]", &config()).unwrap_err();
        assert!(matches!(err, IngestError::InvalidStructure { record: 0, .. }));
        let err = parse_json("a.json", "[]", &config()).unwrap_err();
        assert!(matches!(err, IngestError::Empty { .. }));
    }

    #[test]
    fn test_parse_json_lines() {
        let table = parse_json_lines("a.jsonl", "{\"a\": 1}\n\n{\"a\": 2}\n", &config()).unwrap();
        assert_eq!(table.records.len(), 2);

        let err = parse_json_lines("a.jsonl", "{\"a\": 1}\nnot json\n", &config()).unwrap_err();
        match err {
            IngestError::MalformedJson { reason, .. } => assert!(reason.starts_with("line 2")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
