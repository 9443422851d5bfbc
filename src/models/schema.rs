//! Column and schema definitions produced by schema inference

use std::fmt;

use serde::{Deserialize, Serialize};

use super::value::Value;
use crate::ingest::Format;

/// Inferred column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Date,
    Boolean,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inferred column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Column name (header or JSON key)
    pub name: String,
    /// Inferred type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Whether any sampled row lacks a value
    pub nullable: bool,
    /// Whether every sampled non-null value is distinct
    pub unique: bool,
    /// First non-null values encountered
    #[serde(default)]
    pub samples: Vec<Value>,
    /// Semantic format of a string column (email, uuid, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
}

impl Column {
    /// Create a column with no samples and no format hint
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            unique: false,
            samples: Vec::new(),
            format: None,
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn is_numeric(&self) -> bool {
        self.column_type == ColumnType::Number
    }
}

/// Schema of an ingested dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub columns: Vec<Column>,
    pub row_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

impl Schema {
    pub fn new(columns: Vec<Column>, row_count: usize) -> Self {
        Self {
            columns,
            row_count,
            encoding: None,
        }
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Position of a column by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Indices of the numeric columns, in schema order
    pub fn numeric_columns(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_numeric())
            .map(|(i, _)| i)
            .collect()
    }
}
