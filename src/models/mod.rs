//! Core data model shared by ingestion and profiling
//!
//! - [`Value`] - a typed cell
//! - [`Column`] / [`Schema`] - the inferred structure of a file
//! - [`Row`] / [`Dataset`] - typed rows handed to the profiling engine

pub mod dataset;
pub mod schema;
pub mod value;

pub use dataset::{Dataset, Row};
pub use schema::{Column, ColumnType, Schema};
pub use value::Value;
