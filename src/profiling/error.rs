//! Error types for analysis passes

use thiserror::Error;

/// Errors that can occur around an analysis pass
///
/// The analysis itself cannot fail; these cover scheduling and rendering.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Background analysis task panicked or was cancelled
    #[error("Analysis task failed: {0}")]
    Task(String),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl AnalysisError {
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::Task(reason) => {
                format!(
                    "The analysis did not complete: {reason}\n\n\
                    Hint: Retry, or lower maxRows to reduce the work per pass."
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
