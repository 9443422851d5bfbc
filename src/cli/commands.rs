//! Subcommand implementations

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use data_profiling_sdk::{
    AnalysisReport, IngestedFile, Ingestor, Insight, InsightType, ProfilerConfig,
    ProfilingEngine, Schema,
};
use serde::Serialize;
use tracing::info;

use crate::OutputFormat;
use crate::output;

/// Report for one profiled file
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub file_name: String,
    pub schema: Schema,
    pub report: AnalysisReport,
    /// Insights of the requested type, when a type filter was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_insights: Option<Vec<Insight>>,
}

impl FileReport {
    pub fn new(
        file: IngestedFile,
        report: AnalysisReport,
        insight_type: Option<InsightType>,
    ) -> Self {
        let selected_insights =
            insight_type.map(|t| report.insights_of(t).into_iter().cloned().collect());
        Self {
            file_name: file.file_name,
            schema: file.dataset.schema,
            report,
            selected_insights,
        }
    }

    /// Insights to show: the filtered selection, or all of them
    pub fn insights(&self) -> Vec<&Insight> {
        match &self.selected_insights {
            Some(selected) => selected.iter().collect(),
            None => self.report.insights.iter().collect(),
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ProfilerConfig> {
    ProfilerConfig::load(path).map_err(|e| anyhow!(e.user_message()))
}

pub fn profile(
    files: &[std::path::PathBuf],
    format: OutputFormat,
    config: Option<&Path>,
    insight_type: Option<InsightType>,
    output_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(config)?;
    let ingestor = Ingestor::with_config(config.ingest);
    let engine = ProfilingEngine::with_config(config.analysis);

    let mut reports = Vec::new();
    let mut failed = 0;

    for path in files {
        let file = match ingestor.ingest_path(path) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("❌ {}\n", e.user_message());
                failed += 1;
                continue;
            }
        };

        let report = engine.analyze(&file.dataset);
        info!(file = %file.file_name, insights = report.insights.len(), "Profiled file");
        reports.push(FileReport::new(file, report, insight_type));
    }

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&reports)?,
        OutputFormat::Yaml => serde_yaml::to_string(&reports)?,
        OutputFormat::Summary => reports
            .iter()
            .map(|r| output::format_summary(&r.file_name, &r.report, &r.insights()))
            .collect::<Vec<_>>()
            .join("\n"),
    };
    emit(&rendered, output_path)?;

    if failed > 0 {
        return Err(anyhow!("{} of {} file(s) could not be profiled", failed, files.len()));
    }
    Ok(())
}

pub fn schema(path: &Path, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let file = Ingestor::with_config(config.ingest)
        .ingest_path(path)
        .map_err(|e| anyhow!(e.user_message()))?;

    println!("{}", output::format_schema(&file));
    Ok(())
}

fn emit(rendered: &str, output_path: Option<&Path>) -> Result<()> {
    match output_path {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("✅ Report written to {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
