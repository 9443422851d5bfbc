//! Human readable output for the CLI

use data_profiling_sdk::{AnalysisReport, IngestedFile, Insight, QualityStatus};

fn status_icon(status: QualityStatus) -> &'static str {
    match status {
        QualityStatus::Good => "✅",
        QualityStatus::Warning => "⚠️ ",
        QualityStatus::Error => "❌",
    }
}

fn number(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}

/// Format an analysis report as plain text, listing only `insights`
pub fn format_summary(file_name: &str, report: &AnalysisReport, insights: &[&Insight]) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n📊 {}\n", file_name));
    if report.is_sampled() {
        output.push_str(&format!(
            "  Rows: {} (sampled {})\n",
            report.row_count, report.sampled_row_count
        ));
    } else {
        output.push_str(&format!("  Rows: {}\n", report.row_count));
    }

    output.push_str("\nColumns:\n");
    for summary in &report.summaries {
        output.push_str(&format!(
            "  - {} ({}): {} null, {} unique",
            summary.column, summary.column_type, summary.null_count, summary.unique_count
        ));
        if summary.mean.is_some() {
            output.push_str(&format!(
                ", mean {}, median {}, std dev {}, range [{}, {}]",
                number(summary.mean),
                number(summary.median),
                number(summary.std_dev),
                number(summary.min),
                number(summary.max)
            ));
        }
        if let Some(mode) = &summary.mode {
            output.push_str(&format!(", mode {}", mode));
        }
        output.push('\n');
    }

    output.push_str("\nQuality:\n");
    for metric in &report.quality {
        output.push_str(&format!(
            "  {} {}: {:.1}%\n",
            status_icon(metric.status),
            metric.metric,
            metric.value
        ));
    }

    if !report.correlations.is_empty() {
        output.push_str("\nCorrelations:\n");
        for c in &report.correlations {
            output.push_str(&format!(
                "  - {} ~ {}: {:.3} ({} {})\n",
                c.column1, c.column2, c.coefficient, c.strength, c.direction
            ));
        }
    }

    if insights.is_empty() {
        output.push_str("\n✅ No insights to report\n");
    } else {
        output.push_str(&format!("\n💡 {} insight(s):\n", insights.len()));
        for insight in insights {
            output.push_str(&format!(
                "  [{}/{}] {}\n    {}\n",
                insight.insight_type, insight.impact, insight.title, insight.description
            ));
            if let Some(recommendation) = &insight.recommendation {
                output.push_str(&format!("    → {}\n", recommendation));
            }
        }
    }

    output
}

/// Format an inferred schema and its preview rows
pub fn format_schema(file: &IngestedFile) -> String {
    let schema = file.schema();
    let mut output = String::new();

    output.push_str(&format!(
        "\n✅ {} ({}): {} column(s), {} row(s)\n",
        file.file_name,
        file.format,
        schema.columns.len(),
        schema.row_count
    ));

    for column in &schema.columns {
        let mut flags = Vec::new();
        if column.nullable {
            flags.push("nullable".to_string());
        }
        if column.unique {
            flags.push("unique".to_string());
        }
        if let Some(format) = &column.format {
            flags.push(format!("format={:?}", format));
        }
        let samples: Vec<String> = column.samples.iter().map(|v| v.to_string()).collect();

        output.push_str(&format!("  - {}: {}", column.name, column.column_type));
        if !flags.is_empty() {
            output.push_str(&format!(" [{}]", flags.join(", ")));
        }
        output.push_str(&format!("\n    samples: {}\n", samples.join(", ")));
    }

    if !file.preview_rows.is_empty() {
        output.push_str("\nPreview:\n");
        for row in &file.preview_rows {
            output.push_str(&format!("  {}\n", row));
        }
    }

    output
}
