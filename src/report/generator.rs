//! Markdown report generation.
//!
//! This module generates Markdown and JSON reports from one pipeline
//! run's analytics, evaluation, and memo.

use crate::config::ReportConfig;
use crate::models::{AggregateAnalytics, FeedbackRecord, Priority, Report, ReportMetadata};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, options: &ReportConfig) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# FeedLens Report\n\n");

    // Metadata section
    output.push_str(&generate_metadata_section(&report.metadata));

    // Analytics section
    output.push_str(&generate_analytics_section(&report.analytics));

    // Themes section
    output.push_str(&generate_themes_section(&report.analytics));

    // Evaluation section
    output.push_str(&generate_evaluation_section(&report.evaluation));

    // Memo section
    if options.include_memo {
        output.push_str(&generate_memo_section(report.memo.as_deref()));
    }

    // Records section
    if options.include_records {
        output.push_str(&generate_records_section(&report.records));
    }

    // Footer
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Model Used:** `{}`\n", metadata.model_used));
    section.push_str(&format!(
        "- **Lines Processed:** {}\n",
        metadata.lines_processed
    ));
    if metadata.records_failed > 0 {
        section.push_str(&format!(
            "- **Records Failed:** {}\n",
            metadata.records_failed
        ));
    }
    section.push_str(&format!(
        "- **Analysis Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the analytics section with distribution tables.
fn generate_analytics_section(analytics: &AggregateAnalytics) -> String {
    let mut section = String::new();

    section.push_str("## Analytics\n\n");
    section.push_str(&format!(
        "- **High Priority Issue Count:** {}\n\n",
        analytics.high_priority_count
    ));

    if !analytics.category_distribution.is_empty() {
        section.push_str("### Category Distribution\n\n");
        section.push_str("| Category | Count |\n");
        section.push_str("|:---|:---:|\n");

        let mut categories: Vec<_> = analytics.category_distribution.iter().collect();
        categories.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.to_string().cmp(&b.0.to_string())));

        for (category, count) in categories {
            section.push_str(&format!("| {} | {} |\n", category, count));
        }
        section.push('\n');
    }

    if !analytics.priority_distribution.is_empty() {
        section.push_str("### Priority Distribution\n\n");
        section.push_str("| Priority | Count |\n");
        section.push_str("|:---|:---:|\n");

        // Fixed High/Medium/Low order; only observed buckets appear.
        for priority in [Priority::High, Priority::Medium, Priority::Low] {
            if let Some(count) = analytics.priority_distribution.get(&priority) {
                section.push_str(&format!("| {} | {} |\n", priority, count));
            }
        }
        section.push('\n');
    }

    section
}

/// Generate the detected themes section.
fn generate_themes_section(analytics: &AggregateAnalytics) -> String {
    let mut section = String::new();

    section.push_str("## Detected Themes\n\n");

    if analytics.detected_themes.is_empty() {
        section.push_str("No themes were detected in this batch.\n\n");
        return section;
    }

    for theme in &analytics.detected_themes {
        section.push_str(&format!("### {}\n\n", theme.theme));
        for problem in &theme.related_problems {
            section.push_str(&format!("- {}\n", problem));
        }
        section.push('\n');
    }

    section
}

/// Generate the system evaluation section.
///
/// The evaluation text is a snapshot-stable block; it goes into a fence
/// untouched.
fn generate_evaluation_section(evaluation: &str) -> String {
    format!("## System Evaluation\n\n```text\n{}\n```\n\n", evaluation.trim_matches('\n'))
}

/// Generate the executive memo section.
fn generate_memo_section(memo: Option<&str>) -> String {
    let mut section = String::new();

    section.push_str("## Executive Memo\n\n");
    match memo {
        Some(memo) => {
            section.push_str(memo.trim());
            section.push_str("\n\n");
        }
        None => {
            section.push_str("*Memo generation was skipped or unavailable for this run.*\n\n");
        }
    }

    section
}

/// Generate the per-record table.
fn generate_records_section(records: &[FeedbackRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Records\n\n");
    section.push_str("| Problem | Sentiment | Category | Priority |\n");
    section.push_str("|:---|:---:|:---:|:---:|\n");

    for record in records {
        section.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            record.problem,
            optional_cell(record.sentiment.map(|v| v.to_string())),
            optional_cell(record.category.map(|v| v.to_string())),
            optional_cell(record.priority.map(|v| v.to_string())),
        ));
    }
    section.push('\n');

    section
}

fn optional_cell(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by FeedLens*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Priority, Sentiment, Theme};
    use chrono::Utc;
    use std::collections::HashMap;

    fn create_test_report() -> Report {
        let metadata = ReportMetadata {
            analysis_date: Utc::now(),
            model_used: "llama3".to_string(),
            lines_processed: 3,
            records_failed: 1,
            duration_seconds: 12.5,
        };

        let mut category_distribution = HashMap::new();
        category_distribution.insert(Category::Bug, 2);
        let mut priority_distribution = HashMap::new();
        priority_distribution.insert(Priority::High, 2);
        priority_distribution.insert(Priority::Low, 1);

        let analytics = AggregateAnalytics {
            category_distribution,
            priority_distribution,
            high_priority_count: 2,
            detected_themes: vec![Theme {
                theme: "Upload Issues".to_string(),
                related_problems: vec!["Upload fails".to_string()],
            }],
        };

        Report {
            evaluation: crate::analysis::evaluate_system(&analytics),
            metadata,
            analytics,
            memo: Some("Executive Summary: upload reliability needs attention.".to_string()),
            records: vec![FeedbackRecord {
                problem: "Upload fails".to_string(),
                sentiment: Some(Sentiment::Negative),
                category: Some(Category::Bug),
                priority: Some(Priority::High),
            }],
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("# FeedLens Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Analytics"));
        assert!(markdown.contains("## Detected Themes"));
        assert!(markdown.contains("### Upload Issues"));
        assert!(markdown.contains("SYSTEM EVALUATION SUMMARY"));
        assert!(markdown.contains("## Executive Memo"));
        assert!(markdown.contains("upload reliability needs attention"));
        assert!(markdown.contains("| Upload fails | Negative | Bug | High |"));
    }

    #[test]
    fn test_report_options_hide_sections() {
        let report = create_test_report();
        let options = ReportConfig {
            include_memo: false,
            include_records: false,
        };
        let markdown = generate_markdown_report(&report, &options);

        assert!(!markdown.contains("## Executive Memo"));
        assert!(!markdown.contains("## Records"));
    }

    #[test]
    fn test_metadata_section_reports_failures() {
        let report = create_test_report();
        let section = generate_metadata_section(&report.metadata);

        assert!(section.contains("Records Failed:"));
        assert!(section.contains("`llama3`"));
        assert!(section.contains("Lines Processed:** 3"));
    }

    #[test]
    fn test_missing_memo_renders_placeholder() {
        let mut report = create_test_report();
        report.memo = None;
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("skipped or unavailable"));
    }

    #[test]
    fn test_empty_themes_section() {
        let mut report = create_test_report();
        report.analytics.detected_themes.clear();
        let section = generate_themes_section(&report.analytics);

        assert!(section.contains("No themes were detected"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"analytics\""));
        assert!(json.contains("\"detected_themes\""));
        assert!(json.contains("\"high_priority_count\": 2"));
    }
}
