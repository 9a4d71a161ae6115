//! Data models for the feedback analyzer.
//!
//! This module contains all the core data structures used throughout
//! the application for representing records, themes, and analytics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Sentiment classification of one feedback line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    /// Assigned when the generator gave no usable sentiment.
    Unknown,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "Positive"),
            Sentiment::Neutral => write!(f, "Neutral"),
            Sentiment::Negative => write!(f, "Negative"),
            Sentiment::Unknown => write!(f, "Unknown"),
        }
    }
}

impl From<&str> for Sentiment {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "neutral" => Sentiment::Neutral,
            "negative" => Sentiment::Negative,
            _ => Sentiment::Unknown,
        }
    }
}

/// Category of one feedback record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Bug,
    #[serde(rename = "Feature Request")]
    FeatureRequest,
    #[serde(rename = "UX Issue")]
    UxIssue,
    Performance,
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Bug => write!(f, "Bug"),
            Category::FeatureRequest => write!(f, "Feature Request"),
            Category::UxIssue => write!(f, "UX Issue"),
            Category::Performance => write!(f, "Performance"),
            Category::Other => write!(f, "Other"),
        }
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "bug" => Category::Bug,
            "feature request" | "featurerequest" | "feature_request" => Category::FeatureRequest,
            "ux issue" | "uxissue" | "ux_issue" | "ux" => Category::UxIssue,
            "performance" => Category::Performance,
            _ => Category::Other,
        }
    }
}

/// Priority of one feedback record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

impl From<&str> for Priority {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            _ => Priority::Low,
        }
    }
}

/// One normalized feedback classification.
///
/// `problem` is never empty or null; a feedback line with no extractable
/// problem carries the literal `"None"`. The three categorical fields stay
/// `None` when the generator omitted them; aggregation skips absent fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackRecord {
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl FeedbackRecord {
    /// True when this line carried an actual problem statement.
    pub fn has_problem(&self) -> bool {
        !self.problem.is_empty() && self.problem != "None"
    }
}

/// A named cluster grouping one or more problem strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub theme: String,
    #[serde(default)]
    pub related_problems: Vec<String>,
}

/// The counts, distributions, and themes computed over a full batch of
/// records. Distribution maps hold only keys actually observed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateAnalytics {
    pub category_distribution: HashMap<Category, usize>,
    pub priority_distribution: HashMap<Priority, usize>,
    pub high_priority_count: usize,
    pub detected_themes: Vec<Theme>,
}

impl AggregateAnalytics {
    /// Number of records classified as bugs (0 if none observed).
    pub fn bug_count(&self) -> usize {
        self.category_distribution
            .get(&Category::Bug)
            .copied()
            .unwrap_or(0)
    }

    /// Sum of problems referenced across all detected themes.
    pub fn total_problems_clustered(&self) -> usize {
        self.detected_themes
            .iter()
            .map(|t| t.related_problems.len())
            .sum()
    }
}

/// Metadata about one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Date and time of the analysis.
    pub analysis_date: DateTime<Utc>,
    /// Name of the LLM model used.
    pub model_used: String,
    /// Number of feedback lines processed.
    pub lines_processed: usize,
    /// Number of lines that degraded to a sentinel record.
    pub records_failed: usize,
    /// Duration of the analysis in seconds.
    pub duration_seconds: f64,
}

/// The complete feedback analysis report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// Aggregated analytics over all records.
    pub analytics: AggregateAnalytics,
    /// Rule-based system health summary.
    pub evaluation: String,
    /// AI-generated executive memo, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    /// The normalized records, in input order.
    pub records: Vec<FeedbackRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str() {
        assert_eq!(Category::from("bug"), Category::Bug);
        assert_eq!(Category::from("Feature Request"), Category::FeatureRequest);
        assert_eq!(Category::from("UX ISSUE"), Category::UxIssue);
        assert_eq!(Category::from("performance"), Category::Performance);
        assert_eq!(Category::from("something else"), Category::Other);
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!(Priority::from("High"), Priority::High);
        assert_eq!(Priority::from("medium"), Priority::Medium);
        assert_eq!(Priority::from("low"), Priority::Low);
        assert_eq!(Priority::from("urgent"), Priority::Low);
    }

    #[test]
    fn test_sentiment_from_str() {
        assert_eq!(Sentiment::from("Positive"), Sentiment::Positive);
        assert_eq!(Sentiment::from("negative"), Sentiment::Negative);
        assert_eq!(Sentiment::from("mixed"), Sentiment::Unknown);
    }

    #[test]
    fn test_display_matches_wire_strings() {
        assert_eq!(Category::FeatureRequest.to_string(), "Feature Request");
        assert_eq!(Category::UxIssue.to_string(), "UX Issue");
        assert_eq!(Priority::High.to_string(), "High");
        assert_eq!(Sentiment::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_category_serializes_with_spaces() {
        let json = serde_json::to_string(&Category::FeatureRequest).unwrap();
        assert_eq!(json, "\"Feature Request\"");
        let json = serde_json::to_string(&Category::UxIssue).unwrap();
        assert_eq!(json, "\"UX Issue\"");
    }

    #[test]
    fn test_has_problem() {
        let record = FeedbackRecord {
            problem: "None".to_string(),
            sentiment: Some(Sentiment::Positive),
            category: Some(Category::Other),
            priority: Some(Priority::Low),
        };
        assert!(!record.has_problem());

        let record = FeedbackRecord {
            problem: "App crashes on upload".to_string(),
            ..record
        };
        assert!(record.has_problem());
    }

    #[test]
    fn test_analytics_helpers() {
        let mut analytics = AggregateAnalytics::default();
        analytics.category_distribution.insert(Category::Bug, 6);
        analytics.detected_themes = vec![
            Theme {
                theme: "Upload Issues".to_string(),
                related_problems: vec!["a".to_string(), "b".to_string()],
            },
            Theme {
                theme: "Performance Issues".to_string(),
                related_problems: vec!["c".to_string()],
            },
        ];

        assert_eq!(analytics.bug_count(), 6);
        assert_eq!(analytics.total_problems_clustered(), 3);
    }
}
