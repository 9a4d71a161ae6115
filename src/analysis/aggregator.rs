//! Record aggregation.
//!
//! Folds a batch of normalized records into category and priority
//! distributions, the high-priority count, and the ordered problem list
//! that feeds theme resolution. Pure and deterministic given input order.

use crate::models::{AggregateAnalytics, Category, FeedbackRecord, Priority, Theme};
use std::collections::HashMap;

/// Deterministic aggregation over one batch of records, before theme
/// resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordAggregation {
    pub category_distribution: HashMap<Category, usize>,
    pub priority_distribution: HashMap<Priority, usize>,
    pub high_priority_count: usize,
    /// Problem statements in record order, duplicates preserved. Becomes
    /// the theme resolver's input.
    pub problems: Vec<String>,
}

impl RecordAggregation {
    /// Attach the resolved themes, completing the analytics object.
    pub fn into_analytics(self, detected_themes: Vec<Theme>) -> AggregateAnalytics {
        AggregateAnalytics {
            category_distribution: self.category_distribution,
            priority_distribution: self.priority_distribution,
            high_priority_count: self.high_priority_count,
            detected_themes,
        }
    }
}

/// Fold the records in one pass. Absent categorical fields are skipped;
/// distribution maps hold only observed keys.
pub fn aggregate_records(records: &[FeedbackRecord]) -> RecordAggregation {
    let mut aggregation = RecordAggregation::default();

    for record in records {
        if let Some(category) = record.category {
            *aggregation
                .category_distribution
                .entry(category)
                .or_default() += 1;
        }

        if let Some(priority) = record.priority {
            *aggregation
                .priority_distribution
                .entry(priority)
                .or_default() += 1;

            if priority == Priority::High {
                aggregation.high_priority_count += 1;
            }
        }

        if record.has_problem() {
            aggregation.problems.push(record.problem.clone());
        }
    }

    aggregation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sentiment;

    fn record(
        problem: &str,
        category: Option<Category>,
        priority: Option<Priority>,
    ) -> FeedbackRecord {
        FeedbackRecord {
            problem: problem.to_string(),
            sentiment: Some(Sentiment::Negative),
            category,
            priority,
        }
    }

    #[test]
    fn test_aggregate_counts_and_problem_order() {
        let records = vec![
            record(
                "App crashes on upload",
                Some(Category::Bug),
                Some(Priority::High),
            ),
            record(
                "Upload fails for large file",
                Some(Category::Bug),
                Some(Priority::High),
            ),
            record("None", Some(Category::Other), Some(Priority::Low)),
            record(
                "Dashboard loads slowly",
                Some(Category::Performance),
                Some(Priority::Medium),
            ),
            record("None", Some(Category::FeatureRequest), Some(Priority::Low)),
        ];

        let aggregation = aggregate_records(&records);

        assert_eq!(
            aggregation.category_distribution.get(&Category::Bug),
            Some(&2)
        );
        assert_eq!(
            aggregation.category_distribution.get(&Category::Performance),
            Some(&1)
        );
        assert_eq!(
            aggregation.priority_distribution.get(&Priority::High),
            Some(&2)
        );
        assert_eq!(
            aggregation.priority_distribution.get(&Priority::Low),
            Some(&2)
        );
        assert_eq!(aggregation.high_priority_count, 2);
        assert_eq!(
            aggregation.problems,
            vec![
                "App crashes on upload",
                "Upload fails for large file",
                "Dashboard loads slowly"
            ]
        );
    }

    #[test]
    fn test_absent_fields_are_skipped() {
        let records = vec![
            FeedbackRecord {
                problem: "Crash".to_string(),
                sentiment: None,
                category: None,
                priority: None,
            },
            record("Lag", Some(Category::Performance), Some(Priority::High)),
        ];

        let aggregation = aggregate_records(&records);

        // No zero-filled buckets: only observed keys appear.
        assert_eq!(aggregation.category_distribution.len(), 1);
        assert_eq!(aggregation.priority_distribution.len(), 1);
        assert_eq!(aggregation.problems.len(), 2);
    }

    #[test]
    fn test_priority_sum_matches_records_with_priority() {
        let records = vec![
            record("a", None, Some(Priority::High)),
            record("b", None, Some(Priority::High)),
            record("c", None, Some(Priority::Medium)),
            record("d", None, None),
        ];

        let aggregation = aggregate_records(&records);
        let total: usize = aggregation.priority_distribution.values().sum();

        assert_eq!(total, 3);
        assert_eq!(
            aggregation.high_priority_count,
            *aggregation
                .priority_distribution
                .get(&Priority::High)
                .unwrap_or(&0)
        );
    }

    #[test]
    fn test_duplicate_problems_preserved() {
        let records = vec![
            record("Login broken", Some(Category::Bug), Some(Priority::High)),
            record("Login broken", Some(Category::Bug), Some(Priority::High)),
        ];

        let aggregation = aggregate_records(&records);
        assert_eq!(aggregation.problems, vec!["Login broken", "Login broken"]);
    }

    #[test]
    fn test_empty_input() {
        let aggregation = aggregate_records(&[]);
        assert!(aggregation.category_distribution.is_empty());
        assert!(aggregation.priority_distribution.is_empty());
        assert_eq!(aggregation.high_priority_count, 0);
        assert!(aggregation.problems.is_empty());
    }

    #[test]
    fn test_into_analytics() {
        let aggregation = aggregate_records(&[record(
            "Crash",
            Some(Category::Bug),
            Some(Priority::High),
        )]);

        let themes = vec![Theme {
            theme: "Stability Issues".to_string(),
            related_problems: vec!["Crash".to_string()],
        }];

        let analytics = aggregation.into_analytics(themes);
        assert_eq!(analytics.high_priority_count, 1);
        assert_eq!(analytics.detected_themes.len(), 1);
    }
}
