//! Rule-based system evaluation.
//!
//! Pure function from the aggregated analytics to a fixed-layout text
//! summary. No I/O, no external calls. The template is byte-stable:
//! downstream consumers snapshot-test the report.

use crate::models::AggregateAnalytics;

/// Produce the system health summary for one analytics object.
pub fn evaluate_system(analytics: &AggregateAnalytics) -> String {
    let high_priority_count = analytics.high_priority_count;
    let theme_count = analytics.detected_themes.len();
    let total_problems = analytics.total_problems_clustered();
    let bug_count = analytics.bug_count();

    let risk_level = if high_priority_count >= 8 {
        "High"
    } else if high_priority_count >= 4 {
        "Medium"
    } else {
        "Low"
    };

    let concentration = if theme_count == 0 {
        "No significant themes detected"
    } else if theme_count == 1 {
        "Highly concentrated issue cluster"
    } else if theme_count <= 3 {
        "Moderately concentrated themes"
    } else {
        "Fragmented issue landscape"
    };

    let signal_strength = if bug_count >= 5 && high_priority_count >= 5 {
        "Strong"
    } else if high_priority_count >= 3 {
        "Moderate"
    } else {
        "Weak"
    };

    format!(
        r#"
SYSTEM EVALUATION SUMMARY

Risk Level: {risk_level}
High Priority Issue Count: {high_priority_count}

Theme Count: {theme_count}
Total Problems Clustered: {total_problems}
Theme Concentration: {concentration}

Bug Volume: {bug_count}
Signal Strength: {signal_strength}

Interpretation:
- Risk level reflects urgency driven by high-priority issues.
- Theme concentration indicates whether issues are focused or spread across areas.
- Signal strength reflects severity based on bug dominance and priority load.
"#
    )
}
