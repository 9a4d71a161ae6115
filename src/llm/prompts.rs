//! Instruction templates for the three generative calls.
//!
//! Three single-turn instructions cross the generator seam: record
//! extraction (once per feedback line), theme clustering (once per run),
//! and memo drafting (once per run).

use crate::models::AggregateAnalytics;

/// Build the record-extraction instruction for one raw feedback line.
pub fn extraction_prompt(feedback_text: &str) -> String {
    format!(
        r#"You are a strict product feedback analyzer.

Analyze the feedback and respond ONLY in valid JSON.
Do NOT include explanations.
Do NOT include markdown.
Do NOT include extra text.

Rules:
1. If the feedback describes a bug or issue, extract a clear "problem".
2. If the feedback is purely positive praise, set "problem" to "None".
3. If the feedback is a suggestion or feature request (e.g., "Please add dark mode"), set "problem" to "None".
4. "problem" must NEVER be empty or null. Use exactly "None" when there is no problem.
5. Output must be valid JSON with proper commas and double quotes.

Return JSON in this exact structure:

{{
  "problem": "string",
  "sentiment": "Positive/Neutral/Negative",
  "category": "Bug/Feature Request/UX Issue/Performance/Other",
  "priority": "High/Medium/Low"
}}

Feedback:
"{feedback_text}"
"#
    )
}

/// Build the theme-clustering instruction for the collected problem list.
pub fn clustering_prompt(problems: &[String]) -> String {
    let problem_list = serde_json::to_string_pretty(problems).unwrap_or_default();

    format!(
        r#"You are a precise product issue clustering engine.

Your task:
Group the following problems into DISTINCT and SPECIFIC themes.

Rules:
1. You MUST include ALL problems in the output. No problem should be omitted.
2. If a problem does not belong to an existing theme, create a NEW specific theme for it.
3. Do NOT create overly broad themes.
4. Each theme name MUST be a clear technical noun phrase and MUST end with "Issues".
   Example: "Upload Issues", "Authentication Issues", "Performance Issues".
5. Even if only ONE problem belongs to a theme, it must still appear as its own theme.
6. Do not merge unrelated issues.

Return ONLY valid JSON in this format:

{{
  "themes": [
    {{
      "theme": "Specific Theme Name Issues",
      "related_problems": ["problem1", "problem2"]
    }}
  ]
}}

Problems:
{problem_list}
"#
    )
}

/// Build the executive-memo instruction from the aggregated analytics.
pub fn memo_prompt(analytics: &AggregateAnalytics) -> String {
    let analytics_json = serde_json::to_string_pretty(analytics).unwrap_or_default();

    format!(
        r#"You are a senior Product Strategy Analyst.

Based on the following analytics summary, generate a structured product memo.

Analytics Input:
{analytics_json}

STRICT RULES:
- You MUST NOT calculate totals, ratios, percentages, or derived statistics.
- You MUST NOT infer overall issue counts.
- Only reference values explicitly shown in the Analytics Input.
- You may reference "high_priority_count" directly if needed.
- Do NOT combine category counts into totals.
- Do NOT create new numerical statements.
- Avoid speculative language.

Your response MUST follow this structure:

Executive Summary:
(Brief 3-4 sentence overview of product health)

Key Risk Areas:
(List major risk signals based on high priority counts or repeated themes)

Dominant Themes:
(List major themes detected and what they indicate)

Recommended Actions:
(Provide prioritized, actionable product recommendations)

Keep it concise, strategic, and suitable for leadership review.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Priority, Theme};

    #[test]
    fn test_extraction_prompt_embeds_feedback() {
        let prompt = extraction_prompt("App crashes when uploading images.");
        assert!(prompt.contains("\"App crashes when uploading images.\""));
        assert!(prompt.contains("\"problem\""));
        assert!(prompt.contains("High/Medium/Low"));
    }

    #[test]
    fn test_clustering_prompt_lists_all_problems() {
        let problems = vec![
            "Upload fails".to_string(),
            "Login broken".to_string(),
        ];
        let prompt = clustering_prompt(&problems);
        assert!(prompt.contains("Upload fails"));
        assert!(prompt.contains("Login broken"));
        assert!(prompt.contains("MUST end with \"Issues\""));
    }

    #[test]
    fn test_memo_prompt_embeds_analytics() {
        let mut analytics = AggregateAnalytics::default();
        analytics.category_distribution.insert(Category::Bug, 6);
        analytics.priority_distribution.insert(Priority::High, 8);
        analytics.high_priority_count = 8;
        analytics.detected_themes = vec![Theme {
            theme: "Upload Issues".to_string(),
            related_problems: vec!["Upload fails".to_string()],
        }];

        let prompt = memo_prompt(&analytics);
        assert!(prompt.contains("high_priority_count"));
        assert!(prompt.contains("Upload Issues"));
        assert!(prompt.contains("Product Strategy Analyst"));
    }
}
