//! Record normalization.
//!
//! Turns the raw reply of one extraction call into a canonical
//! [`FeedbackRecord`]. This stage must never fail outward: a transport
//! failure or an unrecoverable reply degrades to a sentinel record and the
//! remaining feedback lines keep processing.

use crate::analysis::repair;
use crate::llm::{prompts, TextGenerator};
use crate::models::{Category, FeedbackRecord, Priority, Sentiment};
use serde_json::Value;
use tracing::{debug, warn};

/// Failure class a sentinel record stands in for. Transport failures and
/// malformed replies are distinguishable in the aggregated output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackKind {
    /// The generative call itself failed.
    Transport,
    /// The call returned text that survived no repair.
    Malformed,
}

impl FallbackKind {
    /// The sentinel problem string for this failure class.
    pub fn problem_label(self) -> &'static str {
        match self {
            FallbackKind::Transport => "API Failure",
            FallbackKind::Malformed => "Parsing Error",
        }
    }
}

/// Build the sentinel record for one failure class.
pub fn sentinel_record(kind: FallbackKind) -> FeedbackRecord {
    FeedbackRecord {
        problem: kind.problem_label().to_string(),
        sentiment: Some(Sentiment::Unknown),
        category: Some(Category::Other),
        priority: Some(Priority::Low),
    }
}

/// True when a record is one of the two sentinels.
pub fn is_sentinel(record: &FeedbackRecord) -> bool {
    record.sentiment == Some(Sentiment::Unknown)
        && (record.problem == FallbackKind::Transport.problem_label()
            || record.problem == FallbackKind::Malformed.problem_label())
}

/// Replacement for a categorical field holding the literal `"None"`.
///
/// `problem` is deliberately absent: it is the one field allowed to keep
/// the literal. The mapping is exhaustively enumerated in tests.
pub fn none_replacement(field: &str) -> Option<&'static str> {
    match field {
        "category" => Some("Other"),
        "priority" => Some("Low"),
        "sentiment" => Some("Neutral"),
        _ => None,
    }
}

/// Run one extraction call and normalize its reply.
pub async fn normalize_feedback(
    generator: &dyn TextGenerator,
    feedback_text: &str,
) -> FeedbackRecord {
    let prompt = prompts::extraction_prompt(feedback_text);

    let reply = match generator.generate(&prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Extraction call failed: {}", e);
            return sentinel_record(FallbackKind::Transport);
        }
    };

    record_from_reply(&reply)
}

/// Normalize one raw extraction reply into a record.
pub fn record_from_reply(reply: &str) -> FeedbackRecord {
    match repair::parse_record_reply(reply) {
        Ok(value) => value_to_record(&value),
        Err(e) => {
            warn!("Extraction reply unrecoverable: {}", e);
            debug!("Raw reply: {}", reply);
            sentinel_record(FallbackKind::Malformed)
        }
    }
}

/// Map a parsed JSON object onto the canonical record shape.
///
/// The literal `"None"` in a categorical field takes its replacement from
/// [`none_replacement`]; an absent or non-string categorical field stays
/// absent. A missing, null, or blank `problem` coerces to `"None"`.
pub fn value_to_record(value: &Value) -> FeedbackRecord {
    let problem = match value.get("problem") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Null) | None => "None".to_string(),
        Some(Value::String(_)) => "None".to_string(),
        // Non-string scalar: keep its JSON rendering rather than losing it.
        Some(other) => other.to_string(),
    };

    FeedbackRecord {
        problem,
        sentiment: categorical_field(value, "sentiment").map(|s| Sentiment::from(s.as_str())),
        category: categorical_field(value, "category").map(|s| Category::from(s.as_str())),
        priority: categorical_field(value, "priority").map(|s| Priority::from(s.as_str())),
    }
}

/// Read one categorical field as a string, applying the `"None"`
/// replacement table.
fn categorical_field(value: &Value, field: &str) -> Option<String> {
    let raw = value.get(field)?.as_str()?;

    if raw == "None" {
        none_replacement(field).map(str::to_string)
    } else {
        Some(raw.to_string())
    }
}
