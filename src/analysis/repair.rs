//! JSON repair ladder for generator replies.
//!
//! The generative service is instructed to answer with a single JSON
//! object, but local models routinely wrap it in prose, drop a closing
//! brace, leave a trailing comma, or emit enum words unquoted. The ladder
//! here is a fixed sequence of textual repairs applied between two strict
//! parse attempts. It is string surgery and known to be fragile (it cannot
//! quote an enum word inside a free-text problem string); the exact
//! substitution set is pinned by the tests below and must not grow
//! ad hoc.

use serde_json::Value;
use thiserror::Error;

/// Reply text that is not recoverable into valid JSON after the repair
/// ladder. Consumed internally; call sites degrade to their fallback value.
#[derive(Debug, Error)]
#[error("reply is not valid JSON after repair: {reason}")]
pub struct MalformedResponse {
    pub reason: String,
}

/// Enum words the extraction reply may emit unquoted in value position.
const BARE_ENUM_WORDS: [&str; 12] = [
    "None",
    "Positive",
    "Neutral",
    "Negative",
    "High",
    "Medium",
    "Low",
    "Bug",
    "Feature Request",
    "UX Issue",
    "Performance",
    "Other",
];

/// Parse a record-extraction reply, quoting bare enum words on the repair
/// path.
pub fn parse_record_reply(raw: &str) -> Result<Value, MalformedResponse> {
    parse_with_repairs(raw, true)
}

/// Parse a theme-clustering reply. Cluster replies carry free-form theme
/// names, so no enum quoting is applied.
pub fn parse_cluster_reply(raw: &str) -> Result<Value, MalformedResponse> {
    parse_with_repairs(raw, false)
}

fn parse_with_repairs(raw: &str, quote_enums: bool) -> Result<Value, MalformedResponse> {
    let content = raw.trim();

    // Best case: the reply is already valid JSON.
    if let Ok(value) = serde_json::from_str::<Value>(content) {
        return Ok(value);
    }

    let sliced = extract_json_slice(content);
    let repaired = apply_repairs(sliced, quote_enums);

    serde_json::from_str::<Value>(&repaired).map_err(|e| MalformedResponse {
        reason: e.to_string(),
    })
}

/// Slice between the first `{` and the last `}`, or the full text when
/// either brace is absent.
fn extract_json_slice(content: &str) -> &str {
    match (content.find('{'), content.rfind('}')) {
        (Some(start), Some(end)) if start <= end => &content[start..=end],
        _ => content,
    }
}

/// The fixed repair sequence: collapse newlines, drop a trailing comma
/// before the closing brace, optionally quote bare enum words, and force a
/// closing brace.
fn apply_repairs(slice: &str, quote_enums: bool) -> String {
    let mut repaired = slice.replace('\n', " ");
    repaired = repaired.replace(", }", " }");
    repaired = repaired.replace(",}", "}");

    if quote_enums {
        for word in BARE_ENUM_WORDS {
            repaired = repaired.replace(
                &format!(": {word}"),
                &format!(": \"{word}\""),
            );
        }
    }

    if !repaired.trim_end().ends_with('}') {
        repaired = format!("{}}}", repaired.trim_end());
    }

    repaired
}
