//! Theme resolution.
//!
//! Clustering of problem strings is delegated to the generative service;
//! this module owns the call, the reply repair, and the coverage
//! validation. Every failure mode degrades to an empty theme list — a
//! missing theme section downstream, never an error.

use crate::analysis::repair;
use crate::llm::{prompts, TextGenerator};
use crate::models::Theme;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Resolve themes for the collected problem list.
///
/// An empty list short-circuits without an external call.
pub async fn resolve_themes(generator: &dyn TextGenerator, problems: &[String]) -> Vec<Theme> {
    if problems.is_empty() {
        debug!("No problems collected; skipping clustering call");
        return Vec::new();
    }

    let prompt = prompts::clustering_prompt(problems);

    let reply = match generator.generate(&prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Clustering call failed: {}", e);
            return Vec::new();
        }
    };

    themes_from_reply(&reply, problems)
}

/// Parse and validate one clustering reply against its input problems.
pub fn themes_from_reply(reply: &str, problems: &[String]) -> Vec<Theme> {
    let value = match repair::parse_cluster_reply(reply) {
        Ok(value) => value,
        Err(e) => {
            warn!("Clustering reply unrecoverable: {}", e);
            debug!("Raw reply: {}", reply);
            return Vec::new();
        }
    };

    let themes: Vec<Theme> = match value.get("themes") {
        Some(section) => match serde_json::from_value(section.clone()) {
            Ok(themes) => themes,
            Err(e) => {
                warn!("Clustering reply has a malformed themes section: {}", e);
                return Vec::new();
            }
        },
        None => return Vec::new(),
    };

    if let Err(reason) = validate_coverage(&themes, problems) {
        warn!("Discarding themes: {}", reason);
        return Vec::new();
    }

    info!("Resolved {} themes", themes.len());
    themes
}

/// Enforce the clustering contract: non-empty theme names, every input
/// problem in exactly one theme, nothing invented.
///
/// Duplicate input lines collapse to one cluster entry, so coverage is
/// compared over unique problem strings.
fn validate_coverage(themes: &[Theme], problems: &[String]) -> Result<(), String> {
    let expected: HashSet<&str> = problems.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::new();

    for theme in themes {
        if theme.theme.trim().is_empty() {
            return Err("a theme has an empty name".to_string());
        }

        for problem in &theme.related_problems {
            if !expected.contains(problem.as_str()) {
                return Err(format!("theme {:?} references unknown problem {:?}", theme.theme, problem));
            }
            if !seen.insert(problem.as_str()) {
                return Err(format!("problem {:?} appears in more than one theme", problem));
            }
        }
    }

    if seen.len() != expected.len() {
        let missing: Vec<&str> = expected.difference(&seen).copied().collect();
        return Err(format!("problems left unclustered: {:?}", missing));
    }

    Ok(())
}
