//! Pipeline orchestration.
//!
//! One run is strictly sequential: one extraction call per feedback line
//! in input order, then aggregation, then one clustering call, then the
//! memo call, then evaluation. No stage starts before its predecessor's
//! full output is available, and nothing is cached across runs.

use crate::analysis::{aggregate_records, evaluate_system, normalize_feedback, resolve_themes};
use crate::analysis::normalizer;
use crate::llm::{prompts, TextGenerator};
use crate::models::{AggregateAnalytics, FeedbackRecord};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

/// Per-run options.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Whether to draft the executive memo.
    pub include_memo: bool,
    /// Whether to show a progress bar over the extraction calls.
    pub show_progress: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            include_memo: true,
            show_progress: false,
        }
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub analytics: AggregateAnalytics,
    pub evaluation: String,
    /// Absent when memo drafting was skipped or failed.
    pub memo: Option<String>,
    /// Normalized records, one per input line, in input order.
    pub records: Vec<FeedbackRecord>,
}

impl PipelineOutcome {
    /// Number of records that degraded to a sentinel.
    pub fn failed_record_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| normalizer::is_sentinel(r))
            .count()
    }
}

/// Split raw input into the ordered list of feedback lines. Lines are
/// trimmed; blank lines are dropped.
pub fn collect_feedback_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Run the full pipeline over the given feedback lines.
pub async fn run_pipeline(
    generator: &dyn TextGenerator,
    lines: &[String],
    options: &PipelineOptions,
) -> PipelineOutcome {
    info!("Analyzing {} feedback lines", lines.len());

    let progress_bar = if options.show_progress {
        let pb = ProgressBar::new(lines.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .unwrap()
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    // Stage 1: one extraction call per line, in input order. Record order
    // must match line order; the problem list (and with it the themes)
    // depends on it.
    let mut records = Vec::with_capacity(lines.len());
    for line in lines {
        let record = normalize_feedback(generator, line).await;
        records.push(record);
        if let Some(ref pb) = progress_bar {
            pb.inc(1);
        }
    }
    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    // Stage 2: deterministic aggregation.
    let aggregation = aggregate_records(&records);
    info!(
        "Aggregated {} records ({} problems, {} high priority)",
        records.len(),
        aggregation.problems.len(),
        aggregation.high_priority_count
    );

    // Stage 3: theme resolution over the full problem list.
    let themes = resolve_themes(generator, &aggregation.problems).await;
    let analytics = aggregation.into_analytics(themes);

    // Stage 4: the memo branch. Failure here never blocks the analytics.
    let memo = if options.include_memo {
        draft_memo(generator, &analytics).await
    } else {
        None
    };

    // Stage 5: rule-based evaluation.
    let evaluation = evaluate_system(&analytics);

    PipelineOutcome {
        analytics,
        evaluation,
        memo,
        records,
    }
}

/// Draft the executive memo from the finished analytics.
async fn draft_memo(
    generator: &dyn TextGenerator,
    analytics: &AggregateAnalytics,
) -> Option<String> {
    let prompt = prompts::memo_prompt(analytics);

    match generator.generate(&prompt).await {
        Ok(memo) => Some(memo),
        Err(e) => {
            warn!("Memo call failed: {}", e);
            None
        }
    }
}
