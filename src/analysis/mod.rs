//! Analysis modules.
//!
//! The deterministic core of the pipeline: reply repair, record
//! normalization, aggregation, theme resolution, and evaluation.

pub mod aggregator;
pub mod evaluation;
pub mod normalizer;
pub mod repair;
pub mod themes;

pub use aggregator::{aggregate_records, RecordAggregation};
pub use evaluation::evaluate_system;
pub use normalizer::{normalize_feedback, sentinel_record, FallbackKind};
pub use themes::resolve_themes;
