//! Aggregation and technical-debt scoring
//!
//! Turns detector evidence into per-file analyses and workspace summaries.

mod aggregator;
mod cancel;
pub mod catalog;
mod scoring;
mod summary;

pub use aggregator::Aggregator;
pub use cancel::CancellationToken;
pub use catalog::{lookup, SmellInfo};
pub use scoring::debt_score;
pub use summary::{merge_counts, workspace_recommendations, Tally};
