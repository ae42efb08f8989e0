// src/lib.rs

pub mod config;
pub mod error;
pub mod history;
pub mod loader;
pub mod models;
pub mod ranking;
pub mod scoring;

use std::path::Path;

use tracing::info;

pub use error::{Result, ScreenerError};
pub use models::{MetricRecord, ScoreBand, ScoreTriple, ScoredRecord};
pub use ranking::{filter_eligible, rank_by, rank_default, SortDirection, SortKey, SortState};
pub use scoring::score;

/// Scores every record, drops the ineligible ones and returns the rest in
/// default rank order. Nothing from a previous refresh is reused.
pub fn refresh(records: Vec<MetricRecord>) -> Vec<ScoredRecord> {
    let total = records.len();
    let scored = scoring::score_all(records);
    let eligible = filter_eligible(&scored);
    info!(total, eligible = eligible.len(), "refreshed rankings");
    rank_default(&eligible)
}

pub fn load_and_refresh(path: impl AsRef<Path>) -> Result<Vec<ScoredRecord>> {
    let records = loader::load_records(path)?;
    Ok(refresh(records))
}
