// src/loader.rs

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info};
use validator::Validate;

use crate::error::{Result, ScreenerError};
use crate::models::MetricRecord;

/// Reads the JSON array written by the sync job.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<MetricRecord>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let records = parse_records(&contents)?;
    info!(path = %path.display(), count = records.len(), "loaded stock data");
    Ok(records)
}

/// Parses and validates a JSON array of records. Missing or non-numeric
/// fields are rejected rather than defaulted.
pub fn parse_records(json: &str) -> Result<Vec<MetricRecord>> {
    let records: Vec<MetricRecord> = serde_json::from_str(json)?;
    validate_records(&records)?;
    debug!(count = records.len(), "parsed stock records");
    Ok(records)
}

pub fn validate_records(records: &[MetricRecord]) -> Result<()> {
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for (index, record) in records.iter().enumerate() {
        record.validate().map_err(|source| ScreenerError::Validation {
            index,
            ticker: record.ticker.clone(),
            source,
        })?;

        if let Some(&first) = seen.get(record.ticker.as_str()) {
            return Err(ScreenerError::DuplicateTicker {
                ticker: record.ticker.clone(),
                first,
                second: index,
            });
        }
        seen.insert(&record.ticker, index);
    }

    Ok(())
}
