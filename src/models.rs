// src/models.rs

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use validator::Validate;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Consecutive years of dividend increases that earn the "aristocrat" label.
pub const ARISTOCRAT_YEARS: u32 = 25;

// Custom function to convert a JSON string to a NaiveDate
fn string_to_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(serde::de::Error::custom)
}

fn date_to_string<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
}

// One equity as written by the data sync job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    #[validate(length(min = 1, max = 10))]
    pub ticker: String,
    #[validate(length(min = 1))]
    pub name: String,
    pub price: f64,
    pub dividend_yield: f64,   // 0.04 = 4%
    pub payout_ratio: f64,     // 0.60 = 60%
    pub consecutive_years: u32,
    pub pe_ratio: f64,
    pub roe: f64,
    pub debt_to_equity: f64,
    pub low52: f64,
    pub high52: f64,
    pub sector: String,
    #[serde(rename = "dividendGrowth5Y")]
    pub dividend_growth_5y: f64, // 0.05 = 5% growth
    pub description: String,
    #[serde(deserialize_with = "string_to_date", serialize_with = "date_to_string")]
    pub last_updated: NaiveDate,
}

impl MetricRecord {
    pub fn is_aristocrat(&self) -> bool {
        self.consecutive_years >= ARISTOCRAT_YEARS
    }

    /// Where the price sits inside its 52-week band, 0.0 at the low and 1.0 at the high.
    ///
    /// Upstream data does not guarantee `low52 <= price <= high52`, so the result is
    /// not clamped. Returns `None` when the band is empty or inverted.
    pub fn range_position(&self) -> Option<f64> {
        let width = self.high52 - self.low52;
        if width > 0.0 {
            Some((self.price - self.low52) / width)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreTriple {
    pub overall: u8,      // 0-100
    pub dividend: u8,     // 0-100
    pub fundamentals: u8, // 0-100
}

impl ScoreTriple {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_overall(self.overall)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Strong,
    Moderate,
    Weak,
}

impl ScoreBand {
    pub fn from_overall(overall: u8) -> Self {
        if overall > 70 {
            ScoreBand::Strong
        } else if overall > 40 {
            ScoreBand::Moderate
        } else {
            ScoreBand::Weak
        }
    }
}

// A record together with the scores computed for it during one refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: MetricRecord,
    pub scores: ScoreTriple,
}

impl ScoredRecord {
    pub fn ticker(&self) -> &str {
        &self.record.ticker
    }
}

pub fn find_by_ticker<'a>(records: &'a [ScoredRecord], ticker: &str) -> Option<&'a ScoredRecord> {
    records.iter().find(|r| r.record.ticker == ticker)
}

/// Most recent `last_updated` date across the collection.
pub fn last_synced(records: &[ScoredRecord]) -> Option<NaiveDate> {
    records.iter().map(|r| r.record.last_updated).max()
}
