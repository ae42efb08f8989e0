// src/ranking.rs

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::ScreenerError;
use crate::models::ScoredRecord;
use crate::scoring::MIN_DIVIDEND_YIELD;

/// Keeps the records whose yield clears the eligibility cutoff (inclusive).
pub fn filter_eligible(records: &[ScoredRecord]) -> Vec<ScoredRecord> {
    records
        .iter()
        .filter(|r| r.record.dividend_yield >= MIN_DIVIDEND_YIELD)
        .cloned()
        .collect()
}

/// Highest overall score first. Ties keep their input order.
pub fn rank_default(records: &[ScoredRecord]) -> Vec<ScoredRecord> {
    rank_by(records, SortKey::Overall, SortDirection::Descending)
}

pub fn rank_by(records: &[ScoredRecord], key: SortKey, direction: SortDirection) -> Vec<ScoredRecord> {
    let mut sorted = records.to_vec();
    match direction {
        SortDirection::Unsorted => {}
        SortDirection::Ascending => sorted.sort_by(|a, b| key.compare(a, b)),
        SortDirection::Descending => sorted.sort_by(|a, b| key.compare(b, a)),
    }
    sorted
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Ticker,
    Name,
    Sector,
    Price,
    Low52,
    High52,
    DividendYield,
    PayoutRatio,
    ConsecutiveYears,
    #[serde(rename = "dividend_growth_5y")]
    DividendGrowth5Y,
    PeRatio,
    Roe,
    DebtToEquity,
    LastUpdated,
    Overall,
    DividendScore,
    FundamentalsScore,
}

// Comparable projection of a single field
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue<'a> {
    Text(&'a str),
    Number(OrderedFloat<f64>),
    Count(u32),
    Date(NaiveDate),
}

impl SortKey {
    pub const ALL: [SortKey; 17] = [
        SortKey::Ticker,
        SortKey::Name,
        SortKey::Sector,
        SortKey::Price,
        SortKey::Low52,
        SortKey::High52,
        SortKey::DividendYield,
        SortKey::PayoutRatio,
        SortKey::ConsecutiveYears,
        SortKey::DividendGrowth5Y,
        SortKey::PeRatio,
        SortKey::Roe,
        SortKey::DebtToEquity,
        SortKey::LastUpdated,
        SortKey::Overall,
        SortKey::DividendScore,
        SortKey::FundamentalsScore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Ticker => "ticker",
            SortKey::Name => "name",
            SortKey::Sector => "sector",
            SortKey::Price => "price",
            SortKey::Low52 => "low52",
            SortKey::High52 => "high52",
            SortKey::DividendYield => "dividend_yield",
            SortKey::PayoutRatio => "payout_ratio",
            SortKey::ConsecutiveYears => "consecutive_years",
            SortKey::DividendGrowth5Y => "dividend_growth_5y",
            SortKey::PeRatio => "pe_ratio",
            SortKey::Roe => "roe",
            SortKey::DebtToEquity => "debt_to_equity",
            SortKey::LastUpdated => "last_updated",
            SortKey::Overall => "overall",
            SortKey::DividendScore => "dividend_score",
            SortKey::FundamentalsScore => "fundamentals_score",
        }
    }

    fn value<'a>(&self, scored: &'a ScoredRecord) -> SortValue<'a> {
        let r = &scored.record;
        match self {
            SortKey::Ticker => SortValue::Text(&r.ticker),
            SortKey::Name => SortValue::Text(&r.name),
            SortKey::Sector => SortValue::Text(&r.sector),
            SortKey::Price => SortValue::Number(OrderedFloat(r.price)),
            SortKey::Low52 => SortValue::Number(OrderedFloat(r.low52)),
            SortKey::High52 => SortValue::Number(OrderedFloat(r.high52)),
            SortKey::DividendYield => SortValue::Number(OrderedFloat(r.dividend_yield)),
            SortKey::PayoutRatio => SortValue::Number(OrderedFloat(r.payout_ratio)),
            SortKey::ConsecutiveYears => SortValue::Count(r.consecutive_years),
            SortKey::DividendGrowth5Y => SortValue::Number(OrderedFloat(r.dividend_growth_5y)),
            SortKey::PeRatio => SortValue::Number(OrderedFloat(r.pe_ratio)),
            SortKey::Roe => SortValue::Number(OrderedFloat(r.roe)),
            SortKey::DebtToEquity => SortValue::Number(OrderedFloat(r.debt_to_equity)),
            SortKey::LastUpdated => SortValue::Date(r.last_updated),
            SortKey::Overall => SortValue::Count(scored.scores.overall.into()),
            SortKey::DividendScore => SortValue::Count(scored.scores.dividend.into()),
            SortKey::FundamentalsScore => SortValue::Count(scored.scores.fundamentals.into()),
        }
    }

    pub fn compare(&self, a: &ScoredRecord, b: &ScoredRecord) -> Ordering {
        self.value(a).cmp(&self.value(b))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ScreenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let alias = match wanted.as_str() {
            "yield" => Some(SortKey::DividendYield),
            "payout" => Some(SortKey::PayoutRatio),
            "years" => Some(SortKey::ConsecutiveYears),
            "growth" => Some(SortKey::DividendGrowth5Y),
            "pe" => Some(SortKey::PeRatio),
            "debt" => Some(SortKey::DebtToEquity),
            "updated" => Some(SortKey::LastUpdated),
            "score" => Some(SortKey::Overall),
            _ => None,
        };
        alias
            .or_else(|| SortKey::ALL.into_iter().find(|key| key.as_str() == wanted))
            .ok_or_else(|| ScreenerError::UnknownSortKey(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Unsorted,
    Ascending,
    Descending,
}

impl FromStr for SortDirection {
    type Err = ScreenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            "none" | "unsorted" => Ok(SortDirection::Unsorted),
            _ => Err(ScreenerError::UnknownSortDirection(s.to_string())),
        }
    }
}

/// Column sort selection of an interactive table.
///
/// Activating the selected key cycles Unsorted -> Ascending -> Descending -> Unsorted.
/// Activating any other key selects it in Ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    // The list is presented in default rank order
    fn default() -> Self {
        Self {
            key: SortKey::Overall,
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub fn unsorted(key: SortKey) -> Self {
        Self::new(key, SortDirection::Unsorted)
    }

    pub fn activate(self, key: SortKey) -> Self {
        if key != self.key {
            return Self::new(key, SortDirection::Ascending);
        }
        let direction = match self.direction {
            SortDirection::Unsorted => SortDirection::Ascending,
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Unsorted,
        };
        Self::new(key, direction)
    }

    pub fn is_active(&self) -> bool {
        self.direction != SortDirection::Unsorted
    }

    pub fn apply(&self, records: &[ScoredRecord]) -> Vec<ScoredRecord> {
        rank_by(records, self.key, self.direction)
    }
}
