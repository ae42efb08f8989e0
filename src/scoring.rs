// src/scoring.rs

use crate::models::{MetricRecord, ScoreTriple, ScoredRecord};

/// Yield at or above which a stock is considered at all.
pub const MIN_DIVIDEND_YIELD: f64 = 0.04;
/// Yield that earns the full yield term.
const FULL_YIELD: f64 = 0.06;
const MAX_YIELD_POINTS: f64 = 40.0;

const DIVIDEND_WEIGHT: f64 = 0.6;
const FUNDAMENTALS_WEIGHT: f64 = 0.4;

/// Scores one record. Every input produces a result; values outside their
/// documented range simply fall into the lowest bucket of the affected term.
pub fn score(record: &MetricRecord) -> ScoreTriple {
    let dividend = to_score(calculate_dividend_score(record));
    let fundamentals = to_score(calculate_fundamentals_score(record));

    // Weighted from the rounded sub-scores so the triple is self-consistent
    let overall = to_score(
        f64::from(dividend) * DIVIDEND_WEIGHT + f64::from(fundamentals) * FUNDAMENTALS_WEIGHT,
    );

    ScoreTriple {
        overall,
        dividend,
        fundamentals,
    }
}

pub fn score_all(records: Vec<MetricRecord>) -> Vec<ScoredRecord> {
    records
        .into_iter()
        .map(|record| {
            let scores = score(&record);
            tracing::debug!(
                ticker = %record.ticker,
                overall = scores.overall,
                dividend = scores.dividend,
                fundamentals = scores.fundamentals,
                "scored record"
            );
            ScoredRecord { record, scores }
        })
        .collect()
}

pub fn calculate_dividend_score(record: &MetricRecord) -> f64 {
    yield_points(record.dividend_yield)
        + payout_points(record.payout_ratio)
        + tenure_points(record.consecutive_years)
}

pub fn calculate_fundamentals_score(record: &MetricRecord) -> f64 {
    valuation_points(record.pe_ratio)
        + profitability_points(record.roe)
        + leverage_points(record.debt_to_equity)
}

fn yield_points(dividend_yield: f64) -> f64 {
    if dividend_yield >= MIN_DIVIDEND_YIELD {
        (dividend_yield / FULL_YIELD * MAX_YIELD_POINTS).min(MAX_YIELD_POINTS)
    } else {
        0.0
    }
}

fn payout_points(payout_ratio: f64) -> f64 {
    if payout_ratio < 0.6 {
        30.0
    } else if payout_ratio < 0.8 {
        15.0
    } else {
        0.0
    }
}

fn tenure_points(consecutive_years: u32) -> f64 {
    if consecutive_years >= 25 {
        30.0
    } else if consecutive_years >= 10 {
        15.0
    } else {
        5.0
    }
}

// Negative P/E (loss-making) lands in the cheapest bucket
fn valuation_points(pe_ratio: f64) -> f64 {
    if pe_ratio < 15.0 {
        35.0
    } else if pe_ratio < 25.0 {
        20.0
    } else {
        0.0
    }
}

fn profitability_points(roe: f64) -> f64 {
    if roe >= 0.15 {
        35.0
    } else if roe >= 0.10 {
        20.0
    } else {
        0.0
    }
}

fn leverage_points(debt_to_equity: f64) -> f64 {
    if debt_to_equity < 1.0 {
        30.0
    } else if debt_to_equity < 2.0 {
        15.0
    } else {
        0.0
    }
}

// Round half away from zero. Every term is non-negative and the caps keep the sum within 100.
fn to_score(value: f64) -> u8 {
    value.round() as u8
}
