// src/history.rs

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Growth assumed when the history is too short to measure it.
pub const DEFAULT_GROWTH_5Y: f64 = 0.05;
/// A year still counts as an increase if it is within 2% of the prior year.
const INCREASE_TOLERANCE: f64 = 0.98;
const GROWTH_YEARS: usize = 5;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Invalid date format encountered: {0}")]
    InvalidDateFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividendMetrics {
    pub consecutive_years: u32,
    pub growth_5y: f64,
}

impl Default for DividendMetrics {
    fn default() -> Self {
        Self {
            consecutive_years: 0,
            growth_5y: DEFAULT_GROWTH_5Y,
        }
    }
}

/// Derives the tenure and growth metrics from a list of (date, amount) dividend payments.
pub fn dividend_metrics(
    payments: &[(String, f64)],
    current_date: Option<NaiveDate>,
) -> Result<DividendMetrics, HistoryError> {
    let annual: Vec<f64> = annual_totals(payments, current_date)?
        .into_iter()
        .map(|(_, total)| total)
        .collect();

    if annual.len() < 2 {
        return Ok(DividendMetrics::default());
    }

    Ok(DividendMetrics {
        consecutive_years: consecutive_increase_years(&annual),
        growth_5y: five_year_growth(&annual),
    })
}

/// Sums payments per calendar year, oldest first.
///
/// Non-positive amounts are ignored, years without payments between the first
/// and last paying year count as zero, and the current year is dropped since it
/// is still incomplete.
pub fn annual_totals(
    payments: &[(String, f64)],
    current_date: Option<NaiveDate>,
) -> Result<Vec<(i32, f64)>, HistoryError> {
    let now = current_date.unwrap_or_else(|| Utc::now().naive_utc().date());

    let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
    for (date_str, amount) in payments {
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|_| HistoryError::InvalidDateFormat(date_str.clone()))?;
        if *amount > 0.0 {
            *totals.entry(date.year()).or_insert(0.0) += amount;
        }
    }

    let (first, last) = match (totals.keys().next(), totals.keys().next_back()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Ok(Vec::new()),
    };

    let mut annual: Vec<(i32, f64)> = (first..=last)
        .map(|year| (year, totals.get(&year).copied().unwrap_or(0.0)))
        .collect();

    if annual.last().map(|(year, _)| *year) == Some(now.year()) {
        annual.pop();
    }

    Ok(annual)
}

/// Counts how many of the most recent years did not cut the dividend,
/// walking back from the newest year until the first decrease.
pub fn consecutive_increase_years(annual: &[f64]) -> u32 {
    annual
        .windows(2)
        .rev()
        .take_while(|pair| pair[1] >= pair[0] * INCREASE_TOLERANCE)
        .count() as u32
}

/// Five-year compound growth of the annual dividend.
pub fn five_year_growth(annual: &[f64]) -> f64 {
    if annual.len() <= GROWTH_YEARS {
        return DEFAULT_GROWTH_5Y;
    }
    let now = annual[annual.len() - 1];
    let past = annual[annual.len() - 1 - GROWTH_YEARS];
    if past > 0.0 {
        (now / past).powf(1.0 / GROWTH_YEARS as f64) - 1.0
    } else {
        DEFAULT_GROWTH_5Y
    }
}

// Some providers report payout ratios as percentages (58.0 rather than 0.58)
pub fn normalize_payout_ratio(raw: f64) -> f64 {
    if raw > 2.0 {
        raw / 100.0
    } else {
        raw
    }
}

// Debt/equity arrives as a percentage
pub fn normalize_debt_to_equity(raw: f64) -> f64 {
    raw / 100.0
}

/// Yield from the annual dividend rate and price, or the provider's reported
/// yield when either is missing. Reported yields above 1 are percentages.
pub fn derive_yield(dividend_rate: Option<f64>, price: Option<f64>, reported: Option<f64>) -> f64 {
    match (dividend_rate, price) {
        (Some(rate), Some(price)) if rate > 0.0 && price > 0.0 => rate / price,
        _ => match reported {
            Some(y) if y > 1.0 => y / 100.0,
            Some(y) => y,
            None => 0.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn quarterly(year: i32, amount: f64) -> Vec<(String, f64)> {
        ["03", "06", "09", "12"]
            .iter()
            .map(|month| (format!("{}-{}-15", year, month), amount))
            .collect()
    }

    #[test]
    fn test_annual_totals_drops_current_year() {
        let mut payments = quarterly(2022, 0.25);
        payments.extend(quarterly(2023, 0.26));
        payments.push(("2024-03-15".to_string(), 0.27));

        let annual = annual_totals(&payments, date(2024, 5, 1)).unwrap();
        assert_eq!(annual.len(), 2);
        assert_eq!(annual[0].0, 2022);
        assert!((annual[0].1 - 1.0).abs() < 1e-9);
        assert!((annual[1].1 - 1.04).abs() < 1e-9);
    }

    #[test]
    fn test_annual_totals_fills_gaps_and_skips_zero_amounts() {
        let payments = vec![
            ("2019-06-01".to_string(), 1.0),
            ("2020-06-01".to_string(), 0.0),
            ("2021-06-01".to_string(), 1.2),
        ];
        let annual = annual_totals(&payments, date(2024, 1, 1)).unwrap();
        assert_eq!(annual, vec![(2019, 1.0), (2020, 0.0), (2021, 1.2)]);
    }

    #[test]
    fn test_invalid_date_in_history() {
        let payments = vec![
            ("2019-06-01".to_string(), 1.0),
            ("invalid-date".to_string(), 1.0),
        ];
        match annual_totals(&payments, date(2024, 1, 1)) {
            Err(HistoryError::InvalidDateFormat(s)) => assert_eq!(s, "invalid-date"),
            other => panic!("Expected InvalidDateFormat error, got {:?}", other),
        }
    }

    #[test]
    fn test_consecutive_increase_years() {
        // Newest last: a cut in the middle stops the count
        assert_eq!(consecutive_increase_years(&[1.0, 0.5, 0.6, 0.7, 0.8]), 3);
        // Within the 2% tolerance still counts
        assert_eq!(consecutive_increase_years(&[1.0, 1.0, 0.99]), 2);
        assert_eq!(consecutive_increase_years(&[1.0, 0.9]), 0);
        assert_eq!(consecutive_increase_years(&[1.0]), 0);
        assert_eq!(consecutive_increase_years(&[]), 0);
    }

    #[test]
    fn test_five_year_growth() {
        let annual = [1.0, 1.1, 1.2, 1.3, 1.4, 2.0];
        let epsilon = 0.0001;
        assert!((five_year_growth(&annual) - (2.0f64.powf(0.2) - 1.0)).abs() < epsilon);

        assert_eq!(five_year_growth(&[1.0, 1.1, 1.2]), DEFAULT_GROWTH_5Y);
        assert_eq!(five_year_growth(&[0.0, 1.0, 1.0, 1.0, 1.0, 1.0]), DEFAULT_GROWTH_5Y);
    }

    #[test]
    fn test_dividend_metrics_short_history_uses_defaults() {
        let metrics = dividend_metrics(&quarterly(2023, 0.5), date(2024, 2, 1)).unwrap();
        assert_eq!(metrics, DividendMetrics::default());

        let empty = dividend_metrics(&[], date(2024, 2, 1)).unwrap();
        assert_eq!(empty, DividendMetrics::default());
    }

    #[test]
    fn test_dividend_metrics_growing_history() {
        let mut payments = Vec::new();
        for (i, year) in (2014..=2023).enumerate() {
            payments.extend(quarterly(year, 0.20 + 0.01 * i as f64));
        }
        let metrics = dividend_metrics(&payments, date(2024, 3, 1)).unwrap();
        assert_eq!(metrics.consecutive_years, 9);
        assert!(metrics.growth_5y > 0.0);
    }

    #[test]
    fn test_normalizers() {
        assert_eq!(normalize_payout_ratio(0.58), 0.58);
        assert_eq!(normalize_payout_ratio(2.0), 2.0);
        assert!((normalize_payout_ratio(689.0) - 6.89).abs() < 1e-9);
        assert!((normalize_debt_to_equity(150.0) - 1.5).abs() < 1e-9);

        assert!((derive_yield(Some(2.0), Some(50.0), None) - 0.04).abs() < 1e-9);
        assert!((derive_yield(None, Some(50.0), Some(4.5)) - 0.045).abs() < 1e-9);
        assert_eq!(derive_yield(Some(0.0), Some(50.0), Some(0.03)), 0.03);
        assert_eq!(derive_yield(None, None, None), 0.0);
    }
}
