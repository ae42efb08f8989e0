//! Property-based tests for scoring and ranking
//!
//! These tests verify invariants that should hold for all inputs:
//! - The overall score is the weighted blend of the two sub-scores
//! - Every score stays within [0, 100]
//! - Filtering is idempotent and order preserving
//! - Sorting is stable and the toggle cycle returns to the input order

use chrono::NaiveDate;
use more_asserts::assert_le;
use proptest::prelude::*;

use dividend_screener::{
    filter_eligible, rank_by, rank_default, score, MetricRecord, ScoredRecord, SortDirection, SortKey,
    SortState,
};

/// Generate a record with metrics spread well past their usual ranges
fn metric_record() -> impl Strategy<Value = MetricRecord> {
    (
        "[A-Z]{1,5}",
        (-0.2f64..0.3, -1.0f64..3.0, 0u32..80),
        (-50.0f64..120.0, -0.5f64..0.8, 0.0f64..6.0),
        (1.0f64..500.0, -0.3f64..0.4),
    )
        .prop_map(
            |(ticker, (dividend_yield, payout_ratio, consecutive_years), (pe_ratio, roe, debt_to_equity), (price, growth))| {
                MetricRecord {
                    name: format!("{} Holdings", ticker),
                    ticker,
                    price,
                    dividend_yield,
                    payout_ratio,
                    consecutive_years,
                    pe_ratio,
                    roe,
                    debt_to_equity,
                    low52: price * 0.8,
                    high52: price * 1.2,
                    sector: "Financials".to_string(),
                    dividend_growth_5y: growth,
                    description: String::new(),
                    last_updated: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                }
            },
        )
}

fn scored_records() -> impl Strategy<Value = Vec<ScoredRecord>> {
    prop::collection::vec(metric_record(), 0..40).prop_map(|records| {
        records
            .into_iter()
            .enumerate()
            .map(|(i, mut record)| {
                // Unique tickers so input positions can be tracked
                record.ticker = format!("{}{}", record.ticker, i);
                let scores = score(&record);
                ScoredRecord { record, scores }
            })
            .collect()
    })
}

fn sort_key() -> impl Strategy<Value = SortKey> {
    prop::sample::select(SortKey::ALL.to_vec())
}

fn position(records: &[ScoredRecord], ticker: &str) -> usize {
    records.iter().position(|r| r.ticker() == ticker).unwrap()
}

proptest! {
    #[test]
    fn prop_overall_is_weighted_blend(record in metric_record()) {
        let s = score(&record);
        let expected = (f64::from(s.dividend) * 0.6 + f64::from(s.fundamentals) * 0.4).round() as u8;
        prop_assert_eq!(s.overall, expected);
    }

    #[test]
    fn prop_scores_are_bounded(record in metric_record()) {
        let s = score(&record);
        assert_le!(s.dividend, 100);
        assert_le!(s.fundamentals, 100);
        assert_le!(s.overall, 100);
    }

    #[test]
    fn prop_score_is_deterministic(record in metric_record()) {
        prop_assert_eq!(score(&record), score(&record.clone()));
    }

    #[test]
    fn prop_filter_is_idempotent(records in scored_records()) {
        let once = filter_eligible(&records);
        prop_assert_eq!(filter_eligible(&once), once.clone());
        prop_assert!(once.iter().all(|r| r.record.dividend_yield >= 0.04));

        // Survivors keep their relative order
        let positions: Vec<usize> = once.iter().map(|r| position(&records, r.ticker())).collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prop_rank_default_is_stable(records in scored_records()) {
        let ranked = rank_default(&records);
        prop_assert_eq!(ranked.len(), records.len());
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].scores.overall >= pair[1].scores.overall);
            if pair[0].scores.overall == pair[1].scores.overall {
                prop_assert!(position(&records, pair[0].ticker()) < position(&records, pair[1].ticker()));
            }
        }
    }

    #[test]
    fn prop_rank_by_orders_and_keeps_ties(records in scored_records(), key in sort_key()) {
        let ascending = rank_by(&records, key, SortDirection::Ascending);
        let descending = rank_by(&records, key, SortDirection::Descending);

        for pair in ascending.windows(2) {
            let ord = key.compare(&pair[0], &pair[1]);
            prop_assert!(ord.is_le());
            if ord.is_eq() {
                prop_assert!(position(&records, pair[0].ticker()) < position(&records, pair[1].ticker()));
            }
        }
        for pair in descending.windows(2) {
            let ord = key.compare(&pair[0], &pair[1]);
            prop_assert!(ord.is_ge());
            if ord.is_eq() {
                prop_assert!(position(&records, pair[0].ticker()) < position(&records, pair[1].ticker()));
            }
        }
    }

    #[test]
    fn prop_toggle_cycle_restores_order(records in scored_records(), key in sort_key(), other in sort_key()) {
        let start = SortState::unsorted(key);
        let cycled = start.activate(key).activate(key).activate(key);
        prop_assert_eq!(cycled, start);
        prop_assert_eq!(cycled.apply(&records), records.clone());

        let switched = SortState::new(key, SortDirection::Descending).activate(other);
        if other != key {
            prop_assert_eq!(switched.direction, SortDirection::Ascending);
        }
    }
}
