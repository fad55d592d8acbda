//! Property tests for visitrank-normalize.

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;
use visitrank_normalize::{DateNormalizer, normalize_date, normalize_date_string};

fn strategy_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..60_000).prop_map(|days| {
        NaiveDate::from_ymd_opt(1900, 1, 1).unwrap() + chrono::Days::new(days)
    })
}

proptest! {
    /// Both supported separators land on the same calendar date.
    #[test]
    fn prop_dash_and_slash_agree(date in strategy_date()) {
        let dash = format!("{:02}-{:02}-{:04}", date.day(), date.month(), date.year());
        let slash = format!("{:02}/{:02}/{:04}", date.day(), date.month(), date.year());
        prop_assert_eq!(normalize_date(&dash), Some(date));
        prop_assert_eq!(normalize_date(&slash), Some(date));
    }

    /// Canonical output is what the formatter would have produced.
    #[test]
    fn prop_canonical_string_round_trips(date in strategy_date()) {
        let raw = format!("{}-{}-{:04}", date.day(), date.month(), date.year());
        let expected = date.format("%Y-%m-%d").to_string();
        prop_assert_eq!(normalize_date_string(&raw), Some(expected));
    }

    /// Already-canonical dates are not one of the accepted input shapes.
    #[test]
    fn prop_iso_input_is_absent(date in strategy_date()) {
        let iso = date.format("%Y-%m-%d").to_string();
        prop_assert_eq!(normalize_date(&iso), None);
    }

    /// Month above 12 never parses.
    #[test]
    fn prop_month_out_of_range_is_absent(d in 1u32..29, m in 13u32..100, y in 1900i32..2100) {
        let raw = format!("{:02}-{:02}-{:04}", d, m, y);
        prop_assert_eq!(normalize_date(&raw), None);
    }

    /// The normalizer never panics on arbitrary text.
    #[test]
    fn prop_arbitrary_input_does_not_panic(raw in "\\PC{0,20}") {
        let _ = DateNormalizer::new().normalize(&raw);
    }
}
