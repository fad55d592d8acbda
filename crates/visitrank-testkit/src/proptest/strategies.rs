use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use visitrank_schema::visit::VisitKey;

/// Department names drawn by [`strategy_department`].
pub const DEPARTMENTS: [&str; 6] = [
    "Cardiology",
    "ER",
    "ICU",
    "Neurology",
    "Oncology",
    "Pediatrics",
];

/// Dates within a ten-day window starting 2024-02-25 (crosses a month end).
pub fn strategy_naive_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..10).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 2, 25)
            .and_then(|d| d.checked_add_days(Days::new(offset)))
            .unwrap()
    })
}

pub fn strategy_department() -> impl Strategy<Value = String> {
    prop::sample::select(DEPARTMENTS.to_vec()).prop_map(str::to_string)
}

pub fn strategy_visit_key() -> impl Strategy<Value = VisitKey> {
    (strategy_naive_date(), strategy_department()).prop_map(|(date, department)| VisitKey {
        date,
        department,
    })
}

/// Up to `max_len` keys, repeats likely.
pub fn strategy_visit_keys(max_len: usize) -> impl Strategy<Value = Vec<VisitKey>> {
    prop::collection::vec(strategy_visit_key(), 0..=max_len)
}

/// A date written in one of the two accepted input formats.
pub fn strategy_date_text(date: NaiveDate) -> impl Strategy<Value = String> {
    prop_oneof![
        Just(date.format("%d-%m-%Y").to_string()),
        Just(date.format("%d/%m/%Y").to_string()),
    ]
}

/// `(department, raw date)` rows with mixed date formats and some
/// unparseable dates mixed in.
pub fn strategy_visit_rows(max_len: usize) -> impl Strategy<Value = Vec<(String, String)>> {
    let row = (strategy_department(), strategy_naive_date(), 0u8..10).prop_flat_map(
        |(department, date, roll)| {
            let text = if roll == 0 {
                Just("not-a-date".to_string()).boxed()
            } else {
                strategy_date_text(date).boxed()
            };
            (Just(department), text)
        },
    );
    prop::collection::vec(row, 0..=max_len)
}
