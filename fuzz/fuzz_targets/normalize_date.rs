//! Fuzz harness for the date normalizer.
//!
//! A recognised date must survive a round trip through its canonical form
//! written back in the first default format.

#![no_main]

use libfuzzer_sys::fuzz_target;
use visitrank_normalize::normalize_date;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    if let Some(date) = normalize_date(input) {
        let rewritten = date.format("%d-%m-%Y").to_string();
        assert_eq!(normalize_date(&rewritten), Some(date));
    }
});
