//! Fuzz harness for the line parser.
//!
//! Any UTF-8 line either yields the two fields or a `MissingColumn` error
//! naming the line it was given.

#![no_main]

use libfuzzer_sys::fuzz_target;
use visitrank_parse::LineParser;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let parser = LineParser::default();
    for (i, line) in input.lines().enumerate() {
        match parser.parse(i + 1, line) {
            Ok(fields) => {
                assert!(!fields.department.contains(','));
                assert!(!fields.date.contains(','));
            }
            Err(err) => assert_eq!(err.line(), i + 1),
        }
    }
});
