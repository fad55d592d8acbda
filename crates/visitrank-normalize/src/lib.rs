//! Date normalization for visitrank.
//!
//! Tries an ordered list of day-month-year formats against a free-form date
//! string and returns the first match as a calendar date. A string that no
//! format matches yields `None`; it is never an error.

use chrono::{Datelike, NaiveDate};
use visitrank_schema::visit::canonical_date;

/// Formats tried when none are configured, in priority order.
pub const DEFAULT_DATE_FORMATS: [&str; 2] = ["%d-%m-%Y", "%d/%m/%Y"];

/// Earliest year a normalized date may carry; year 0 does not exist.
pub const MIN_YEAR: i32 = 1;

/// Ordered, first-match-wins date parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateNormalizer {
    formats: Vec<String>,
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl DateNormalizer {
    /// Normalizer with [`DEFAULT_DATE_FORMATS`].
    pub fn new() -> Self {
        Self::with_formats(DEFAULT_DATE_FORMATS)
    }

    /// Normalizer with a caller-supplied format list, tried in order.
    pub fn with_formats<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            formats: formats.into_iter().map(Into::into).collect(),
        }
    }

    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    /// Parse `raw` after trimming leading and trailing whitespace.
    ///
    /// Internal whitespace is kept, so `"05 -03-2024"` matches nothing.
    pub fn normalize(&self, raw: &str) -> Option<NaiveDate> {
        let input = raw.trim();
        self.formats
            .iter()
            .find_map(|fmt| parse_strict(input, fmt))
    }

    /// Same as [`normalize`](Self::normalize), rendered as `YYYY-MM-DD`.
    pub fn normalize_to_string(&self, raw: &str) -> Option<String> {
        self.normalize(raw).map(canonical_date)
    }
}

/// Normalize with the default formats.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    DateNormalizer::new().normalize(raw)
}

/// Normalize with the default formats and render as `YYYY-MM-DD`.
pub fn normalize_date_string(raw: &str) -> Option<String> {
    normalize_date(raw).map(canonical_date)
}

fn parse_strict(input: &str, format: &str) -> Option<NaiveDate> {
    if !matches_shape(input, format) {
        return None;
    }
    NaiveDate::parse_from_str(input, format)
        .ok()
        .filter(|date| date.year() >= MIN_YEAR)
}

/// Checks digit widths and literals before chrono sees the input.
///
/// chrono is lenient about whitespace before numbers and about year width;
/// `%d`/`%m` must be one or two digits and `%Y` exactly four. Specifiers
/// outside that set are left to chrono.
fn matches_shape(input: &str, format: &str) -> bool {
    let mut rest = input;
    let mut spec = format.chars();
    while let Some(c) = spec.next() {
        if c != '%' {
            match rest.strip_prefix(c) {
                Some(r) => rest = r,
                None => return false,
            }
            continue;
        }
        let (min, max) = match spec.next() {
            Some('d') | Some('m') => (1, 2),
            Some('Y') => (4, 4),
            _ => return true,
        };
        let digits = rest
            .bytes()
            .take(max)
            .take_while(u8::is_ascii_digit)
            .count();
        if digits < min {
            return false;
        }
        rest = &rest[digits..];
    }
    rest.is_empty()
}
