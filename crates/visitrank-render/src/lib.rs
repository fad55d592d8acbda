//! Line renderers for ranked daily results.
//!
//! Each renderer turns one [`DailyTop`] into exactly one line of text.
//! Output is deterministic for a given result.

use anyhow::{Context, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use visitrank_ports::LineRenderer;
use visitrank_schema::tally::DailyTop;
use visitrank_schema::visit::canonical_date;

/// Text shape of each output line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `('2024-03-05', [('Cardiology', 2), ('ER', 1), ('ICU', 1)])`
    #[default]
    Tuple,
    /// `2024-03-05,Cardiology,2,ER,1,ICU,1`
    Csv,
    /// `{"date":"2024-03-05","top":[{"department":"Cardiology","count":2},...]}`
    Jsonl,
}

impl OutputFormat {
    /// Conventional file suffix for shard names.
    pub fn default_suffix(&self) -> &'static str {
        match self {
            OutputFormat::Tuple => "",
            OutputFormat::Csv => ".csv",
            OutputFormat::Jsonl => ".jsonl",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Tuple => write!(f, "tuple"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tuple" => Ok(OutputFormat::Tuple),
            "csv" => Ok(OutputFormat::Csv),
            "jsonl" | "json" => Ok(OutputFormat::Jsonl),
            other => Err(format!("unknown output format: {other} (expected tuple, csv or jsonl)")),
        }
    }
}

/// Renderer for a given format.
pub fn renderer_for(format: OutputFormat) -> Box<dyn LineRenderer + Send + Sync> {
    match format {
        OutputFormat::Tuple => Box::new(TupleRenderer),
        OutputFormat::Csv => Box::new(CsvRenderer::default()),
        OutputFormat::Jsonl => Box::new(JsonlRenderer),
    }
}

/// Tuple-literal form: the date followed by a list of
/// `(department, count)` pairs.
pub struct TupleRenderer;

impl LineRenderer for TupleRenderer {
    fn render_line(&self, top: &DailyTop) -> Result<String> {
        let pairs = top
            .top
            .iter()
            .map(|t| format!("({}, {})", quote_literal(&t.department), t.count))
            .join(", ");
        Ok(format!(
            "({}, [{}])",
            quote_literal(&canonical_date(top.date)),
            pairs
        ))
    }
}

/// Flat delimited form: date, then department and count alternating.
///
/// No quoting is applied, matching the input side.
pub struct CsvRenderer {
    pub delimiter: char,
}

impl Default for CsvRenderer {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl LineRenderer for CsvRenderer {
    fn render_line(&self, top: &DailyTop) -> Result<String> {
        let sep = self.delimiter.to_string();
        let mut fields = vec![canonical_date(top.date)];
        for t in &top.top {
            fields.push(t.department.clone());
            fields.push(t.count.to_string());
        }
        Ok(fields.join(&sep))
    }
}

/// One JSON object per line.
pub struct JsonlRenderer;

impl LineRenderer for JsonlRenderer {
    fn render_line(&self, top: &DailyTop) -> Result<String> {
        serde_json::to_string(top).with_context(|| format!("serialize result for {}", top.date))
    }
}

/// Quote a string as a single-quoted literal, falling back to double quotes.
///
/// Single quotes unless the text contains a single quote and no double quote.
fn quote_literal(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
