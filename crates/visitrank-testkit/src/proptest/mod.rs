//! Proptest strategies for visitrank property-based testing.
//!
//! Dates and departments come from small pools so that generated inputs
//! repeat keys often enough to exercise counting and tie-breaking.

pub mod strategies;

pub use strategies::{
    DEPARTMENTS, strategy_date_text, strategy_department, strategy_naive_date,
    strategy_visit_key, strategy_visit_keys, strategy_visit_rows,
};
