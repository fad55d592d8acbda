//! Canonical data model for the visitrank pipeline.
//!
//! Defines parsed rows, normalized visit keys, per-department tallies, daily
//! groups, ranked daily results, and run statistics.
//! All other crates depend on these types.

pub mod stats;
pub mod tally;
pub mod visit;
