//! Filtering stages for visitrank.
//!
//! Two pure predicates: the validity filter drops visits whose date did not
//! normalize, the completeness filter drops days with too few ranked
//! departments. Neither has side effects.

use visitrank_schema::tally::DailyTop;
use visitrank_schema::visit::{NormalizedVisit, VisitKey};

/// Departments a day needs before it is reported.
pub const DEFAULT_MIN_DEPARTMENTS: usize = 3;

/// True when the visit has a canonical date.
pub fn is_valid(visit: &NormalizedVisit) -> bool {
    visit.has_date()
}

/// Keep visits with a date and turn them into counting keys.
pub fn valid_keys<I>(visits: I) -> impl Iterator<Item = VisitKey>
where
    I: IntoIterator<Item = NormalizedVisit>,
{
    visits.into_iter().filter_map(NormalizedVisit::into_key)
}

/// Keeps days with at least `min_departments` ranked tallies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompletenessFilter {
    pub min_departments: usize,
}

impl Default for CompletenessFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DEPARTMENTS)
    }
}

impl CompletenessFilter {
    pub fn new(min_departments: usize) -> Self {
        Self { min_departments }
    }

    pub fn accepts(&self, top: &DailyTop) -> bool {
        top.len() >= self.min_departments
    }

    /// Split results into the kept days and the number dropped.
    pub fn apply(&self, results: Vec<DailyTop>) -> (Vec<DailyTop>, usize) {
        let before = results.len();
        let kept: Vec<DailyTop> = results.into_iter().filter(|t| self.accepts(t)).collect();
        let dropped = before - kept.len();
        (kept, dropped)
    }
}
