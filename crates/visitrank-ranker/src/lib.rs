//! Top-N ranking for visitrank.
//!
//! Picks the `n` tallies with the highest counts using a bounded min-heap.
//! Among equal counts the tally that comes first in the input wins, both for
//! membership in the top `n` and for its place in the output.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use visitrank_schema::tally::{DailyGroup, DailyTop, DepartmentTally};

/// Departments reported per day when nothing else is configured.
pub const DEFAULT_TOP_N: usize = 3;

/// Heap entry: higher count is better, then earlier position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    count: u64,
    position: usize,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.count
            .cmp(&other.count)
            .then_with(|| other.position.cmp(&self.position))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The `n` largest tallies, count descending, ties in input order.
///
/// Returns every tally (sorted) when there are fewer than `n`.
pub fn top_n(tallies: &[DepartmentTally], n: usize) -> Vec<DepartmentTally> {
    if n == 0 {
        return Vec::new();
    }

    // Min-heap of the best `n` seen so far; the root is the weakest keeper.
    let mut heap: BinaryHeap<Reverse<Candidate>> = BinaryHeap::with_capacity(n + 1);
    for (position, tally) in tallies.iter().enumerate() {
        heap.push(Reverse(Candidate {
            count: tally.count,
            position,
        }));
        if heap.len() > n {
            heap.pop();
        }
    }

    // Ascending order of Reverse<_> is descending order of Candidate.
    heap.into_sorted_vec()
        .into_iter()
        .map(|Reverse(c)| tallies[c.position].clone())
        .collect()
}

/// Applies [`top_n`] to whole daily groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopNRanker {
    pub n: usize,
}

impl Default for TopNRanker {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}

impl TopNRanker {
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    pub fn rank(&self, group: &DailyGroup) -> DailyTop {
        DailyTop::new(group.date, top_n(&group.tallies, self.n))
    }

    pub fn rank_all<I>(&self, groups: I) -> Vec<DailyTop>
    where
        I: IntoIterator<Item = DailyGroup>,
    {
        groups.into_iter().map(|g| self.rank(&g)).collect()
    }
}
