//! Property tests for visitrank-ranker.
//!
//! The heap selection is checked against a stable sort, which is the
//! simplest correct statement of "largest n, ties in input order".

use proptest::prelude::*;
use visitrank_ranker::top_n;
use visitrank_schema::tally::DepartmentTally;

fn strategy_tallies() -> impl Strategy<Value = Vec<DepartmentTally>> {
    // Small count range so ties are common.
    proptest::collection::vec(0u64..6, 0..20).prop_map(|counts| {
        counts
            .into_iter()
            .enumerate()
            .map(|(i, c)| DepartmentTally::new(format!("dept-{i}"), c + 1))
            .collect()
    })
}

fn reference_top_n(tallies: &[DepartmentTally], n: usize) -> Vec<DepartmentTally> {
    let mut sorted = tallies.to_vec();
    sorted.sort_by(|a, b| b.count.cmp(&a.count));
    sorted.truncate(n);
    sorted
}

proptest! {
    #[test]
    fn prop_matches_stable_sort(tallies in strategy_tallies(), n in 0usize..6) {
        prop_assert_eq!(top_n(&tallies, n), reference_top_n(&tallies, n));
    }

    #[test]
    fn prop_length_is_min_of_n_and_input(tallies in strategy_tallies(), n in 0usize..6) {
        prop_assert_eq!(top_n(&tallies, n).len(), n.min(tallies.len()));
    }

    #[test]
    fn prop_output_non_increasing(tallies in strategy_tallies()) {
        let top = top_n(&tallies, 3);
        prop_assert!(top.windows(2).all(|w| w[0].count >= w[1].count));
    }
}
