//! Property-based tests for the assignment engine.

use chrono::{Duration, Utc};
use proptest::prelude::*;
use uuid::Uuid;

use crate::assignment::engine::AssignmentEngine;
use crate::assignment::types::CandidateOrder;
use crate::workflow::types::Priority;

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Low),
        Just(Priority::Normal),
        Just(Priority::High),
        Just(Priority::Urgent),
    ]
}

fn arb_candidate() -> impl Strategy<Value = CandidateOrder> {
    (any::<u128>(), arb_priority(), 0i64..100_000).prop_map(|(id, priority, age)| CandidateOrder {
        id: Uuid::from_u128(id),
        priority,
        queued_at: Utc::now() - Duration::seconds(age),
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Ranking is a permutation: nothing added, nothing dropped.
    #[test]
    fn prop_rank_is_permutation(candidates in prop::collection::vec(arb_candidate(), 0..50)) {
        let ranked = AssignmentEngine::rank(candidates.clone());
        prop_assert_eq!(ranked.len(), candidates.len());
        for c in &candidates {
            prop_assert!(ranked.iter().any(|r| r.id == c.id));
        }
    }

    /// Adjacent ranked pairs respect priority desc, queued_at asc, id asc.
    #[test]
    fn prop_rank_ordering_holds(candidates in prop::collection::vec(arb_candidate(), 0..50)) {
        let ranked = AssignmentEngine::rank(candidates);
        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(
                a.priority > b.priority
                    || (a.priority == b.priority && a.queued_at < b.queued_at)
                    || (a.priority == b.priority
                        && a.queued_at == b.queued_at
                        && a.id <= b.id)
            );
        }
    }

    /// Ranking is deterministic across shuffles of the same snapshot.
    #[test]
    fn prop_rank_is_deterministic(
        candidates in prop::collection::vec(arb_candidate(), 0..30),
        seed in any::<u64>(),
    ) {
        let mut shuffled = candidates.clone();
        // Cheap deterministic shuffle keyed on the seed.
        let len = shuffled.len();
        if len > 1 {
            for i in 0..len {
                let j = (seed as usize).wrapping_mul(31).wrapping_add(i) % len;
                shuffled.swap(i, j);
            }
        }
        let a = AssignmentEngine::rank(candidates);
        let b = AssignmentEngine::rank(shuffled);
        prop_assert_eq!(
            a.iter().map(|c| c.id).collect::<Vec<_>>(),
            b.iter().map(|c| c.id).collect::<Vec<_>>()
        );
    }
}
