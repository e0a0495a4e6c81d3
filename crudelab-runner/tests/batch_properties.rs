//! Property tests for batch recommendation.
//!
//! Uses proptest to verify:
//! 1. Shape: one output row per query, in input order
//! 2. Exclusivity: every row carries either a result or an error
//! 3. Parity: parallel rows match one-at-a-time recommendations

use proptest::prelude::*;

use crudelab_core::{FeatureVector, ReferenceData};
use crudelab_runner::{run_batch, QueryRow};

// ── Strategies (proptest) ────────────────────────────────────────────

/// Mostly six-component vectors, with some wrong lengths and some special
/// values mixed in.
fn arb_vector() -> impl Strategy<Value = Vec<f64>> {
    let component = prop_oneof![
        8 => -1.0..1.0_f64,
        1 => Just(0.0),
        1 => prop::sample::select(vec![f64::NAN, f64::INFINITY, f64::NEG_INFINITY]),
    ];
    let len = prop_oneof![4 => Just(6usize), 1 => 1usize..10];
    len.prop_flat_map(move |n| prop::collection::vec(component.clone(), n))
}

fn arb_queries() -> impl Strategy<Value = Vec<QueryRow>> {
    prop::collection::vec(arb_vector(), 0..40).prop_map(|vectors| {
        vectors
            .into_iter()
            .enumerate()
            .map(|(i, v)| QueryRow {
                id: format!("q{i:03}"),
                vector: FeatureVector::new(v),
            })
            .collect()
    })
}

// ── 1. Shape ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn one_row_per_query_in_input_order(queries in arb_queries()) {
        let rows = run_batch(&queries, &ReferenceData::builtin());
        prop_assert_eq!(rows.len(), queries.len());
        for (row, query) in rows.iter().zip(&queries) {
            prop_assert_eq!(&row.id, &query.id);
        }
    }
}

// ── 2. Exclusivity ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn rows_carry_result_or_error(queries in arb_queries()) {
        let rows = run_batch(&queries, &ReferenceData::builtin());
        for row in &rows {
            if row.is_ok() {
                prop_assert!(row.action.is_some());
                prop_assert!(row.matched.is_some());
                let similarity = row.similarity.unwrap_or(f64::NAN);
                prop_assert!((-1.0..=1.0).contains(&similarity));
            } else {
                prop_assert!(row.action.is_none());
                prop_assert!(row.matched.is_none());
                prop_assert!(row.similarity.is_none());
            }
        }
    }
}

// ── 3. Parity ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn parallel_rows_match_single_recommendations(queries in arb_queries()) {
        let reference = ReferenceData::builtin();
        let rows = run_batch(&queries, &reference);
        for (row, query) in rows.iter().zip(&queries) {
            let finite = query.vector.as_slice().iter().all(|v| v.is_finite());
            match reference.recommend(&query.vector) {
                Ok(rec) if finite => {
                    prop_assert_eq!(row.action.as_deref(), Some(rec.action.id.as_str()));
                    prop_assert_eq!(row.matched.as_deref(), Some(rec.matched.id.as_str()));
                }
                _ => prop_assert!(!row.is_ok()),
            }
        }
    }
}
