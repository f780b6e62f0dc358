//! Property-Based Tests
//!
//! Invariants of merging and reading order over random box sets. Box counts
//! stay at or below 25 so the pass cap (2n) always leaves room to converge.

use ocr_region_order::{
    filter_small, merge_all, merge_all_with_stats, should_merge, sort_reading_order, Region,
};
use proptest::prelude::*;

fn region() -> impl Strategy<Value = Region> {
    (0u16..600, 0u16..800, 0u16..120, 0u16..40).prop_map(|(x, y, w, h)| {
        let (x, y) = (f32::from(x), f32::from(y));
        Region::new(x, y, x + f32::from(w), y + f32::from(h))
    })
}

fn regions() -> impl Strategy<Value = Vec<Region>> {
    prop::collection::vec(region(), 0..25)
}

fn sorted_by_bits(mut v: Vec<Region>) -> Vec<[u32; 4]> {
    let mut keys: Vec<[u32; 4]> = v
        .drain(..)
        .map(|r| [r.xmin.to_bits(), r.ymin.to_bits(), r.xmax.to_bits(), r.ymax.to_bits()])
        .collect();
    keys.sort_unstable();
    keys
}

proptest! {
    /// Property: re-merging a merged set changes nothing
    #[test]
    fn proptest_merge_is_idempotent(
        boxes in regions(),
        proximity in 0u8..40,
        min_size in 0u8..15,
    ) {
        let (p, m) = (f32::from(proximity), f32::from(min_size));
        let once = merge_all(&boxes, p, m);
        let twice = merge_all(&once, p, m);
        prop_assert_eq!(once, twice);
    }

    /// Property: merging never produces more boxes than survive the filter
    #[test]
    fn proptest_merge_reduces(
        boxes in regions(),
        proximity in 0u8..40,
        min_size in 0u8..15,
    ) {
        let (p, m) = (f32::from(proximity), f32::from(min_size));
        prop_assert!(merge_all(&boxes, p, m).len() <= filter_small(&boxes, m).len());
    }

    /// Property: once converged, no two output boxes would still merge
    #[test]
    fn proptest_converged_output_is_not_mergeable(
        boxes in regions(),
        proximity in 0u8..40,
    ) {
        let p = f32::from(proximity);
        let outcome = merge_all_with_stats(&boxes, p, 1.0);
        prop_assert!(outcome.converged);

        for (i, a) in outcome.regions.iter().enumerate() {
            for b in &outcome.regions[i + 1..] {
                prop_assert!(!should_merge(a, b, p), "{:?} and {:?} still merge", a, b);
            }
        }
    }

    /// Property: every merged box encloses at least one input box and no
    /// input box that passed the filter is lost
    #[test]
    fn proptest_merge_covers_inputs(boxes in regions(), proximity in 0u8..40) {
        let p = f32::from(proximity);
        let kept = filter_small(&boxes, 1.0);
        let merged = merge_all(&boxes, p, 1.0);

        for b in &kept {
            let covered = merged.iter().any(|m| {
                m.xmin <= b.xmin && m.ymin <= b.ymin && m.xmax >= b.xmax && m.ymax >= b.ymax
            });
            prop_assert!(covered, "{:?} not covered by any merged box", b);
        }
    }

    /// Property: reading order is a permutation of its input
    #[test]
    fn proptest_reading_order_is_permutation(boxes in regions(), tolerance in 0u8..30) {
        let ordered = sort_reading_order(&boxes, f32::from(tolerance));
        prop_assert_eq!(sorted_by_bits(ordered), sorted_by_bits(boxes));
    }
}
