//! Proximity merging of fragmented text regions.
//!
//! Detectors tend to split one logical block (a line, a table cell, an
//! address) into several boxes. Merging repeatedly fuses boxes that overlap
//! or sit within `proximity` of each other until a pass makes no change or
//! the pass cap is hit.
//!
//! The merge is greedy and order dependent: the earliest box in the input
//! absorbs later ones, so permuting the input can change the result.

use serde::Serialize;
use tracing::{debug, warn};

use crate::filter::filter_small;
use crate::geometry::{iou, Region};

/// IoU above which two boxes always merge.
const OVERLAP_IOU: f32 = 0.1;

/// Hard ceiling on merge passes regardless of input size.
const MAX_PASSES: usize = 50;

/// Result of [`merge_all_with_stats`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeOutcome {
    pub regions: Vec<Region>,
    /// Number of passes run, including the final no-op pass on convergence.
    pub passes: usize,
    /// Pass limit applied to this run, `min(2 * n, 50)` over the filtered `n`.
    pub pass_cap: usize,
    /// False when the pass cap was reached while merges were still happening.
    /// The regions are still valid, just possibly under-merged.
    pub converged: bool,
}

/// Whether `a` and `b` belong to the same text block.
///
/// Boxes merge when they overlap meaningfully, when they share a vertical
/// extent and the horizontal gap is within `proximity` (same line), or when
/// they share a horizontal extent and the vertical gap is within
/// `proximity` (same column).
pub fn should_merge(a: &Region, b: &Region, proximity: f32) -> bool {
    if iou(a, b) > OVERLAP_IOU {
        return true;
    }

    let overlap_y = a.ymax >= b.ymin && b.ymax >= a.ymin;
    if overlap_y {
        let h_gap = (a.xmin - b.xmax).abs().min((b.xmin - a.xmax).abs());
        if h_gap <= proximity {
            return true;
        }
    }

    let overlap_x = a.xmax >= b.xmin && b.xmax >= a.xmin;
    if overlap_x {
        let v_gap = (a.ymin - b.ymax).abs().min((b.ymin - a.ymax).abs());
        if v_gap <= proximity {
            return true;
        }
    }

    false
}

/// Enclosing box of `a` and `b`.
pub fn merge(a: &Region, b: &Region) -> Region {
    a.union(b)
}

/// Filter, then merge to a fixed point. See [`merge_all_with_stats`].
pub fn merge_all(regions: &[Region], proximity: f32, min_size: f32) -> Vec<Region> {
    merge_all_with_stats(regions, proximity, min_size).regions
}

/// Filter out small regions, then merge until no pass changes anything or
/// `min(2 * n, 50)` passes have run.
pub fn merge_all_with_stats(regions: &[Region], proximity: f32, min_size: f32) -> MergeOutcome {
    let current = filter_small(regions, min_size);
    if current.is_empty() {
        return MergeOutcome {
            regions: current,
            passes: 0,
            pass_cap: 0,
            converged: true,
        };
    }

    let cap = pass_cap(current.len());
    merge_to_fixed_point(current, proximity, cap)
}

/// Pass limit for merging `n` regions.
pub fn pass_cap(n: usize) -> usize {
    n.saturating_mul(2).min(MAX_PASSES)
}

fn merge_to_fixed_point(mut current: Vec<Region>, proximity: f32, cap: usize) -> MergeOutcome {
    let mut passes = 0;
    let mut merged = true;

    while merged && passes < cap {
        passes += 1;
        let (next, merged_this_pass) = merge_pass(&current, proximity);
        current = next;
        merged = merged_this_pass;
    }

    let converged = !merged;
    if converged {
        debug!(
            "Region merging completed in {} passes: {} regions remaining",
            passes,
            current.len()
        );
    } else {
        warn!(
            "Region merging hit the {} pass cap before converging: {} regions remaining",
            cap,
            current.len()
        );
    }

    MergeOutcome {
        regions: current,
        passes,
        pass_cap: cap,
        converged,
    }
}

/// One greedy pass. Each unconsumed box grows by absorbing every later
/// unconsumed box that touches its current (already grown) extent.
fn merge_pass(regions: &[Region], proximity: f32) -> (Vec<Region>, bool) {
    let mut consumed = vec![false; regions.len()];
    let mut output = Vec::with_capacity(regions.len());
    let mut merged = false;

    for i in 0..regions.len() {
        if consumed[i] {
            continue;
        }
        consumed[i] = true;

        let mut acc = regions[i];
        for j in (i + 1)..regions.len() {
            if consumed[j] {
                continue;
            }
            if should_merge(&acc, &regions[j], proximity) {
                acc = merge(&acc, &regions[j]);
                consumed[j] = true;
                merged = true;
            }
        }

        output.push(acc);
    }

    (output, merged)
}
