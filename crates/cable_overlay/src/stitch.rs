//! Edge stitching: merge collinear unit edges into maximal runs.
//!
//! Each (layer, axis) bucket keeps two maps over integer tile coordinates:
//!
//! ```text
//! forward[start] = end      start ●━━━━━━━━━● end
//! backward[end]  = start
//! ```
//!
//! A new edge `a → b` is resolved against both maps in O(1):
//!
//! ```text
//! run ending at a  +  a→b  +  run starting at b   → one bridged run
//! run ending at a  +  a→b                          → run extended forward
//!                     a→b  +  run starting at b   → run extended backward
//!                     a→b                          → new run
//! ```
//!
//! Bridging keeps the final run set independent of the order edges arrive
//! in: a run never touches another run end-to-start.

use std::collections::HashMap;

use glam::IVec2;

use crate::core::{Axis, CableLayer, TileSegment, AXIS_COUNT, LAYER_COUNT};

/// Forward/backward endpoint maps for one (layer, axis) bucket.
#[derive(Clone, Debug, Default)]
pub struct RunMap {
    forward: HashMap<IVec2, IVec2>,
    backward: HashMap<IVec2, IVec2>,
}

impl RunMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the unit edge `a → b` into the bucket.
    ///
    /// Edges must be fed with a consistent direction per bucket and never
    /// twice.
    pub fn push(&mut self, a: IVec2, b: IVec2) {
        debug_assert_ne!(a, b, "degenerate unit edge");

        // Does an existing run start where this edge ends?
        if let Some(tail_end) = self.forward.remove(&b) {
            debug_assert_eq!(self.backward.get(&tail_end), Some(&b));

            // ...and does another end where this edge starts? Then bridge them.
            if let Some(head_start) = self.backward.remove(&a) {
                debug_assert_eq!(self.forward.get(&head_start), Some(&a));
                self.forward.insert(head_start, tail_end);
                self.backward.insert(tail_end, head_start);
                return;
            }

            self.forward.insert(a, tail_end);
            self.backward.insert(tail_end, a);
            return;
        }

        // Does an existing run end where this edge starts?
        if let Some(head_start) = self.backward.remove(&a) {
            debug_assert_eq!(self.forward.get(&head_start), Some(&a));
            self.forward.insert(head_start, b);
            self.backward.insert(b, head_start);
            return;
        }

        debug_assert!(!self.forward.contains_key(&a), "unit edge fed twice");
        self.forward.insert(a, b);
        self.backward.insert(b, a);
    }

    /// Number of runs currently held.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Check that both maps describe the same runs.
    pub fn is_consistent(&self) -> bool {
        self.forward.len() == self.backward.len()
            && self
                .forward
                .iter()
                .all(|(start, end)| self.backward.get(end) == Some(start))
    }

    /// Iterate `(start, end)` pairs. Order is unspecified.
    pub fn runs(&self) -> impl Iterator<Item = (IVec2, IVec2)> + '_ {
        self.forward.iter().map(|(&start, &end)| (start, end))
    }
}

/// Transient stitching state for one decode pass: a [`RunMap`] per layer
/// and axis.
///
/// Consumed by [`EdgeStitcher::finish`]; never reused across passes.
#[derive(Clone, Debug, Default)]
pub struct EdgeStitcher {
    buckets: [[RunMap; AXIS_COUNT]; LAYER_COUNT],
    edges: usize,
}

impl EdgeStitcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one unit edge into the bucket for its layer and axis.
    #[inline]
    pub fn push(&mut self, layer: CableLayer, axis: Axis, a: IVec2, b: IVec2) {
        debug_assert!(
            match axis {
                Axis::Horizontal => a.y == b.y && (a.x - b.x).abs() == 1,
                Axis::Vertical => a.x == b.x && (a.y - b.y).abs() == 1,
            },
            "{a} -> {b} is not a unit {axis:?} edge"
        );
        self.buckets[layer.index()][axis.index()].push(a, b);
        self.edges += 1;
    }

    /// Number of unit edges fed so far.
    pub fn edge_count(&self) -> usize {
        self.edges
    }

    /// Number of runs currently held across all buckets.
    pub fn run_count(&self) -> usize {
        self.buckets.iter().flatten().map(RunMap::len).sum()
    }

    /// Bucket for a layer and axis.
    pub fn bucket(&self, layer: CableLayer, axis: Axis) -> &RunMap {
        &self.buckets[layer.index()][axis.index()]
    }

    /// Flush every bucket into runs, sorted by layer, axis, then start.
    pub fn finish(self) -> Vec<TileSegment> {
        let mut runs = Vec::with_capacity(self.run_count());

        for layer in CableLayer::ALL {
            for axis in Axis::ALL {
                let bucket = &self.buckets[layer.index()][axis.index()];
                debug_assert!(bucket.is_consistent());
                runs.extend(bucket.runs().map(|(start, end)| TileSegment { layer, axis, start, end }));
            }
        }

        runs.sort_unstable_by_key(TileSegment::sort_key);
        runs
    }
}
