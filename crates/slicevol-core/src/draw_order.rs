//! Per-frame slice draw order.
//!
//! Slices are composited in ascending index order every frame. The order is
//! fixed and never depth sorted against the camera: the MAX blend equation
//! makes the result independent of which overlapping slice lands first.

use std::ops::Range;

use crate::slice_geometry::INDICES_PER_SLICE;

/// Ordered slice indices for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOrder {
    slices: Vec<u32>,
}

impl DrawOrder {
    /// Every slice from `0` to `slice_count - 1`.
    #[must_use]
    pub fn ascending(slice_count: u32) -> Self {
        Self {
            slices: (0..slice_count).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Slice indices in draw order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.slices.iter().copied()
    }

    /// Index-buffer ranges to draw, in order.
    ///
    /// Consecutive slices share one range, so an ascending order over the
    /// whole stack is a single draw of `6 * slice_count` indices.
    #[must_use]
    pub fn index_ranges(&self) -> Vec<Range<u32>> {
        let mut ranges: Vec<Range<u32>> = Vec::new();
        for slice in self.iter() {
            let start = slice * INDICES_PER_SLICE;
            let end = start + INDICES_PER_SLICE;
            match ranges.last_mut() {
                Some(last) if last.end == start => last.end = end,
                _ => ranges.push(start..end),
            }
        }
        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascending_is_single_range() {
        let order = DrawOrder::ascending(109);
        assert_eq!(order.len(), 109);
        assert_eq!(order.iter().next(), Some(0));
        assert_eq!(order.iter().last(), Some(108));
        assert_eq!(order.index_ranges(), vec![0..6 * 109]);
    }

    #[test]
    fn test_empty_order_draws_nothing() {
        let order = DrawOrder::ascending(0);
        assert!(order.is_empty());
        assert!(order.index_ranges().is_empty());
    }

    #[test]
    fn test_order_is_stable_across_frames() {
        assert_eq!(DrawOrder::ascending(12), DrawOrder::ascending(12));
    }

    #[test]
    fn test_non_contiguous_slices_split_ranges() {
        let order = DrawOrder {
            slices: vec![0, 1, 3],
        };
        assert_eq!(order.index_ranges(), vec![0..12, 18..24]);
    }
}
