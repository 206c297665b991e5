//! Sibling placement inside one parent rectangle.
//!
//! Siblings are grouped by [`Band`]. Top siblings share the upper third of the parent, compact
//! siblings share a fixed-height strip below that, and middle siblings split whatever is left.
//! Each band is carved out of the region the previous band left over, so bands cannot overlap.

use crate::geom::{Axis, PixelBox, divide_rect, pixel_box, point};
use blockmap_core::Band;

/// Whether slots are inset by the configured margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginMode {
    Inset,
    /// No margin: a lone sibling fills the parent edge to edge.
    Flush,
}

#[derive(Debug, Clone, Copy)]
pub struct SiblingPlanner {
    pub margin: i32,
    /// Compact strip height per compact sibling.
    pub strip_unit: i32,
}

impl SiblingPlanner {
    pub fn new(margin: i32, strip_unit: i32) -> Self {
        Self { margin, strip_unit }
    }

    /// Plain horizontal division, no bands. Used for the outermost level.
    pub fn plan_uniform(&self, parent: PixelBox, count: usize, mode: MarginMode) -> Vec<PixelBox> {
        divide_rect(parent, count, self.margin_px(mode), Axis::Horizontal)
    }

    /// Assigns one rectangle per sibling; `bands[i]` is the band of sibling `i` and the result is
    /// indexed the same way.
    pub fn plan(&self, parent: PixelBox, bands: &[Band], mode: MarginMode) -> Vec<PixelBox> {
        let margin = self.margin_px(mode);
        let mut slots = vec![pixel_box(0, 0, 0, 0); bands.len()];
        let top = members(bands, Band::Top);
        let compact = members(bands, Band::Compact);
        let middle = members(bands, Band::Middle);

        let mut remaining = parent;

        if !top.is_empty() {
            let thirds = divide_rect(remaining, 3, margin, Axis::Vertical);
            let row = divide_rect(thirds[0], top.len(), margin, Axis::Horizontal);
            assign(&mut slots, &top, row);
            remaining = PixelBox::new(thirds[1].min, thirds[2].max);
        }

        if !compact.is_empty() {
            let available = (remaining.max.y - remaining.min.y).max(0);
            let cap = if middle.is_empty() {
                available
            } else {
                available / 2
            };
            let wanted = self
                .strip_unit
                .saturating_mul(i32::try_from(compact.len()).unwrap_or(i32::MAX));
            let height = wanted.clamp(0, cap);
            let split_y = remaining.min.y + height;

            let strip = PixelBox::new(remaining.min, point(remaining.max.x, split_y));
            let row = divide_rect(strip, compact.len(), margin, Axis::Horizontal);
            assign(&mut slots, &compact, row);
            remaining = PixelBox::new(point(remaining.min.x, split_y), remaining.max);
        }

        if !middle.is_empty() {
            let row = divide_rect(remaining, middle.len(), margin, Axis::Horizontal);
            assign(&mut slots, &middle, row);
        }

        tracing::debug!(
            ?parent,
            top = top.len(),
            compact = compact.len(),
            middle = middle.len(),
            "planned siblings"
        );
        slots
    }

    fn margin_px(&self, mode: MarginMode) -> i32 {
        match mode {
            MarginMode::Inset => self.margin,
            MarginMode::Flush => 0,
        }
    }
}

fn members(bands: &[Band], band: Band) -> Vec<usize> {
    bands
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == band)
        .map(|(i, _)| i)
        .collect()
}

fn assign(slots: &mut [PixelBox], indices: &[usize], row: Vec<PixelBox>) {
    for (&idx, rect) in indices.iter().zip(row) {
        slots[idx] = rect;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{contains, overlaps};

    const PLANNER: SiblingPlanner = SiblingPlanner {
        margin: 20,
        strip_unit: 60,
    };

    fn assert_disjoint(slots: &[PixelBox]) {
        for (i, a) in slots.iter().enumerate() {
            for b in &slots[i + 1..] {
                assert!(!overlaps(a, b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn flush_single_sibling_fills_parent() {
        let canvas = pixel_box(0, 0, 799, 799);
        assert_eq!(
            PLANNER.plan_uniform(canvas, 1, MarginMode::Flush),
            vec![canvas]
        );
        assert_eq!(PLANNER.plan(canvas, &[Band::Middle], MarginMode::Flush), vec![canvas]);
    }

    #[test]
    fn no_siblings_no_slots() {
        let canvas = pixel_box(0, 0, 799, 799);
        assert!(PLANNER.plan(canvas, &[], MarginMode::Inset).is_empty());
        assert!(PLANNER.plan_uniform(canvas, 0, MarginMode::Inset).is_empty());
    }

    #[test]
    fn top_band_takes_the_upper_third() {
        let parent = pixel_box(0, 0, 799, 799);
        let slots = PLANNER.plan(parent, &[Band::Top, Band::Middle], MarginMode::Inset);
        assert_eq!(slots[0], pixel_box(40, 40, 759, 239));
        assert_eq!(slots[1], pixel_box(40, 299, 759, 757));
    }

    #[test]
    fn result_follows_sibling_order_not_band_order() {
        let parent = pixel_box(0, 0, 799, 799);
        let bands = [Band::Middle, Band::Compact, Band::Top, Band::Middle, Band::Top];
        let slots = PLANNER.plan(parent, &bands, MarginMode::Inset);
        assert_eq!(slots.len(), bands.len());

        // Top siblings sit above compact ones, which sit above middle ones.
        assert!(slots[2].max.y < slots[1].min.y);
        assert!(slots[1].max.y < slots[0].min.y);
        // Within a band, left to right in declaration order.
        assert!(slots[2].max.x < slots[4].min.x);
        assert!(slots[0].max.x < slots[3].min.x);

        assert_disjoint(&slots);
        for s in &slots {
            assert!(!s.is_empty());
            assert!(contains(&parent, s));
        }
    }

    #[test]
    fn compact_strip_height_scales_with_member_count() {
        let parent = pixel_box(0, 0, 999, 799);
        let one = PLANNER.plan(parent, &[Band::Compact, Band::Middle], MarginMode::Inset);
        assert_eq!(one[0], pixel_box(20, 20, 979, 40));
        assert_eq!(one[1], pixel_box(20, 80, 979, 779));

        let two = PLANNER.plan(
            parent,
            &[Band::Compact, Band::Compact, Band::Middle],
            MarginMode::Inset,
        );
        assert_eq!(two[0].max.y, 100);
        assert_eq!(two[2].min.y, 140);
        assert_disjoint(&two);
    }

    #[test]
    fn compact_strip_is_capped_by_remaining_height() {
        let parent = pixel_box(0, 0, 399, 199);
        let bands = vec![Band::Compact; 6];
        let alone = PLANNER.plan(parent, &bands, MarginMode::Inset);
        assert!(alone.iter().all(|s| contains(&parent, s)));
        assert!(alone.iter().all(|s| s.max.y <= 179));

        let mut shared = bands.clone();
        shared.push(Band::Middle);
        let slots = PLANNER.plan(parent, &shared, MarginMode::Inset);
        let middle = slots[6];
        assert_eq!(middle.min.y, 99 + 20);
        assert!(!middle.is_empty());
    }

    #[test]
    fn only_compact_siblings_keep_the_strip_at_the_top() {
        let parent = pixel_box(100, 100, 499, 699);
        let slots = PLANNER.plan(parent, &[Band::Compact, Band::Compact], MarginMode::Inset);
        assert_eq!(slots[0].min.y, 120);
        assert_eq!(slots[0].max.y, 100 + 120 - 20);
        assert_disjoint(&slots);
    }
}
