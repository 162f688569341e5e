//! Vertical space negotiation between sibling subtrees.
//!
//! Given siblings sorted top to bottom, each with the bounding rectangle of
//! its laid-out subtree, `negotiate` moves them vertically so that they no
//! longer overlap while disturbing their current positions as little as
//! possible. Sibling order never changes.
//!
//! The algorithm works from the outside in with two cursors. In each round
//! the outermost remaining pair is clamped into the current bounds. If the
//! rest still fits between them, the bounds simply shrink past the pair.
//! Otherwise the pair is pushed outwards by the missing space, split in
//! proportion to the room each side had left (evenly when neither had any).

use crate::geometry::Rect;
use crate::tree::IdeaId;

/// One child subtree taking part in the negotiation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub id: IdeaId,
    /// Subtree bounds including the child's top margin.
    pub rect: Rect,
    /// Top margin of the child idea itself.
    pub margin_top: f64,
    /// Vertical translation accumulated so far.
    pub shift: f64,
}

impl Slot {
    pub fn new(id: IdeaId, rect: Rect, margin_top: f64) -> Self {
        Self {
            id,
            rect,
            margin_top,
            shift: 0.0,
        }
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.rect.top
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.rect.bottom()
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.rect.height
    }

    /// Translate the slot vertically.
    #[inline]
    pub fn shift_by(&mut self, dy: f64) {
        self.rect.top += dy;
        self.shift += dy;
    }
}

/// Total height the slots need when stacked without gaps.
pub fn required_space(slots: &[Slot]) -> f64 {
    slots.iter().map(Slot::height).sum()
}

/// Stack the slots contiguously, centered on `center_y`.
///
/// The first slot's top margin hangs above the stack, so the idea boxes
/// themselves are centered.
pub fn stack(slots: &mut [Slot], center_y: f64) {
    let Some(first) = slots.first() else {
        return;
    };
    let mut y = center_y - (required_space(slots) - first.margin_top) / 2.0;
    for slot in slots.iter_mut() {
        slot.shift_by(y - slot.top() - slot.margin_top);
        y += slot.height();
    }
}

/// Redistribute vertical room among `slots` within `[upper, lower]`.
///
/// `required` is the total height the slots need.
pub fn negotiate(slots: &mut [Slot], mut upper: f64, mut lower: f64, mut required: f64) {
    let mut first = 0;
    let mut end = slots.len();

    while first < end {
        let last = end - 1;

        if first == last {
            let one = &mut slots[first];
            if one.top() < upper {
                one.shift_by(upper - one.top());
            } else if one.bottom() > lower {
                one.shift_by(lower - one.bottom());
            }
            return;
        }

        if slots[first].top() < upper {
            let dy = upper - slots[first].top();
            slots[first].shift_by(dy);
        }
        if slots[last].bottom() > lower {
            let dy = lower - slots[last].bottom();
            slots[last].shift_by(dy);
        }
        let top = slots[first].top();
        let bottom = slots[last].bottom();
        let first_height = slots[first].height();
        let last_height = slots[last].height();
        let available = bottom - top;

        if required > available {
            let upper_space = top - upper;
            let lower_space = lower - bottom;
            let deficit = required - available;
            let (first_offset, last_offset) = if upper_space == 0.0 && lower_space == 0.0 {
                (-deficit / 2.0, deficit / 2.0)
            } else {
                let total = upper_space + lower_space;
                (
                    -deficit * upper_space / total,
                    deficit * lower_space / total,
                )
            };
            slots[first].shift_by(first_offset);
            slots[last].shift_by(last_offset);
            upper = top + first_height + first_offset;
            lower = bottom - last_height + last_offset;
        } else {
            upper = top + first_height;
            lower = bottom - last_height;
        }

        required -= first_height + last_height;
        first += 1;
        end -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: u32, top: f64, height: f64) -> Slot {
        Slot::new(IdeaId(id), Rect::new(0.0, top, 50.0, height), 10.0)
    }

    fn tops(slots: &[Slot]) -> Vec<f64> {
        slots.iter().map(Slot::top).collect()
    }

    fn run(slots: &mut [Slot]) {
        let upper = slots[0].top();
        let lower = slots[slots.len() - 1].bottom();
        let required = required_space(slots);
        negotiate(slots, upper, lower, required);
    }

    #[test]
    fn test_separated_slots_stay_put() {
        let mut slots = vec![slot(1, 0.0, 10.0), slot(2, 50.0, 10.0), slot(3, 100.0, 10.0)];
        run(&mut slots);
        assert_eq!(tops(&slots), vec![0.0, 50.0, 100.0]);
        assert!(slots.iter().all(|s| s.shift == 0.0));
    }

    #[test]
    fn test_overlapping_pair_splits_evenly() {
        // Two slots of height 20 sharing the same spot need 20 more units
        let mut slots = vec![slot(1, 0.0, 20.0), slot(2, 0.0, 20.0)];
        run(&mut slots);
        assert_eq!(tops(&slots), vec![-10.0, 10.0]);
        assert_eq!(slots[0].shift, -10.0);
        assert_eq!(slots[1].shift, 10.0);
    }

    #[test]
    fn test_middle_slot_clamped_into_gap() {
        // The middle slot overlaps the first; there is room below it
        let mut slots = vec![slot(1, 0.0, 20.0), slot(2, 10.0, 20.0), slot(3, 100.0, 20.0)];
        run(&mut slots);
        assert_eq!(tops(&slots), vec![0.0, 20.0, 100.0]);
    }

    #[test]
    fn test_single_slot_within_bounds() {
        let mut slots = vec![slot(1, 5.0, 10.0)];
        negotiate(&mut slots, 0.0, 20.0, 10.0);
        assert_eq!(tops(&slots), vec![5.0]);
    }

    #[test]
    fn test_single_slot_clamped_to_upper() {
        let mut slots = vec![slot(1, -5.0, 10.0)];
        negotiate(&mut slots, 0.0, 20.0, 10.0);
        assert_eq!(tops(&slots), vec![0.0]);
    }

    #[test]
    fn test_single_slot_clamped_to_lower() {
        let mut slots = vec![slot(1, 15.0, 10.0)];
        negotiate(&mut slots, 0.0, 20.0, 10.0);
        assert_eq!(tops(&slots), vec![10.0]);
    }

    #[test]
    fn test_inner_deficit_split_by_slack() {
        // Inner round: upper slack 0, lower slack 30 -> all movement goes down
        let mut slots = vec![
            slot(1, 0.0, 10.0),
            slot(2, 10.0, 20.0),
            slot(3, 15.0, 20.0),
            slot(4, 100.0, 10.0),
        ];
        run(&mut slots);
        assert_eq!(tops(&slots), vec![0.0, 10.0, 30.0, 100.0]);
    }

    #[test]
    fn test_order_preserved_and_no_overlap() {
        let mut slots = vec![
            slot(1, 0.0, 30.0),
            slot(2, 5.0, 30.0),
            slot(3, 10.0, 30.0),
            slot(4, 15.0, 30.0),
            slot(5, 20.0, 30.0),
        ];
        run(&mut slots);
        for pair in slots.windows(2) {
            assert!(pair[0].bottom() <= pair[1].top() + 1e-9);
        }
    }

    #[test]
    fn test_empty_is_noop() {
        let mut slots: Vec<Slot> = Vec::new();
        negotiate(&mut slots, 0.0, 0.0, 0.0);
        stack(&mut slots, 0.0);
        assert!(slots.is_empty());
    }

    #[test]
    fn test_stack_centers_idea_boxes() {
        // Subtree rects of height 30 include a 10 top margin above a 20 box
        let mut slots = vec![slot(1, 40.0, 30.0), slot(2, -70.0, 30.0)];
        stack(&mut slots, 0.0);
        assert_eq!(tops(&slots), vec![-35.0, -5.0]);
        // Boxes at -25..-5 and 5..25
        assert_eq!(slots[0].top() + slots[0].margin_top, -25.0);
        assert_eq!(slots[1].top() + slots[1].margin_top, 5.0);
    }
}
