//! Winner tracking.
//!
//! The tracker is the authoritative record of which slot the disc currently
//! occupies. Only the collision dispatcher mutates it.

use std::collections::BTreeSet;

/// A change of a slot's occupied state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotTransition {
    Selected(usize),
    Cleared(usize),
}

impl SlotTransition {
    pub fn slot(&self) -> usize {
        match self {
            Self::Selected(slot) | Self::Cleared(slot) => *slot,
        }
    }
}

/// Set of currently occupied slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeTracker {
    slot_count: usize,
    occupied: BTreeSet<usize>,
}

impl OutcomeTracker {
    pub fn new(slot_count: usize) -> Self {
        Self {
            slot_count,
            occupied: BTreeSet::new(),
        }
    }

    fn check_index(&self, slot: usize) {
        assert!(
            slot < self.slot_count,
            "slot index {slot} out of range for {} slots",
            self.slot_count
        );
    }

    /// Marks `slot` as occupied.
    ///
    /// Returns the transition when the state changed, `None` when the slot
    /// was already selected.
    ///
    /// # Panics
    /// Panics if `slot` is not below the slot count. Sensors are generated
    /// internally, so an out-of-range index is a broken invariant.
    pub fn select(&mut self, slot: usize) -> Option<SlotTransition> {
        self.check_index(slot);
        self.occupied
            .insert(slot)
            .then_some(SlotTransition::Selected(slot))
    }

    /// Clears `slot`.
    ///
    /// Returns the transition when the state changed, `None` when the slot
    /// was already clear.
    ///
    /// # Panics
    /// Panics if `slot` is not below the slot count.
    pub fn clear(&mut self, slot: usize) -> Option<SlotTransition> {
        self.check_index(slot);
        self.occupied
            .remove(&slot)
            .then_some(SlotTransition::Cleared(slot))
    }

    pub fn is_selected(&self, slot: usize) -> bool {
        self.occupied.contains(&slot)
    }

    /// Occupied slots in ascending order.
    pub fn selected(&self) -> impl Iterator<Item = usize> + '_ {
        self.occupied.iter().copied()
    }

    /// The current winner, if the disc sits in a slot.
    pub fn winner(&self) -> Option<usize> {
        self.occupied.first().copied()
    }

    pub fn is_all_clear(&self) -> bool {
        self.occupied.is_empty()
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Clears every slot, returning the transitions in slot order.
    pub fn reset(&mut self) -> Vec<SlotTransition> {
        std::mem::take(&mut self.occupied)
            .into_iter()
            .map(SlotTransition::Cleared)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_is_idempotent() {
        let mut tracker = OutcomeTracker::new(4);

        assert_eq!(tracker.select(2), Some(SlotTransition::Selected(2)));
        let after_first = tracker.clone();
        assert_eq!(tracker.select(2), None);
        assert_eq!(tracker, after_first);
    }

    #[test]
    fn test_clear_never_selected_is_noop() {
        let mut tracker = OutcomeTracker::new(4);
        assert_eq!(tracker.clear(1), None);
        assert!(tracker.is_all_clear());
    }

    #[test]
    fn test_select_then_clear() {
        let mut tracker = OutcomeTracker::new(4);
        tracker.select(3);
        assert_eq!(tracker.winner(), Some(3));

        assert_eq!(tracker.clear(3), Some(SlotTransition::Cleared(3)));
        assert!(!tracker.is_selected(3));
        assert_eq!(tracker.winner(), None);
    }

    #[test]
    fn test_reset_reports_cleared_slots() {
        let mut tracker = OutcomeTracker::new(5);
        tracker.select(4);
        tracker.select(1);

        assert_eq!(
            tracker.reset(),
            vec![SlotTransition::Cleared(1), SlotTransition::Cleared(4)]
        );
        assert!(tracker.is_all_clear());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_select_panics() {
        let mut tracker = OutcomeTracker::new(3);
        tracker.select(3);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_clear_panics() {
        let mut tracker = OutcomeTracker::new(3);
        tracker.clear(7);
    }
}
