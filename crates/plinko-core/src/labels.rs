//! Slot labels for the presentation layer.
//!
//! Labels sit under the catch row. Their rectangles follow the same unit
//! scale as the board so they stay aligned when the viewport changes.

use serde::Serialize;

use crate::layout::BoardConfig;
use crate::outcome::SlotTransition;
use crate::participants::ParticipantList;

/// Screen rectangle and text of one slot label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotLabel {
    pub slot: usize,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
    pub padding: f32,
    pub text: String,
    pub pronunciation: String,
}

impl SlotLabel {
    /// Horizontal center of the label box.
    pub fn center_x(&self) -> f32 {
        self.left + self.width / 2.0
    }
}

/// One label per participant, left to right.
pub fn slot_labels(config: &BoardConfig, participants: &ParticipantList) -> Vec<SlotLabel> {
    let s = config.scale;
    let left_offset = config.left_offset();

    participants
        .iter()
        .take(config.slot_count)
        .enumerate()
        .map(|(slot, participant)| {
            #[allow(clippy::cast_precision_loss)]
            let left = left_offset - 1.525 * s + s * slot as f32;
            SlotLabel {
                slot,
                left,
                top: 15.8 * s,
                width: 1.6 * s,
                height: 0.325 * s,
                font_size: s / 3.0,
                padding: s / 4.5,
                text: participant.value.clone(),
                pronunciation: participant.pronunciation().to_owned(),
            }
        })
        .collect()
}

/// Receives winner changes for display.
pub trait SlotIndicator {
    fn mark_selected(&mut self, slot: usize);
    fn mark_cleared(&mut self, slot: usize);
}

/// Forwards each transition to `indicator`, in order.
pub fn apply_transitions<I>(indicator: &mut I, transitions: &[SlotTransition])
where
    I: SlotIndicator + ?Sized,
{
    for transition in transitions {
        match *transition {
            SlotTransition::Selected(slot) => indicator.mark_selected(slot),
            SlotTransition::Cleared(slot) => indicator.mark_cleared(slot),
        }
    }
}

/// Highlight flags per slot; the simplest [`SlotIndicator`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightSet {
    highlighted: Vec<bool>,
}

impl HighlightSet {
    pub fn new(slot_count: usize) -> Self {
        Self {
            highlighted: vec![false; slot_count],
        }
    }

    pub fn is_highlighted(&self, slot: usize) -> bool {
        self.highlighted.get(slot).copied().unwrap_or(false)
    }

    pub fn highlighted(&self) -> impl Iterator<Item = usize> + '_ {
        self.highlighted
            .iter()
            .enumerate()
            .filter_map(|(slot, on)| on.then_some(slot))
    }
}

impl SlotIndicator for HighlightSet {
    fn mark_selected(&mut self, slot: usize) {
        if let Some(flag) = self.highlighted.get_mut(slot) {
            *flag = true;
        }
    }

    fn mark_cleared(&mut self, slot: usize) {
        if let Some(flag) = self.highlighted.get_mut(slot) {
            *flag = false;
        }
    }
}
