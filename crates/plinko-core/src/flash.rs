//! Peg strike feedback.
//!
//! A struck peg jumps to [`Color::HIGHLIGHT`] and then decays back to
//! [`Color::BOARD`]. Each channel drops by a fixed step per tick
//! (`target / DECAY_STEPS`) and floors at its target independently, so the
//! channels finish at different ticks.
//!
//! Active flashes live in a side table keyed by [`PegId`]; one scheduler tick
//! advances all of them. A new strike replaces the peg's entry, which abandons
//! the previous decay without any explicit cancel.

use std::collections::HashMap;
use std::time::Duration;

use crate::color::Color;
use crate::layout::PegId;

/// Divisor applied to each target channel to get the per-tick step.
pub const DECAY_STEPS: f32 = 24.0;

/// Transient animation state of one peg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlashState {
    /// When the strike that started this decay happened.
    pub started_at: Duration,
    /// Current color channels.
    pub color: [f32; 3],
}

/// Applies one decay step towards `target`, never going below it.
pub fn decay_step(color: [f32; 3], target: [f32; 3]) -> [f32; 3] {
    std::array::from_fn(|i| target[i].max(color[i] - target[i] / DECAY_STEPS))
}

/// Upper bound on the ticks needed to decay from `from` to `target`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn decay_ticks(from: [f32; 3], target: [f32; 3]) -> u32 {
    (0..3)
        .map(|i| ((from[i] - target[i]).max(0.0) / (target[i] / DECAY_STEPS)).ceil() as u32)
        .max()
        .unwrap_or(0)
}

/// Drives every active peg flash.
#[derive(Debug, Clone)]
pub struct FlashAnimator {
    highlight: [f32; 3],
    target: [f32; 3],
    active: HashMap<PegId, FlashState>,
}

impl Default for FlashAnimator {
    fn default() -> Self {
        Self::new(Color::HIGHLIGHT, Color::BOARD)
    }
}

impl FlashAnimator {
    pub fn new(highlight: Color, target: Color) -> Self {
        Self {
            highlight: highlight.channels(),
            target: target.channels(),
            active: HashMap::new(),
        }
    }

    /// Starts (or restarts) the flash of `peg`.
    pub fn flash(&mut self, peg: PegId, now: Duration) {
        self.active.insert(
            peg,
            FlashState {
                started_at: now,
                color: self.highlight,
            },
        );
    }

    /// Advances every active flash by one frame.
    ///
    /// Returns the new color of each peg that changed; pegs that reached the
    /// base color are retired and reported with it.
    pub fn tick(&mut self) -> Vec<(PegId, Color)> {
        let target = self.target;
        let mut changed = Vec::with_capacity(self.active.len());

        self.active.retain(|peg, state| {
            state.color = decay_step(state.color, target);
            changed.push((*peg, Color::from_channels(state.color)));
            state.color != target
        });

        changed.sort_by_key(|(peg, _)| *peg);
        changed
    }

    /// Current color of `peg`; idle pegs have the base color.
    pub fn color_of(&self, peg: PegId) -> Color {
        self.active
            .get(&peg)
            .map_or_else(|| Color::from_channels(self.target), |s| Color::from_channels(s.color))
    }

    pub fn state(&self, peg: PegId) -> Option<&FlashState> {
        self.active.get(&peg)
    }

    pub fn is_flashing(&self, peg: PegId) -> bool {
        self.active.contains_key(&peg)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Drops every active flash.
    pub fn clear(&mut self) {
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEG: PegId = PegId(7);

    #[test]
    fn test_flash_starts_at_highlight() {
        let mut animator = FlashAnimator::default();
        animator.flash(PEG, Duration::from_millis(5));

        assert_eq!(animator.color_of(PEG), Color::HIGHLIGHT);
        assert_eq!(animator.state(PEG).unwrap().started_at, Duration::from_millis(5));
        assert_eq!(animator.color_of(PegId(8)), Color::BOARD);
    }

    #[test]
    fn test_decay_converges_without_undershoot() {
        let target = Color::BOARD.channels();
        let mut color = Color::HIGHLIGHT.channels();
        let bound = decay_ticks(color, target);

        let mut ticks = 0;
        while color != target {
            color = decay_step(color, target);
            ticks += 1;
            for i in 0..3 {
                assert!(color[i] >= target[i], "channel {i} undershot at tick {ticks}");
            }
            assert!(ticks <= bound, "did not converge within {bound} ticks");
        }
        assert_eq!(ticks, bound);
    }

    #[test]
    fn test_channels_finish_independently() {
        let target = Color::BOARD.channels();
        let start = Color::HIGHLIGHT.channels();

        let per_channel: Vec<u32> = (0..3)
            .map(|i| {
                let mut from = target;
                from[i] = start[i];
                decay_ticks(from, target)
            })
            .collect();
        assert_eq!(per_channel, vec![31, 25, 12]);
    }

    #[test]
    fn test_animator_retires_converged_flash() {
        let mut animator = FlashAnimator::default();
        animator.flash(PEG, Duration::ZERO);

        let bound = decay_ticks(Color::HIGHLIGHT.channels(), Color::BOARD.channels());
        for _ in 0..bound {
            assert!(animator.is_flashing(PEG));
            animator.tick();
        }
        assert!(!animator.is_flashing(PEG));
        assert_eq!(animator.color_of(PEG), Color::BOARD);
        assert!(animator.tick().is_empty());
    }

    #[test]
    fn test_restart_follows_only_the_new_decay() {
        let mut animator = FlashAnimator::default();
        animator.flash(PEG, Duration::from_millis(0));
        for _ in 0..5 {
            animator.tick();
        }

        animator.flash(PEG, Duration::from_millis(83));
        assert_eq!(animator.active_count(), 1);
        assert_eq!(animator.color_of(PEG), Color::HIGHLIGHT);

        // Replay the second decay on a fresh animator and compare frame by frame.
        let mut reference = FlashAnimator::default();
        reference.flash(PEG, Duration::from_millis(83));

        while reference.is_flashing(PEG) {
            assert_eq!(animator.tick(), reference.tick());
            assert_eq!(animator.active_count(), reference.active_count());
        }
        assert!(!animator.is_flashing(PEG));
    }

    #[test]
    fn test_tick_reports_each_active_peg() {
        let mut animator = FlashAnimator::default();
        animator.flash(PegId(3), Duration::ZERO);
        animator.flash(PegId(1), Duration::ZERO);

        let changed = animator.tick();
        let pegs: Vec<PegId> = changed.iter().map(|(peg, _)| *peg).collect();
        assert_eq!(pegs, vec![PegId(1), PegId(3)]);

        let expected = Color::from_channels(decay_step(
            Color::HIGHLIGHT.channels(),
            Color::BOARD.channels(),
        ));
        assert!(changed.iter().all(|(_, color)| *color == expected));
    }
}
