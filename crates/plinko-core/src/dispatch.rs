//! Collision dispatch.
//!
//! Turns role-resolved collision pairs into outcome changes, peg flashes and
//! sounds. Peg strikes and sensor entries are checked independently for each
//! pair, so one pair may trigger both.
//!
//! Bounce sounds go through a [`BounceLimiter`]; the ding that accompanies a
//! winner selection is never throttled.

use std::time::Duration;

use crate::audio::SoundEffects;
use crate::board::{ContactPhase, RoleContact};
use crate::flash::FlashAnimator;
use crate::layout::PegId;
use crate::outcome::{OutcomeTracker, SlotTransition};

/// Minimum spacing between two bounce sounds.
pub const BOUNCE_SOUND_INTERVAL: Duration = Duration::from_millis(10);

/// Rate limiter for bounce sounds.
#[derive(Debug, Clone)]
pub struct BounceLimiter {
    interval: Duration,
    last_played: Option<Duration>,
}

impl Default for BounceLimiter {
    fn default() -> Self {
        Self::new(BOUNCE_SOUND_INTERVAL)
    }
}

impl BounceLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_played: None,
        }
    }

    /// Returns true (and records `now`) if a sound may play at `now`.
    pub fn try_acquire(&mut self, now: Duration) -> bool {
        let allowed = self
            .last_played
            .is_none_or(|last| now.saturating_sub(last) >= self.interval);
        if allowed {
            self.last_played = Some(now);
        }
        allowed
    }

    pub fn last_played(&self) -> Option<Duration> {
        self.last_played
    }
}

/// Everything one dispatch call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub transitions: Vec<SlotTransition>,
    pub flashed: Vec<PegId>,
    pub bounces: usize,
    pub suppressed_bounces: usize,
    pub dings: usize,
}

impl DispatchReport {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn merge(&mut self, other: Self) {
        self.transitions.extend(other.transitions);
        self.flashed.extend(other.flashed);
        self.bounces += other.bounces;
        self.suppressed_bounces += other.suppressed_bounces;
        self.dings += other.dings;
    }
}

/// Routes collision pairs to the outcome tracker, the flash animator and audio.
#[derive(Debug, Clone, Default)]
pub struct CollisionDispatcher {
    limiter: BounceLimiter,
}

impl CollisionDispatcher {
    pub fn new(limiter: BounceLimiter) -> Self {
        Self { limiter }
    }

    pub fn limiter(&self) -> &BounceLimiter {
        &self.limiter
    }

    /// Processes a batch of pairs in the order the engine reported them.
    pub fn dispatch<I>(
        &mut self,
        contacts: I,
        now: Duration,
        outcome: &mut OutcomeTracker,
        animator: &mut FlashAnimator,
        audio: &dyn SoundEffects,
    ) -> DispatchReport
    where
        I: IntoIterator<Item = RoleContact>,
    {
        let mut report = DispatchReport::default();
        for contact in contacts {
            let pair = match contact.phase {
                ContactPhase::Started => self.on_start(contact, now, outcome, animator, audio),
                ContactPhase::Ended => Self::on_end(contact, outcome),
            };
            report.merge(pair);
        }
        report
    }

    fn on_start(
        &mut self,
        contact: RoleContact,
        now: Duration,
        outcome: &mut OutcomeTracker,
        animator: &mut FlashAnimator,
        audio: &dyn SoundEffects,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();

        if let Some(peg) = contact.a.peg().or_else(|| contact.b.peg()) {
            if self.limiter.try_acquire(now) {
                audio.play_bounce();
                report.bounces += 1;
            } else {
                tracing::trace!(?peg, ?now, "bounce sound rate-limited");
                report.suppressed_bounces += 1;
            }
            animator.flash(peg, now);
            report.flashed.push(peg);
        }

        if let Some(slot) = contact.a.slot().or_else(|| contact.b.slot()) {
            if let Some(transition) = outcome.select(slot) {
                tracing::debug!(slot, "slot selected");
                report.transitions.push(transition);
            }
            audio.play_ding();
            report.dings += 1;
        }

        report
    }

    fn on_end(contact: RoleContact, outcome: &mut OutcomeTracker) -> DispatchReport {
        let mut report = DispatchReport::default();
        if let Some(slot) = contact.a.slot().or_else(|| contact.b.slot()) {
            if let Some(transition) = outcome.clear(slot) {
                tracing::debug!(slot, "slot cleared");
                report.transitions.push(transition);
            }
        }
        report
    }
}
