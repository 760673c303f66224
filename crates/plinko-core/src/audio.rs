//! Sound effect seam.
//!
//! Sounds are cosmetic: implementations must swallow playback failures and
//! must let the same clip overlap itself.

use parking_lot::Mutex;

/// The two clips the board plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundClip {
    /// Disc strikes a peg.
    Bounce,
    /// Disc enters a slot sensor.
    Ding,
}

impl SoundClip {
    /// Asset file of the clip.
    pub fn asset(&self) -> &'static str {
        match self {
            Self::Bounce => "186993__lloydevans09__wood-spin.wav",
            Self::Ding => "127149__daphne-in-wonderland__ding.wav",
        }
    }

    /// Playback volume (0.0 - 1.0).
    pub fn volume(&self) -> f32 {
        match self {
            Self::Bounce => 0.2,
            Self::Ding => 1.0,
        }
    }
}

/// Fire-and-forget sound playback.
pub trait SoundEffects: Send + Sync {
    fn play(&self, clip: SoundClip);

    fn play_bounce(&self) {
        self.play(SoundClip::Bounce);
    }

    fn play_ding(&self) {
        self.play(SoundClip::Ding);
    }
}

/// Plays nothing; used by headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl SoundEffects for SilentAudio {
    fn play(&self, clip: SoundClip) {
        tracing::trace!(?clip, "sound suppressed (silent audio)");
    }
}

/// Records every requested clip, in order.
#[derive(Debug, Default)]
pub struct RecordingAudio {
    played: Mutex<Vec<SoundClip>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<SoundClip> {
        self.played.lock().clone()
    }

    pub fn count(&self, clip: SoundClip) -> usize {
        self.played.lock().iter().filter(|c| **c == clip).count()
    }

    pub fn clear(&self) {
        self.played.lock().clear();
    }
}

impl SoundEffects for RecordingAudio {
    fn play(&self, clip: SoundClip) {
        self.played.lock().push(clip);
    }
}

impl<T: SoundEffects + ?Sized> SoundEffects for std::sync::Arc<T> {
    fn play(&self, clip: SoundClip) {
        (**self).play(clip);
    }
}
