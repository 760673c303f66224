//! Sound playback through Bevy audio.
//!
//! The session plays clips from inside a fixed step, where no `Commands` are
//! available. Clips are queued on a [`SoundQueue`] shared with the session and
//! turned into one-shot `AudioPlayer` entities by `play_queued_sounds`, so the
//! same clip can overlap itself.

use std::sync::Arc;

use bevy::prelude::*;
use parking_lot::Mutex;

use crate::audio::{SoundClip, SoundEffects};

/// Directory under `assets/` holding the clip files.
pub const SOUND_ASSET_DIR: &str = "sounds";

/// Clips requested by the session, waiting to be played.
#[derive(Resource, Debug, Clone, Default)]
pub struct SoundQueue(Arc<Mutex<Vec<SoundClip>>>);

impl SoundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes every queued clip, oldest first.
    pub fn drain(&self) -> Vec<SoundClip> {
        std::mem::take(&mut *self.0.lock())
    }
}

impl SoundEffects for SoundQueue {
    fn play(&self, clip: SoundClip) {
        self.0.lock().push(clip);
    }
}

/// Asset path of a clip, relative to the asset root.
pub fn clip_path(clip: SoundClip) -> String {
    format!("{SOUND_ASSET_DIR}/{}", clip.asset())
}

/// Spawns a self-despawning player for every queued clip.
#[cfg(feature = "windowed")]
pub fn play_queued_sounds(
    mut commands: Commands,
    queue: Option<Res<SoundQueue>>,
    asset_server: Option<Res<AssetServer>>,
) {
    let Some(queue) = queue else {
        return;
    };
    let clips = queue.drain();
    if clips.is_empty() {
        return;
    }
    let Some(asset_server) = asset_server else {
        tracing::debug!(dropped = clips.len(), "no asset server; sounds dropped");
        return;
    };

    for clip in clips {
        commands.spawn((
            AudioPlayer::new(asset_server.load(clip_path(clip))),
            PlaybackSettings::DESPAWN.with_volume(bevy::audio::Volume::Linear(clip.volume())),
        ));
    }
}

/// Plays the board's clips with Bevy audio.
///
/// Pass the same queue to the board plugin with `with_audio`. Missing clip
/// files are reported by the asset server and otherwise ignored.
#[cfg(feature = "windowed")]
pub struct PlinkoAudioPlugin {
    pub queue: SoundQueue,
}

#[cfg(feature = "windowed")]
impl PlinkoAudioPlugin {
    pub fn new(queue: SoundQueue) -> Self {
        Self { queue }
    }
}

#[cfg(feature = "windowed")]
impl Plugin for PlinkoAudioPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.queue.clone());
        app.add_systems(Update, play_queued_sounds);
    }
}
