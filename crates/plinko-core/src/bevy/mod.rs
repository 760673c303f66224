//! Bevy integration for the board.
//!
//! The session runs inside a resource. Physics and collision dispatch run in
//! `FixedUpdate`, peg flashes tick in `Update`, and slot changes are
//! published as messages for the presentation layer.

pub mod audio;
pub mod components;
pub mod events;
pub mod plugin;
pub mod resources;
pub mod systems;

#[cfg(test)]
pub(crate) mod test_utils;

#[cfg(feature = "windowed")]
pub use audio::PlinkoAudioPlugin;
pub use audio::SoundQueue;
pub use components::*;
pub use events::*;
pub use plugin::{PlinkoHeadlessPlugin, PlinkoRenderPlugin};
pub use resources::*;
