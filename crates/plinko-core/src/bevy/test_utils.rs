//! Test utilities for headless Bevy integration tests.
//!
//! Provides `TestApp`, a wrapper around `bevy::app::App` that uses
//! `MinimalPlugins` + `PlinkoHeadlessPlugin` for testing board logic
//! without a rendering or windowing backend.

use std::sync::Arc;

use bevy::prelude::*;

use crate::audio::{SilentAudio, SoundEffects};
use crate::bevy::plugin::PlinkoHeadlessPlugin;
use crate::bevy::resources::SessionRes;
use crate::layout::BoardConfig;
use crate::participants::{Participant, ParticipantList};
use crate::physics::PHYSICS_DT;
use crate::session::PlinkoSession;

/// A headless Bevy app wrapper for testing.
pub(crate) struct TestApp {
    pub app: App,
}

impl TestApp {
    /// Create a 1280x800 board with `slots` participants and silent audio.
    pub fn new(slots: usize) -> Self {
        Self::with_audio(slots, Arc::new(SilentAudio))
    }

    /// Create a 1280x800 board with `slots` participants named `P0`, `P1`, ...
    pub fn with_audio(slots: usize, audio: Arc<dyn SoundEffects>) -> Self {
        let participants = ParticipantList::new(
            (0..slots)
                .map(|i| Participant::new(format!("P{i}")))
                .collect(),
        )
        .expect("test participants must not be empty");
        let config = BoardConfig::new(1280.0, 800.0, slots).expect("valid test board");

        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(PlinkoHeadlessPlugin::new(config, participants).with_audio(audio));
        // Pause virtual time so that only explicit step_physics calls
        // advance the simulation.
        app.world_mut()
            .resource_mut::<Time<Virtual>>()
            .pause();
        // Run one update to initialize all resources
        app.update();
        Self { app }
    }

    /// Run a single frame update.
    pub fn update(&mut self) {
        self.app.update();
    }

    /// Advance the physics simulation by exactly `n` fixed timesteps.
    ///
    /// Uses `Time<Fixed>::accumulate_overstep` to feed time directly into
    /// the fixed-timestep accumulator, bypassing virtual time.
    pub fn step_physics(&mut self, n: usize) {
        let dt = std::time::Duration::from_secs_f32(PHYSICS_DT);
        for _ in 0..n {
            self.app
                .world_mut()
                .resource_mut::<Time<Fixed>>()
                .accumulate_overstep(dt);
            self.app.update();
        }
    }

    pub fn session(&self) -> &PlinkoSession {
        &self.app.world().resource::<SessionRes>().0
    }

    pub fn session_mut(&mut self) -> &mut PlinkoSession {
        &mut self
            .app
            .world_mut()
            .resource_mut::<SessionRes>()
            .into_inner()
            .0
    }

    /// Get a reference to the World.
    pub fn world(&self) -> &World {
        self.app.world()
    }

    /// Get a mutable reference to the World.
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}
