//! Bevy plugins for the board.
//!
//! Provides:
//! - `PlinkoHeadlessPlugin`: Logic-only plugin (no rendering/window dependencies) for headless runs and tests
//! - `PlinkoRenderPlugin`: `PlinkoHeadlessPlugin` + camera, gizmo drawing, labels and pointer input

use std::sync::Arc;

use bevy::prelude::*;

use crate::audio::{SilentAudio, SoundEffects};
use crate::bevy::events::*;
use crate::bevy::resources::*;
use crate::bevy::systems;
use crate::color::Color as BoardColor;
use crate::layout::BoardConfig;
use crate::participants::ParticipantList;
use crate::physics::PHYSICS_DT;
use crate::session::PlinkoSession;

/// Headless plugin containing all board logic without rendering or window dependencies.
///
/// Use this plugin in tests with `MinimalPlugins` to run the board without
/// requiring a windowing or rendering backend.
pub struct PlinkoHeadlessPlugin {
    pub config: BoardConfig,
    pub participants: ParticipantList,
    pub audio: Arc<dyn SoundEffects>,
}

impl PlinkoHeadlessPlugin {
    pub fn new(config: BoardConfig, participants: ParticipantList) -> Self {
        Self {
            config,
            participants,
            audio: Arc::new(SilentAudio),
        }
    }

    #[must_use]
    pub fn with_audio(mut self, audio: Arc<dyn SoundEffects>) -> Self {
        self.audio = audio;
        self
    }
}

impl Plugin for PlinkoHeadlessPlugin {
    fn build(&self, app: &mut App) {
        // ====================================================================
        // Physics
        // ====================================================================
        app.insert_resource(Time::<Fixed>::from_seconds(f64::from(PHYSICS_DT)));

        // ====================================================================
        // Resources
        // ====================================================================
        match PlinkoSession::with_config(self.config, self.participants.clone(), self.audio.clone()) {
            Ok(session) => {
                app.insert_resource(SlotHighlights::new(session.outcome().slot_count()));
                app.insert_resource(SessionRes::new(session));
            }
            Err(err) => {
                tracing::error!(%err, "failed to build board; running without a session");
                app.insert_resource(SlotHighlights::default());
            }
        }
        app.insert_resource(PendingContacts::default());

        // ====================================================================
        // Messages
        // ====================================================================
        app.add_message::<SlotSelectedEvent>()
            .add_message::<SlotClearedEvent>()
            .add_message::<DropDiscEvent>()
            .add_message::<ResizeBoardEvent>()
            .add_message::<BoardRebuiltEvent>();

        // ====================================================================
        // Simulation (FixedUpdate)
        // ====================================================================
        app.add_systems(
            FixedUpdate,
            (
                systems::apply_pointer_drag,
                systems::step_board_physics,
                systems::dispatch_collisions,
            )
                .chain(),
        );

        // ====================================================================
        // Requests and animation (Update)
        // ====================================================================
        app.add_systems(
            Update,
            (
                systems::handle_resize_board,
                systems::handle_drop_disc,
                systems::tick_peg_flashes,
            )
                .chain(),
        );
    }
}

/// Full plugin: headless logic plus rendering and pointer input.
///
/// Needs `DefaultPlugins` (window, gizmos, text).
pub struct PlinkoRenderPlugin {
    pub config: BoardConfig,
    pub participants: ParticipantList,
    pub audio: Arc<dyn SoundEffects>,
}

impl PlinkoRenderPlugin {
    pub fn new(config: BoardConfig, participants: ParticipantList) -> Self {
        Self {
            config,
            participants,
            audio: Arc::new(SilentAudio),
        }
    }

    #[must_use]
    pub fn with_audio(mut self, audio: Arc<dyn SoundEffects>) -> Self {
        self.audio = audio;
        self
    }
}

impl Plugin for PlinkoRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(
            PlinkoHeadlessPlugin::new(self.config, self.participants.clone())
                .with_audio(self.audio.clone()),
        );

        app.insert_resource(ClearColor(systems::to_bevy_color(BoardColor::BACKGROUND, 1.0)));

        app.add_systems(
            Startup,
            (systems::setup_board_camera, systems::spawn_slot_labels),
        );

        app.add_systems(
            Update,
            (
                systems::forward_window_resize.before(systems::handle_resize_board),
                systems::handle_pointer_input,
                systems::refresh_slot_labels.after(systems::handle_resize_board),
                systems::update_slot_label_colors,
                systems::render_board,
            ),
        );
    }
}
