//! Board session: the driver tying physics, dispatch and animation together.
//!
//! A session owns one physics world with one assembled board. Each fixed
//! step applies pointer dragging, advances the engine, and routes the
//! reported collisions through the dispatcher. Animation ticks run
//! separately, once per rendered frame.

use std::sync::Arc;
use std::time::Duration;

use rapier2d::prelude::Vector;

use crate::audio::{SilentAudio, SoundEffects};
use crate::board::{Board, RenderItem, RoleContact};
use crate::color::Color;
use crate::dispatch::{CollisionDispatcher, DispatchReport};
use crate::error::BoardError;
use crate::flash::FlashAnimator;
use crate::labels::{slot_labels, SlotLabel};
use crate::layout::{BoardConfig, BoardLayout, PegId};
use crate::outcome::{OutcomeTracker, SlotTransition};
use crate::participants::{Participant, ParticipantList};
use crate::physics::{PhysicsWorld, PHYSICS_DT};

/// Mouse dragging of the disc.
///
/// While held, the disc is pulled onto the pointer with stiffness 1: its
/// velocity is set so that one physics step covers the remaining gap.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerDrag {
    target: Option<[f32; 2]>,
}

impl PointerDrag {
    /// Starts a drag if `point` lies on the disc.
    pub fn grab(&mut self, point: [f32; 2], disc_center: [f32; 2], disc_radius: f32) -> bool {
        let dx = point[0] - disc_center[0];
        let dy = point[1] - disc_center[1];
        let hit = dx * dx + dy * dy <= disc_radius * disc_radius;
        if hit {
            self.target = Some(point);
        }
        hit
    }

    /// Moves the drag target; ignored when nothing is held.
    pub fn drag_to(&mut self, point: [f32; 2]) {
        if let Some(target) = self.target.as_mut() {
            *target = point;
        }
    }

    /// Ends the drag. Returns whether anything was held.
    pub fn release(&mut self) -> bool {
        self.target.take().is_some()
    }

    pub fn is_held(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<[f32; 2]> {
        self.target
    }
}

/// One running board.
pub struct PlinkoSession {
    world: PhysicsWorld,
    board: Board,
    participants: ParticipantList,
    outcome: OutcomeTracker,
    animator: FlashAnimator,
    dispatcher: CollisionDispatcher,
    audio: Arc<dyn SoundEffects>,
    drag: PointerDrag,
}

impl std::fmt::Debug for PlinkoSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlinkoSession")
            .field("world", &self.world)
            .field("slots", &self.board.slot_count())
            .field("outcome", &self.outcome)
            .field("active_flashes", &self.animator.active_count())
            .field("drag", &self.drag)
            .finish_non_exhaustive()
    }
}

impl PlinkoSession {
    /// Builds a board for `participants` in a `width` x `height` viewport.
    pub fn new(
        width: f32,
        height: f32,
        participants: ParticipantList,
        audio: Arc<dyn SoundEffects>,
    ) -> Result<Self, BoardError> {
        let config = BoardConfig::new(width, height, participants.len())?;
        Self::with_config(config, participants, audio)
    }

    /// Headless session with silent audio.
    pub fn silent(width: f32, height: f32, participants: ParticipantList) -> Result<Self, BoardError> {
        Self::new(width, height, participants, Arc::new(SilentAudio))
    }

    /// Builds a board from an explicit configuration.
    ///
    /// The configuration's slot count must match the participant count.
    pub fn with_config(
        config: BoardConfig,
        participants: ParticipantList,
        audio: Arc<dyn SoundEffects>,
    ) -> Result<Self, BoardError> {
        let config = BoardConfig {
            slot_count: participants.len(),
            ..config
        };
        let (world, board) = build(&config)?;

        Ok(Self {
            world,
            outcome: OutcomeTracker::new(board.slot_count()),
            board,
            participants,
            animator: FlashAnimator::default(),
            dispatcher: CollisionDispatcher::default(),
            audio,
            drag: PointerDrag::default(),
        })
    }

    /// Simulated time: frames stepped so far times the fixed timestep.
    pub fn elapsed(&self) -> Duration {
        #[allow(clippy::cast_precision_loss)]
        Duration::from_secs_f64(self.world.current_frame() as f64 * f64::from(PHYSICS_DT))
    }

    /// Advances one fixed step, stamping collisions with simulated time.
    pub fn step(&mut self) -> DispatchReport {
        let now = self.elapsed();
        self.step_at(now)
    }

    /// Advances one fixed step, stamping collisions with `now`.
    pub fn step_at(&mut self, now: Duration) -> DispatchReport {
        self.apply_drag();
        let contacts = self.step_physics();
        self.dispatch(contacts, now)
    }

    /// Steps the engine once and resolves the reported pairs to roles.
    pub fn step_physics(&mut self) -> Vec<RoleContact> {
        let events = self.world.step_with_events();
        let contacts: Vec<_> = events
            .iter()
            .filter_map(|event| self.board.classify(event))
            .collect();
        tracing::trace!(
            frame = self.world.current_frame(),
            events = events.len(),
            contacts = contacts.len(),
            "physics step"
        );
        contacts
    }

    /// Routes resolved pairs to the outcome tracker, the animator and audio.
    pub fn dispatch(&mut self, contacts: Vec<RoleContact>, now: Duration) -> DispatchReport {
        let report = self.dispatcher.dispatch(
            contacts,
            now,
            &mut self.outcome,
            &mut self.animator,
            self.audio.as_ref(),
        );

        for transition in &report.transitions {
            if let SlotTransition::Selected(slot) = transition {
                let name = self.participants.get(*slot).map(|p| p.value.as_str());
                tracing::info!(slot, winner = name, "winner selected");
            }
        }
        report
    }

    /// Advances every peg flash by one frame.
    pub fn tick_animation(&mut self) -> Vec<(PegId, Color)> {
        self.animator.tick()
    }

    /// Pulls the disc towards the pointer while a drag is held.
    pub fn apply_drag(&mut self) {
        let Some(target) = self.drag.target() else {
            return;
        };
        let Some(pos) = self.board.disc_position(&self.world) else {
            return;
        };
        if let Some(body) = self.world.get_rigid_body_mut(self.board.disc_body()) {
            let velocity = Vector::new(
                (target[0] - pos[0]) / PHYSICS_DT,
                (target[1] - pos[1]) / PHYSICS_DT,
            );
            body.set_linvel(velocity, true);
        }
    }

    /// Starts dragging the disc if `point` is on it.
    pub fn grab(&mut self, point: [f32; 2]) -> bool {
        let Some(center) = self.board.disc_position(&self.world) else {
            return false;
        };
        let radius = self.board.layout().disc.radius;
        self.drag.grab(point, center, radius)
    }

    pub fn drag_to(&mut self, point: [f32; 2]) {
        self.drag.drag_to(point);
    }

    pub fn release(&mut self) -> bool {
        self.drag.release()
    }

    pub fn drag(&self) -> &PointerDrag {
        &self.drag
    }

    /// Teleports the disc above `x` and lets it fall.
    ///
    /// The drop point sits one unit above the first peg row, clear of every peg.
    pub fn drop_disc_at(&mut self, x: f32) {
        let y = self.config().scale;
        self.place_disc([x, y]);
    }

    /// Teleports the disc to `position` at rest.
    pub fn place_disc(&mut self, position: [f32; 2]) {
        self.drag.release();
        self.board.place_disc(&mut self.world, position);
    }

    /// Rebuilds the board for a new viewport.
    ///
    /// The outcome is reset; the returned transitions clear any previous winner.
    /// The simulated clock restarts with the new world, so the bounce limiter
    /// is reset with it.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<Vec<SlotTransition>, BoardError> {
        let config = BoardConfig::new(width, height, self.participants.len())?;
        let (world, board) = build(&config)?;

        self.world = world;
        self.board = board;
        self.animator.clear();
        self.dispatcher = CollisionDispatcher::default();
        self.drag.release();
        tracing::info!(width, height, scale = config.scale, "board rebuilt");
        Ok(self.outcome.reset())
    }

    pub fn render_items(&self) -> Vec<RenderItem> {
        self.board.render_items(&self.world, &self.animator)
    }

    pub fn labels(&self) -> Vec<SlotLabel> {
        slot_labels(&self.board.layout().config, &self.participants)
    }

    pub fn config(&self) -> &BoardConfig {
        &self.board.layout().config
    }

    pub fn layout(&self) -> &BoardLayout {
        self.board.layout()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn outcome(&self) -> &OutcomeTracker {
        &self.outcome
    }

    pub fn animator(&self) -> &FlashAnimator {
        &self.animator
    }

    pub fn participants(&self) -> &ParticipantList {
        &self.participants
    }

    pub fn disc_position(&self) -> Option<[f32; 2]> {
        self.board.disc_position(&self.world)
    }

    /// The participant in the currently selected slot.
    pub fn winner(&self) -> Option<&Participant> {
        self.outcome
            .winner()
            .and_then(|slot| self.participants.get(slot))
    }
}

fn build(config: &BoardConfig) -> Result<(PhysicsWorld, Board), BoardError> {
    let layout = BoardLayout::generate(config)?;
    let mut world = PhysicsWorld::new();
    let board = Board::assemble(layout, &mut world)?;
    Ok((world, board))
}
