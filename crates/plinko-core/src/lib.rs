//! Plinko-Live Core Library
//!
//! A randomizer board: a disc falls through a procedurally generated peg
//! field into one of N slots, and the slot it settles in picks a winner.
//!
//! The library is layered:
//! - Pure geometry (`layout`) and pure state (`outcome`, `flash`)
//! - Physics insertion and collision routing (`board`, `dispatch`) on `Rapier2D`
//! - A session driver (`session`) and Bevy plugins (`bevy`) on top

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod audio;
pub mod board;
pub mod color;
pub mod dispatch;
pub mod error;
pub mod flash;
pub mod labels;
pub mod layout;
pub mod outcome;
pub mod participants;
pub mod physics;
pub mod session;

// Bevy integration
pub mod bevy;

pub use audio::{RecordingAudio, SilentAudio, SoundClip, SoundEffects};
pub use board::{Board, BodyRole, ContactPhase, RenderItem, RenderShape, RoleContact};
pub use color::Color;
pub use dispatch::{BOUNCE_SOUND_INTERVAL, BounceLimiter, CollisionDispatcher, DispatchReport};
pub use error::{BoardError, LayoutError, ParticipantError};
pub use flash::{FlashAnimator, FlashState};
pub use labels::{HighlightSet, SlotIndicator, SlotLabel, apply_transitions, slot_labels};
pub use layout::{BoardConfig, BoardLayout, PegId, RenderStyle};
pub use outcome::{OutcomeTracker, SlotTransition};
pub use participants::{Participant, ParticipantList};
pub use physics::{PHYSICS_DT, PhysicsWorld, default_gravity};
pub use session::{PlinkoSession, PointerDrag};
