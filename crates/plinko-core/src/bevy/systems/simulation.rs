//! Fixed-step simulation systems: drag, physics, dispatch.
//!
//! These run chained in `FixedUpdate`, so a collision reported by one step
//! is dispatched before the next step begins.

use bevy::prelude::*;

use crate::bevy::events::{
    BoardRebuiltEvent, DropDiscEvent, ResizeBoardEvent, SlotClearedEvent, SlotSelectedEvent,
};
use crate::bevy::{PendingContacts, SessionRes, SlotHighlights};
use crate::labels::apply_transitions;
use crate::outcome::SlotTransition;
use crate::session::PlinkoSession;

/// Drives the disc towards the pointer while it is held.
pub fn apply_pointer_drag(session: Option<ResMut<SessionRes>>) {
    if let Some(mut session) = session {
        session.0.apply_drag();
    }
}

/// Steps the physics world once and queues the role pairs it reported.
pub fn step_board_physics(
    session: Option<ResMut<SessionRes>>,
    mut pending: ResMut<PendingContacts>,
) {
    let Some(mut session) = session else {
        return;
    };
    let contacts = session.0.step_physics();
    pending.0.extend(contacts);
}

/// Dispatches queued pairs and publishes the resulting slot transitions.
pub fn dispatch_collisions(
    time: Res<Time>,
    session: Option<ResMut<SessionRes>>,
    mut pending: ResMut<PendingContacts>,
    mut highlights: ResMut<SlotHighlights>,
    mut selected: MessageWriter<SlotSelectedEvent>,
    mut cleared: MessageWriter<SlotClearedEvent>,
) {
    let Some(mut session) = session else {
        return;
    };

    let contacts = std::mem::take(&mut pending.0);
    if contacts.is_empty() {
        return;
    }
    let report = session.0.dispatch(contacts, time.elapsed());

    apply_transitions(&mut highlights.0, &report.transitions);
    publish_transitions(&session.0, &report.transitions, &mut selected, &mut cleared);
}

fn publish_transitions(
    session: &PlinkoSession,
    transitions: &[SlotTransition],
    selected: &mut MessageWriter<SlotSelectedEvent>,
    cleared: &mut MessageWriter<SlotClearedEvent>,
) {
    for transition in transitions {
        match *transition {
            SlotTransition::Selected(slot) => {
                let Some(participant) = session.participants().get(slot) else {
                    continue;
                };
                selected.write(SlotSelectedEvent {
                    slot,
                    value: participant.value.clone(),
                    pronunciation: participant.pronunciation().to_owned(),
                });
            }
            SlotTransition::Cleared(slot) => {
                cleared.write(SlotClearedEvent { slot });
            }
        }
    }
}

/// Handles disc drop requests.
pub fn handle_drop_disc(
    mut events: MessageReader<DropDiscEvent>,
    session: Option<ResMut<SessionRes>>,
) {
    let Some(mut session) = session else {
        return;
    };
    for event in events.read() {
        tracing::debug!(x = event.x, "dropping disc");
        session.0.drop_disc_at(event.x);
    }
}

/// Rebuilds the board for a new viewport.
pub fn handle_resize_board(
    mut events: MessageReader<ResizeBoardEvent>,
    session: Option<ResMut<SessionRes>>,
    mut pending: ResMut<PendingContacts>,
    mut highlights: ResMut<SlotHighlights>,
    mut cleared: MessageWriter<SlotClearedEvent>,
    mut rebuilt: MessageWriter<BoardRebuiltEvent>,
) {
    let Some(mut session) = session else {
        return;
    };
    // Only the last size of a burst matters.
    let Some(event) = events.read().last().copied() else {
        return;
    };

    match session.0.resize(event.width, event.height) {
        Ok(transitions) => {
            pending.0.clear();
            apply_transitions(&mut highlights.0, &transitions);
            for transition in transitions {
                cleared.write(SlotClearedEvent {
                    slot: transition.slot(),
                });
            }
            rebuilt.write(BoardRebuiltEvent {
                width: event.width,
                height: event.height,
            });
        }
        Err(err) => {
            tracing::warn!(%err, width = event.width, height = event.height, "board resize rejected");
        }
    }
}
