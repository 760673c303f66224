//! Peg flash animation.

use bevy::prelude::*;

use crate::bevy::SessionRes;

/// Advances every active peg flash once per rendered frame.
pub fn tick_peg_flashes(session: Option<ResMut<SessionRes>>) {
    let Some(mut session) = session else {
        return;
    };
    let changed = session.0.tick_animation();
    if !changed.is_empty() {
        tracing::trace!(pegs = changed.len(), "peg flashes advanced");
    }
}
