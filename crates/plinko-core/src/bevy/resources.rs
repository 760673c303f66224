//! ECS Resources for the board.

use bevy::prelude::*;

use crate::board::RoleContact;
use crate::labels::HighlightSet;
use crate::session::PlinkoSession;

/// The running board session.
#[derive(Resource, Debug)]
pub struct SessionRes(pub PlinkoSession);

impl SessionRes {
    pub fn new(session: PlinkoSession) -> Self {
        Self(session)
    }
}

/// Role pairs reported by the last physics step, awaiting dispatch.
#[derive(Resource, Debug, Default)]
pub struct PendingContacts(pub Vec<RoleContact>);

/// Which slot labels are currently highlighted.
#[derive(Resource, Debug, Clone, Default)]
pub struct SlotHighlights(pub HighlightSet);

impl SlotHighlights {
    pub fn new(slot_count: usize) -> Self {
        Self(HighlightSet::new(slot_count))
    }
}
