//! ECS Components for the board renderer.

use bevy::prelude::*;

/// Marker for the camera looking at the board.
#[derive(Component, Debug, Default)]
pub struct MainCamera;

/// Text entity showing the participant of one slot.
#[derive(Component, Debug, Clone, Copy)]
pub struct SlotLabelText {
    pub slot: usize,
}
