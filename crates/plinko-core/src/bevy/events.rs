//! ECS Messages for the board.
//!
//! Note: In Bevy 0.18+, buffered events use the Message trait instead of Event.

use bevy::prelude::*;

/// Message fired when the disc enters a slot.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct SlotSelectedEvent {
    pub slot: usize,
    /// Label text of the participant in that slot.
    pub value: String,
    /// What a speech engine should say for the participant.
    pub pronunciation: String,
}

/// Message fired when the disc leaves a slot.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotClearedEvent {
    pub slot: usize,
}

/// Message to request dropping the disc above board x `x`.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct DropDiscEvent {
    pub x: f32,
}

/// Message to request rebuilding the board for a new viewport.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct ResizeBoardEvent {
    pub width: f32,
    pub height: f32,
}

/// Message fired after the board was rebuilt.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct BoardRebuiltEvent {
    pub width: f32,
    pub height: f32,
}
