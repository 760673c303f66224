//! Error types for board construction and configuration loading.

/// Rejected board configuration.
///
/// There is no meaningful partial board, so any of these aborts construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("slot count must be at least 1, got {0}")]
    NoSlots(usize),
    #[error("viewport dimensions must be positive and finite, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
    #[error("scale must be positive and finite, got {0}")]
    InvalidScale(f32),
}

/// Failure while inserting a generated layout into the physics world.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("funnel part {part} has no convex hull")]
    DegenerateShape { part: usize },
}

/// Failure while loading the participant list.
#[derive(Debug, thiserror::Error)]
pub enum ParticipantError {
    #[error("participant list is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("participant list is empty")]
    Empty,
}
