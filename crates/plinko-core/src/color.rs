//! Colors used by the board renderer and the peg flash animation.

use serde::{Deserialize, Serialize};

/// RGBA color representation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Board color used by pegs, funnel walls and the bottom assembly (`#707b88`).
    pub const BOARD: Color = Color::rgb(112, 123, 136);
    /// Canvas background (`#272c35`).
    pub const BACKGROUND: Color = Color::rgb(39, 44, 53);
    /// Disc fill (`#1497ff`).
    pub const DISC: Color = Color::rgb(20, 151, 255);
    /// Peg color right after a strike (`#fff8c7`).
    pub const HIGHLIGHT: Color = Color::rgb(255, 248, 199);
    /// Sensor fill; sensors are drawn with zero opacity.
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    /// Fallback for bodies without an explicit style.
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// RGB channels as floats in 0..=255.
    pub fn channels(&self) -> [f32; 3] {
        [f32::from(self.r), f32::from(self.g), f32::from(self.b)]
    }

    /// Builds an opaque color from float channels, rounding to the nearest byte.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_channels(channels: [f32; 3]) -> Self {
        let byte = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        Self::rgb(byte(channels[0]), byte(channels[1]), byte(channels[2]))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BOARD
    }
}
