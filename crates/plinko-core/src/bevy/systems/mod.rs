//! ECS Systems for the board.

mod animation;
mod rendering;
mod simulation;

pub use animation::*;
pub use rendering::*;
pub use simulation::*;
