//! Puzzle state for gridscene
//!
//! This crate provides the game-state side of the scene:
//! - [`GameState`] - Interface the renderer and input layers consume
//! - [`Sokoban`] - Box-pushing rules over a board of cell codes
//! - [`Level`] - RON level definitions with validation

mod level;
mod sokoban;
mod state;

pub use level::{Level, LevelError};
pub use sokoban::Sokoban;
pub use state::{board_to_text, Board, Cell, GameState, ObjectPositions};
