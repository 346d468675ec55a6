//! Input handling module
//!
//! Provides the scene's event bindings and the shell key mapping.

mod bindings;
mod input_mapper;

pub use bindings::{game_bindings, Direction, GameInput, GO_TO, LEVEL_SELECT, SCENE_CLICK};
pub use input_mapper::{InputAction, InputMapper};
