//! Scene construction utilities
//!
//! This module turns a game board into a renderer and keeps the two in step.

mod scene_builder;

pub use scene_builder::{
    box_line_shape, SceneBuilder, SceneHandles, BLOCK_COLOR, BOX_COLOR, BOX_LINE_COLOR,
    PLAYER_COLOR, TARGET_COLOR,
};
