//! gridscene - tile-grid puzzle on a 2D drawing surface
//!
//! The application crate wires the workspace together:
//! - [`config`] - Layered TOML/env configuration
//! - [`assets`] - Texture loading
//! - [`input`] - The scene's event bindings and shell keys
//! - [`scene`] - Board to renderer construction
//! - [`session`] - Level list, moves and completion
//! - [`systems`] - Window and debug text

pub mod assets;
pub mod config;
pub mod input;
pub mod scene;
pub mod session;
pub mod systems;
