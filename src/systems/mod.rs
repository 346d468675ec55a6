//! Application systems
//!
//! Shell pieces extracted from main.rs for better organization and testability.

mod window;

pub use window::{DebugText, WindowError, WindowSystem};
