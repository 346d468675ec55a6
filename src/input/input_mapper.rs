//! Input mapping from raw keys to shell actions
//!
//! Maps keys that act on the application itself, such as Exit and level
//! restart. Arrow keys and clicks are NOT mapped here - they go through the
//! scene's event bindings.

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Actions handled by the shell rather than the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Exit application (Escape)
    Exit,
    /// Reload the current level from its start (R key)
    RestartLevel,
}

/// Maps raw key input to shell actions
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Returns `Some(action)` for shell keys, `None` for everything else
    pub fn map_keyboard(key: KeyCode, state: ElementState) -> Option<InputAction> {
        // Only handle key presses, not releases
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            KeyCode::Escape => Some(InputAction::Exit),
            KeyCode::KeyR => Some(InputAction::RestartLevel),
            _ => None,
        }
    }
}
