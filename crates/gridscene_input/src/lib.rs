//! Grid Input Handling
//!
//! This crate turns raw platform input into named, typed payloads and fans
//! them out to subscribers.

mod binding;
mod dispatcher;
mod platform;

pub use binding::{
    ControlEvent, Element, EventBinding, KeyEvent, KeyKind, PointerEvent, PointerKind, RawEvent,
};
pub use dispatcher::{DispatchError, EventDispatcher, Listener};
pub use platform::{PlatformTranslator, SelectControl};

// Re-export winit key and button types used in events
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
