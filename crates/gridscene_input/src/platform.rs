//! winit window events to [`RawEvent`]s
//!
//! The desktop shell has no DOM, so this module plays its part: it tracks
//! the cursor in surface coordinates, synthesizes clicks from press/release
//! pairs, and models the level `<select>` as a digit-key driven control.

use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use gridscene_math::{Rect, Vec2};

use crate::binding::{ControlEvent, Element, KeyEvent, KeyKind, PointerEvent, PointerKind, RawEvent};

/// Stateful translator from window events to platform-neutral events
#[derive(Debug, Clone)]
pub struct PlatformTranslator {
    cursor: Option<Vec2>,
    /// Surface pixels per window pixel
    scale: Vec2,
    pressed: Vec<MouseButton>,
}

impl Default for PlatformTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformTranslator {
    pub fn new() -> Self {
        Self {
            cursor: None,
            scale: Vec2::ONE,
            pressed: Vec::new(),
        }
    }

    /// Map a `window` sized client area onto a `surface` sized canvas
    pub fn fit(&mut self, window: (u32, u32), surface: (u32, u32)) {
        if window.0 == 0 || window.1 == 0 {
            return;
        }
        self.scale = Vec2::new(
            surface.0 as f32 / window.0 as f32,
            surface.1 as f32 / window.1 as f32,
        );
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Last cursor position in surface coordinates
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    /// Translate one window event; most produce nothing
    pub fn translate(&mut self, event: &WindowEvent) -> Vec<RawEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(position.x, position.y);
                Vec::new()
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                self.pressed.clear();
                Vec::new()
            }
            WindowEvent::MouseInput { state, button, .. } => self.mouse_input(*state, *button),
            WindowEvent::Resized(size) => {
                log::debug!("Window resized to {}x{}", size.width, size.height);
                Vec::new()
            }
            WindowEvent::KeyboardInput { event, .. } => match event.physical_key {
                PhysicalKey::Code(code) => vec![Self::key_input(code, event.state, event.repeat)],
                PhysicalKey::Unidentified(_) => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    /// Record a cursor move given in window pixels
    pub fn cursor_moved(&mut self, x: f64, y: f64) {
        self.cursor = Some(Vec2::new(x as f32, y as f32).component_mul(self.scale));
    }

    /// Button change at the current cursor; a release after a press of the
    /// same button also yields a click
    pub fn mouse_input(&mut self, state: ElementState, button: MouseButton) -> Vec<RawEvent> {
        let Some(position) = self.cursor else {
            return Vec::new();
        };
        let pointer = |kind| {
            RawEvent::Pointer(PointerEvent {
                kind,
                position,
                button,
            })
        };

        match state {
            ElementState::Pressed => {
                if !self.pressed.contains(&button) {
                    self.pressed.push(button);
                }
                vec![pointer(PointerKind::Down)]
            }
            ElementState::Released => {
                let was_pressed = self.pressed.contains(&button);
                self.pressed.retain(|b| *b != button);
                if was_pressed {
                    vec![pointer(PointerKind::Up), pointer(PointerKind::Click)]
                } else {
                    vec![pointer(PointerKind::Up)]
                }
            }
        }
    }

    pub fn key_input(code: KeyCode, state: ElementState, repeat: bool) -> RawEvent {
        let kind = match state {
            ElementState::Pressed => KeyKind::Down,
            ElementState::Released => KeyKind::Up,
        };
        RawEvent::Key(KeyEvent { kind, code, repeat })
    }
}

/// Single-choice control, the native counterpart of a `<select>`
#[derive(Debug, Clone, PartialEq)]
pub struct SelectControl {
    id: String,
    options: Vec<String>,
    selected: usize,
}

impl SelectControl {
    pub fn new(id: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            id: id.into(),
            options,
            selected: 0,
        }
    }

    /// Builder: start with option `index` chosen, if it exists
    pub fn with_selected(mut self, index: usize) -> Self {
        if index < self.options.len() {
            self.selected = index;
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn value(&self) -> Option<&str> {
        self.options.get(self.selected).map(String::as_str)
    }

    /// Element addressed by control bindings; it has no on-surface area
    pub fn element(&self) -> Element {
        Element::new(self.id.clone(), Rect::default())
    }

    /// Choose option `index`; a change event is produced only if the
    /// selection actually changed
    pub fn select(&mut self, index: usize) -> Option<ControlEvent> {
        if index == self.selected {
            return None;
        }
        let value = self.options.get(index)?.clone();
        self.selected = index;
        Some(ControlEvent {
            control: self.id.clone(),
            index,
            value,
        })
    }

    /// Digit shortcut: `1` picks the first option, `2` the second...
    pub fn select_by_key(&mut self, code: KeyCode) -> Option<ControlEvent> {
        let index = match code {
            KeyCode::Digit1 => 0,
            KeyCode::Digit2 => 1,
            KeyCode::Digit3 => 2,
            KeyCode::Digit4 => 3,
            KeyCode::Digit5 => 4,
            KeyCode::Digit6 => 5,
            KeyCode::Digit7 => 6,
            KeyCode::Digit8 => 7,
            KeyCode::Digit9 => 8,
            _ => return None,
        };
        self.select(index)
    }
}
