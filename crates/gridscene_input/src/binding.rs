//! Raw platform events and named bindings over them
//!
//! An [`EventBinding`] names one input source (a pointer on an element, a
//! key on the document, a form control) and carries the extraction closure
//! that turns the raw event into the application's payload type.

use gridscene_math::{Rect, Vec2};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Pointer event phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Down,
    Up,
    /// Press and release of the same button
    Click,
}

/// Pointer event in client (surface) coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Vec2,
    pub button: MouseButton,
}

/// Keyboard event phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub kind: KeyKind,
    pub code: KeyCode,
    /// Auto-repeat of a held key
    pub repeat: bool,
}

/// A form control changed its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlEvent {
    /// Id of the control element
    pub control: String,
    pub index: usize,
    pub value: String,
}

/// Anything the platform layer can deliver
#[derive(Debug, Clone, PartialEq)]
pub enum RawEvent {
    Pointer(PointerEvent),
    Key(KeyEvent),
    Control(ControlEvent),
}

/// Addressable platform element
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: String,
    /// Client-space bounds
    pub bounds: Rect,
}

impl Element {
    pub fn new(id: impl Into<String>, bounds: Rect) -> Self {
        Self {
            id: id.into(),
            bounds,
        }
    }

    /// `client` relative to the element's top-left corner
    pub fn local_position(&self, client: Vec2) -> Vec2 {
        client - self.bounds.origin
    }
}

/// Pointer extraction: element plus event to payload
pub type PointerExtract<P> = Box<dyn Fn(&Element, &PointerEvent) -> Option<P>>;
/// Keyboard extraction; keyboard bindings always target the document root
pub type KeyExtract<P> = Box<dyn Fn(&KeyEvent) -> Option<P>>;
/// Control extraction: element plus change to payload
pub type ControlExtract<P> = Box<dyn Fn(&Element, &ControlEvent) -> Option<P>>;

/// Named input source plus payload extraction
///
/// An extraction returning `None` means the event is not one the binding
/// reports, and nothing fires.
pub enum EventBinding<P> {
    Pointer {
        name: String,
        kind: PointerKind,
        target: Element,
        extract: PointerExtract<P>,
    },
    Keyboard {
        name: String,
        kind: KeyKind,
        extract: KeyExtract<P>,
    },
    Control {
        name: String,
        target: Element,
        extract: ControlExtract<P>,
    },
}

impl<P> EventBinding<P> {
    pub fn pointer(
        name: impl Into<String>,
        kind: PointerKind,
        target: Element,
        extract: impl Fn(&Element, &PointerEvent) -> Option<P> + 'static,
    ) -> Self {
        EventBinding::Pointer {
            name: name.into(),
            kind,
            target,
            extract: Box::new(extract),
        }
    }

    pub fn keyboard(
        name: impl Into<String>,
        kind: KeyKind,
        extract: impl Fn(&KeyEvent) -> Option<P> + 'static,
    ) -> Self {
        EventBinding::Keyboard {
            name: name.into(),
            kind,
            extract: Box::new(extract),
        }
    }

    pub fn control(
        name: impl Into<String>,
        target: Element,
        extract: impl Fn(&Element, &ControlEvent) -> Option<P> + 'static,
    ) -> Self {
        EventBinding::Control {
            name: name.into(),
            target,
            extract: Box::new(extract),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            EventBinding::Pointer { name, .. }
            | EventBinding::Keyboard { name, .. }
            | EventBinding::Control { name, .. } => name,
        }
    }

    /// Run the extraction if `event` belongs to this binding's source
    pub fn extract(&self, event: &RawEvent) -> Option<P> {
        match (self, event) {
            (
                EventBinding::Pointer {
                    kind,
                    target,
                    extract,
                    ..
                },
                RawEvent::Pointer(pointer),
            ) if pointer.kind == *kind && target.bounds.contains(pointer.position) => {
                extract(target, pointer)
            }
            (EventBinding::Keyboard { kind, extract, .. }, RawEvent::Key(key)) if key.kind == *kind => {
                extract(key)
            }
            (EventBinding::Control { target, extract, .. }, RawEvent::Control(change))
                if change.control == target.id =>
            {
                extract(target, change)
            }
            _ => None,
        }
    }
}

impl<P> std::fmt::Debug for EventBinding<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            EventBinding::Pointer { .. } => "pointer",
            EventBinding::Keyboard { .. } => "keyboard",
            EventBinding::Control { .. } => "control",
        };
        f.debug_struct("EventBinding")
            .field("name", &self.name())
            .field("kind", &kind)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Element {
        Element::new("scene", Rect::new(Vec2::new(10.0, 20.0), Vec2::new(100.0, 100.0)))
    }

    fn click(x: f32, y: f32) -> RawEvent {
        RawEvent::Pointer(PointerEvent {
            kind: PointerKind::Click,
            position: Vec2::new(x, y),
            button: MouseButton::Left,
        })
    }

    fn key(kind: KeyKind, code: KeyCode) -> RawEvent {
        RawEvent::Key(KeyEvent {
            kind,
            code,
            repeat: false,
        })
    }

    #[test]
    fn test_pointer_position_relative_to_element() {
        let binding = EventBinding::pointer("scene-click", PointerKind::Click, scene(), |el, ev| {
            Some(el.local_position(ev.position))
        });
        assert_eq!(binding.extract(&click(15.0, 30.0)), Some(Vec2::new(5.0, 10.0)));
    }

    #[test]
    fn test_pointer_outside_bounds_ignored() {
        let binding = EventBinding::pointer("scene-click", PointerKind::Click, scene(), |_, ev| Some(ev.position));
        assert_eq!(binding.extract(&click(5.0, 30.0)), None);
        assert_eq!(binding.extract(&click(110.0, 30.0)), None);
    }

    #[test]
    fn test_pointer_kind_must_match() {
        let binding = EventBinding::pointer("scene-click", PointerKind::Click, scene(), |_, _| Some(()));
        let down = RawEvent::Pointer(PointerEvent {
            kind: PointerKind::Down,
            position: Vec2::new(50.0, 50.0),
            button: MouseButton::Left,
        });
        assert_eq!(binding.extract(&down), None);
    }

    #[test]
    fn test_keyboard_sees_every_key_of_its_kind() {
        let binding = EventBinding::keyboard("go-to", KeyKind::Up, |k| Some(k.code));
        assert_eq!(binding.extract(&key(KeyKind::Up, KeyCode::KeyZ)), Some(KeyCode::KeyZ));
        assert_eq!(binding.extract(&key(KeyKind::Down, KeyCode::KeyZ)), None);
    }

    #[test]
    fn test_control_matches_by_id() {
        let level = Element::new("level", Rect::from_size(0.0, 0.0));
        let binding = EventBinding::control("level-select", level, |_, c| Some(c.index));
        let ours = RawEvent::Control(ControlEvent {
            control: "level".into(),
            index: 1,
            value: "1".into(),
        });
        let other = RawEvent::Control(ControlEvent {
            control: "speed".into(),
            index: 1,
            value: "1".into(),
        });
        assert_eq!(binding.extract(&ours), Some(1));
        assert_eq!(binding.extract(&other), None);
    }

    #[test]
    fn test_name_and_debug() {
        let binding: EventBinding<()> = EventBinding::keyboard("go-to", KeyKind::Up, |_| None);
        assert_eq!(binding.name(), "go-to");
        assert_eq!(
            format!("{:?}", binding),
            "EventBinding { name: \"go-to\", kind: \"keyboard\" }"
        );
    }
}
