//! The scene's named event bindings
//!
//! - `scene-click`: click on the scene surface, reported relative to it
//! - `go-to`: arrow key released anywhere, reported as a direction
//! - `level-select`: the level control changed

use gridscene_input::{Element, EventBinding, KeyCode, KeyKind, PointerKind};
use gridscene_math::Vec2;

pub const SCENE_CLICK: &str = "scene-click";
pub const GO_TO: &str = "go-to";
pub const LEVEL_SELECT: &str = "level-select";

/// Grid direction a move request points in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::ArrowUp => Some(Direction::Up),
            KeyCode::ArrowDown => Some(Direction::Down),
            KeyCode::ArrowLeft => Some(Direction::Left),
            KeyCode::ArrowRight => Some(Direction::Right),
            _ => None,
        }
    }

    /// Unit `[dx, dy]` offset; y grows downward
    pub fn offset(self) -> [i32; 2] {
        match self {
            Direction::Up => [0, -1],
            Direction::Down => [0, 1],
            Direction::Left => [-1, 0],
            Direction::Right => [1, 0],
        }
    }
}

/// Payload delivered to scene subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum GameInput {
    /// Pixel position inside the scene surface
    Click { position: Vec2 },
    Move(Direction),
    SelectLevel { index: usize },
}

/// Bindings for the scene surface and the level control
pub fn game_bindings(scene: Element, level: Element) -> Vec<EventBinding<GameInput>> {
    vec![
        EventBinding::pointer(SCENE_CLICK, PointerKind::Click, scene, |target, event| {
            Some(GameInput::Click {
                position: target.local_position(event.position),
            })
        }),
        EventBinding::keyboard(GO_TO, KeyKind::Up, |event| {
            Direction::from_key(event.code).map(GameInput::Move)
        }),
        EventBinding::control(LEVEL_SELECT, level, |_, change| {
            Some(GameInput::SelectLevel {
                index: change.index,
            })
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridscene_input::{
        ControlEvent, EventDispatcher, KeyEvent, MouseButton, PointerEvent, RawEvent,
    };
    use gridscene_math::Rect;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn dispatcher() -> (EventDispatcher<GameInput>, Rc<RefCell<Vec<GameInput>>>) {
        let scene = Element::new("scene", Rect::from_size(500.0, 500.0));
        let level = Element::new("level", Rect::default());
        let mut dispatcher = EventDispatcher::new(game_bindings(scene, level)).unwrap();
        let seen: Rc<RefCell<Vec<GameInput>>> = Rc::default();
        for name in [SCENE_CLICK, GO_TO, LEVEL_SELECT] {
            let seen = Rc::clone(&seen);
            dispatcher
                .add_event_listener(name, move |input| seen.borrow_mut().push(input.clone()))
                .unwrap();
        }
        (dispatcher, seen)
    }

    fn key_up(code: KeyCode) -> RawEvent {
        RawEvent::Key(KeyEvent {
            kind: KeyKind::Up,
            code,
            repeat: false,
        })
    }

    #[test]
    fn test_offsets() {
        assert_eq!(Direction::Up.offset(), [0, -1]);
        assert_eq!(Direction::Down.offset(), [0, 1]);
        assert_eq!(Direction::Left.offset(), [-1, 0]);
        assert_eq!(Direction::Right.offset(), [1, 0]);
    }

    #[test]
    fn test_arrow_release_moves() {
        let (mut dispatcher, seen) = dispatcher();
        dispatcher.dispatch(&key_up(KeyCode::ArrowDown));
        dispatcher.dispatch(&key_up(KeyCode::KeyW));
        assert_eq!(*seen.borrow(), [GameInput::Move(Direction::Down)]);
    }

    #[test]
    fn test_arrow_press_ignored() {
        let (mut dispatcher, seen) = dispatcher();
        dispatcher.dispatch(&RawEvent::Key(KeyEvent {
            kind: KeyKind::Down,
            code: KeyCode::ArrowLeft,
            repeat: false,
        }));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_click_inside_scene() {
        let (mut dispatcher, seen) = dispatcher();
        dispatcher.dispatch(&RawEvent::Pointer(PointerEvent {
            kind: PointerKind::Click,
            position: Vec2::new(120.0, 80.0),
            button: MouseButton::Left,
        }));
        assert_eq!(
            *seen.borrow(),
            [GameInput::Click {
                position: Vec2::new(120.0, 80.0)
            }]
        );
    }

    #[test]
    fn test_level_change() {
        let (mut dispatcher, seen) = dispatcher();
        dispatcher.dispatch(&RawEvent::Control(ControlEvent {
            control: "level".into(),
            index: 1,
            value: "level 2".into(),
        }));
        assert_eq!(*seen.borrow(), [GameInput::SelectLevel { index: 1 }]);
    }
}
