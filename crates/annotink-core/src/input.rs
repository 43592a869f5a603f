//! Pointer and keyboard input delivered by the host.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }
}

/// Buttons held during a pointer move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buttons {
    pub left: bool,
    pub right: bool,
    pub middle: bool,
}

impl Buttons {
    pub const NONE: Buttons = Buttons {
        left: false,
        right: false,
        middle: false,
    };

    pub fn only(button: MouseButton) -> Self {
        let mut buttons = Self::NONE;
        match button {
            MouseButton::Left => buttons.left = true,
            MouseButton::Right => buttons.right = true,
            MouseButton::Middle => buttons.middle = true,
        }
        buttons
    }

    pub fn any(&self) -> bool {
        self.left || self.right || self.middle
    }
}

/// Pointer event in surface coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Up {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Move {
        position: Point,
        buttons: Buttons,
        modifiers: Modifiers,
    },
    /// Delivered after the second `Down` of a double click.
    DoubleClick {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Scroll {
        position: Point,
        delta: Vec2,
        modifiers: Modifiers,
    },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::DoubleClick { position, .. }
            | PointerEvent::Scroll { position, .. } => *position,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            PointerEvent::Down { modifiers, .. }
            | PointerEvent::Up { modifiers, .. }
            | PointerEvent::Move { modifiers, .. }
            | PointerEvent::DoubleClick { modifiers, .. }
            | PointerEvent::Scroll { modifiers, .. } => *modifiers,
        }
    }
}

/// Keys the canvas reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Enter,
    Escape,
    Other(String),
}

/// Keyboard event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(Key),
    Released(Key),
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME: Duration = Duration::from_millis(500);
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Turns a stream of presses into double-click notifications for hosts that do not
/// report them natively.
#[derive(Debug, Clone, Default)]
pub struct DoubleClickDetector {
    last_click: Option<(Instant, Point, MouseButton)>,
}

impl DoubleClickDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press; returns true when it completes a double click.
    pub fn register(&mut self, position: Point, button: MouseButton, now: Instant) -> bool {
        if let Some((time, last_pos, last_button)) = self.last_click {
            let elapsed = now.saturating_duration_since(time);
            if last_button == button
                && elapsed < DOUBLE_CLICK_TIME
                && (position - last_pos).hypot() < DOUBLE_CLICK_DISTANCE
            {
                self.last_click = None;
                return true;
            }
        }
        self.last_click = Some((now, position, button));
        false
    }

    /// Feed a `Down` event and get the matching `DoubleClick` back if one occurred.
    pub fn on_pointer(&mut self, event: &PointerEvent, now: Instant) -> Option<PointerEvent> {
        match *event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } if self.register(position, button, now) => Some(PointerEvent::DoubleClick {
                position,
                button,
                modifiers,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_click_detection() {
        let mut detector = DoubleClickDetector::new();
        let t0 = Instant::now();
        let p = Point::new(10.0, 10.0);
        assert!(!detector.register(p, MouseButton::Left, t0));
        assert!(detector.register(
            Point::new(12.0, 11.0),
            MouseButton::Left,
            t0 + Duration::from_millis(200)
        ));
        // A third click starts a new sequence.
        assert!(!detector.register(p, MouseButton::Left, t0 + Duration::from_millis(300)));
    }

    #[test]
    fn test_double_click_too_slow_or_far() {
        let mut detector = DoubleClickDetector::new();
        let t0 = Instant::now();
        detector.register(Point::ZERO, MouseButton::Left, t0);
        assert!(!detector.register(
            Point::ZERO,
            MouseButton::Left,
            t0 + Duration::from_millis(900)
        ));
        assert!(!detector.register(
            Point::new(50.0, 0.0),
            MouseButton::Left,
            t0 + Duration::from_millis(1000)
        ));
    }

    #[test]
    fn test_on_pointer_emits_double_click() {
        let mut detector = DoubleClickDetector::new();
        let t0 = Instant::now();
        let down = PointerEvent::Down {
            position: Point::new(1.0, 1.0),
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        };
        assert_eq!(detector.on_pointer(&down, t0), None);
        let double = detector.on_pointer(&down, t0 + Duration::from_millis(100));
        assert!(matches!(double, Some(PointerEvent::DoubleClick { .. })));
    }

    #[test]
    fn test_buttons() {
        assert!(Buttons::only(MouseButton::Right).right);
        assert!(!Buttons::NONE.any());
    }
}
