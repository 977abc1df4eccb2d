use glam::Vec2;

/// Mouse buttons the controls react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// A pointer event in logical pixels, origin top-left.
///
/// Every host (desktop window, headless driver, tests) produces these; the
/// controls never see raw windowing events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { button: PointerButton, position: Vec2 },
    Up { button: PointerButton },
    Moved { position: Vec2 },
    /// Scroll amount; positive `delta_y` scrolls down (zooms out).
    Wheel { delta_y: f32 },
    /// The pointer left the surface; any drag ends.
    Left,
}

impl PointerEvent {
    pub fn down(button: PointerButton, x: f32, y: f32) -> Self {
        Self::Down {
            button,
            position: Vec2::new(x, y),
        }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::Moved {
            position: Vec2::new(x, y),
        }
    }

    pub fn up(button: PointerButton) -> Self {
        Self::Up { button }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        assert_eq!(
            PointerEvent::down(PointerButton::Primary, 1.0, 2.0),
            PointerEvent::Down {
                button: PointerButton::Primary,
                position: Vec2::new(1.0, 2.0)
            }
        );
        assert!(matches!(
            PointerEvent::moved(3.0, 4.0),
            PointerEvent::Moved { position } if position == Vec2::new(3.0, 4.0)
        ));
        assert_eq!(
            PointerEvent::up(PointerButton::Middle),
            PointerEvent::Up {
                button: PointerButton::Middle
            }
        );
    }
}
