use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Pointer, wheel and touch input the interaction handler understands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Start of drag operation
    DragStart { position: Point },
    /// Drag in progress, in pixels since the previous drag event
    Drag { delta: Point },
    /// End of drag operation
    DragEnd,
    /// Scroll wheel; positive `delta` zooms in
    Scroll { delta: f64, position: Point },
    /// Explicit pinch factor, e.g. from a trackpad gesture
    Pinch { scale: f64 },
    /// Roll around the view axis, in degrees
    Rotate { angle: f64 },
    /// Touch events (multi-touch)
    Touch {
        event_type: TouchEventType,
        touches: Vec<TouchPoint>,
    },
    /// Viewport/window resize
    Resize { size: Point },
}

/// Types of touch events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchEventType {
    Start,
    Move,
    End,
    Cancel,
}

/// Individual touch point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u64,
    pub position: Point,
}

impl TouchPoint {
    pub fn new(id: u64, position: Point) -> Self {
        Self { id, position }
    }
}

/// Whether an event was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventHandled {
    Handled,
    NotHandled,
}

impl InputEvent {
    /// Gets the primary position associated with this event, if any
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::DragStart { position } => Some(*position),
            InputEvent::Scroll { position, .. } => Some(*position),
            InputEvent::Touch { touches, .. } => touches.first().map(|t| t.position),
            _ => None,
        }
    }

    pub fn is_touch_event(&self) -> bool {
        matches!(self, InputEvent::Touch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_event_position() {
        let scroll = InputEvent::Scroll {
            delta: 1.0,
            position: Point::new(100.0, 200.0),
        };
        assert_eq!(scroll.position(), Some(Point::new(100.0, 200.0)));
        assert_eq!(InputEvent::DragEnd.position(), None);

        let touch = InputEvent::Touch {
            event_type: TouchEventType::Start,
            touches: vec![TouchPoint::new(1, Point::new(5.0, 6.0))],
        };
        assert!(touch.is_touch_event());
        assert_eq!(touch.position(), Some(Point::new(5.0, 6.0)));
    }

    #[test]
    fn test_events_deserialize_from_json() {
        let event: InputEvent =
            serde_json::from_str(r#"{ "Drag": { "delta": { "x": 3.0, "y": -2.0 } } }"#).unwrap();
        assert_eq!(
            event,
            InputEvent::Drag {
                delta: Point::new(3.0, -2.0)
            }
        );
    }
}
