//! Maps interaction events onto animation targets
//!
//! Input only ever touches targets. The engine advances the displayed state
//! on its next frame, so a burst of events between two frames accumulates.

use crate::animation::engine::AnimationEngine;
use crate::animation::scheduler::FrameScheduler;
use crate::core::config::AnimationConfig;
use crate::core::geo::Point;
use crate::input::events::{EventHandled, InputEvent, TouchEventType, TouchPoint};
use fxhash::FxHashMap;

/// Degrees of rotation per dragged pixel at the given relative scale
///
/// Sensitivity falls off as `relative_scale^-pan_scale_alpha` so a drag moves
/// the same on-screen distance whatever the zoom.
pub fn pan_sensitivity(config: &AnimationConfig, relative_scale: f64) -> f64 {
    let relative_scale = if relative_scale > 0.0 && relative_scale.is_finite() {
        relative_scale
    } else {
        1.0
    };
    config.pan_sensitivity * relative_scale.powf(-config.pan_scale_alpha)
}

/// Rotation target after dragging by `delta` pixels
///
/// Horizontal motion spins lambda, vertical motion tilts phi, and phi is
/// kept within [-90, 90] so the globe never flips over a pole.
pub fn drag_rotation(rotation: [f64; 3], delta: Point, sensitivity: f64) -> [f64; 3] {
    [
        rotation[0] + delta.x * sensitivity,
        (rotation[1] - delta.y * sensitivity).clamp(-90.0, 90.0),
        rotation[2],
    ]
}

/// Turns raw input events into engine targets
#[derive(Debug, Default)]
pub struct InteractionHandler {
    dragging: bool,
    touches: FxHashMap<u64, Point>,
    pinch_distance: Option<f64>,
}

impl InteractionHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn handle_event(
        &mut self,
        event: &InputEvent,
        engine: &mut AnimationEngine,
        scheduler: &mut dyn FrameScheduler,
    ) -> EventHandled {
        match event {
            InputEvent::DragStart { .. } => {
                self.dragging = true;
                EventHandled::Handled
            }
            InputEvent::Drag { delta } => {
                if !self.dragging {
                    return EventHandled::NotHandled;
                }
                self.drag(*delta, engine, scheduler)
            }
            InputEvent::DragEnd => {
                self.dragging = false;
                EventHandled::Handled
            }
            InputEvent::Scroll { delta, .. } => {
                if *delta == 0.0 || !delta.is_finite() {
                    return EventHandled::NotHandled;
                }
                let factor = engine.config().wheel_zoom_factor.powf(*delta);
                engine.zoom_by(factor, scheduler);
                EventHandled::Handled
            }
            InputEvent::Pinch { scale } => {
                engine.zoom_by(*scale, scheduler);
                EventHandled::Handled
            }
            InputEvent::Rotate { angle } => {
                if !engine.projection().capabilities().supports_rotation {
                    return EventHandled::NotHandled;
                }
                engine.rotate_by([0.0, 0.0, *angle], scheduler);
                EventHandled::Handled
            }
            InputEvent::Touch {
                event_type,
                touches,
            } => self.touch(*event_type, touches, engine, scheduler),
            InputEvent::Resize { size } => {
                engine.set_viewport_size(size.x, size.y);
                EventHandled::Handled
            }
        }
    }

    fn drag(
        &mut self,
        delta: Point,
        engine: &mut AnimationEngine,
        scheduler: &mut dyn FrameScheduler,
    ) -> EventHandled {
        if !engine.projection().capabilities().supports_rotation {
            return EventHandled::NotHandled;
        }
        let sensitivity = pan_sensitivity(engine.config(), engine.relative_scale());
        let target = drag_rotation(engine.target_rotation(), delta, sensitivity);
        engine.set_target_rotation(target, scheduler);
        EventHandled::Handled
    }

    fn touch(
        &mut self,
        event_type: TouchEventType,
        touches: &[TouchPoint],
        engine: &mut AnimationEngine,
        scheduler: &mut dyn FrameScheduler,
    ) -> EventHandled {
        match event_type {
            TouchEventType::Start => {
                for touch in touches {
                    self.touches.insert(touch.id, touch.position);
                }
                self.pinch_distance = self.current_pinch_distance();
                EventHandled::Handled
            }
            TouchEventType::Move => {
                let mut single_delta = None;
                for touch in touches {
                    if let Some(previous) = self.touches.insert(touch.id, touch.position) {
                        single_delta = Some(touch.position.subtract(&previous));
                    }
                }

                if self.touches.len() >= 2 {
                    let distance = self.current_pinch_distance();
                    let handled = match (self.pinch_distance, distance) {
                        (Some(previous), Some(current)) if previous > 0.0 => {
                            engine.zoom_by(current / previous, scheduler);
                            EventHandled::Handled
                        }
                        _ => EventHandled::NotHandled,
                    };
                    self.pinch_distance = distance;
                    handled
                } else if let Some(delta) = single_delta {
                    self.drag(delta, engine, scheduler)
                } else {
                    EventHandled::NotHandled
                }
            }
            TouchEventType::End | TouchEventType::Cancel => {
                for touch in touches {
                    self.touches.remove(&touch.id);
                }
                self.pinch_distance = self.current_pinch_distance();
                EventHandled::Handled
            }
        }
    }

    fn current_pinch_distance(&self) -> Option<f64> {
        if self.touches.len() < 2 {
            return None;
        }
        let mut ids: Vec<_> = self.touches.keys().copied().collect();
        ids.sort_unstable();
        let a = self.touches.get(&ids[0])?;
        let b = self.touches.get(&ids[1])?;
        Some(a.distance_to(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::scheduler::ManualScheduler;
    use crate::projection::{Projection, ProjectionKind};

    fn engine() -> AnimationEngine {
        let mut projection = Projection::new(ProjectionKind::Orthographic);
        projection.set_scale(250.0);
        AnimationEngine::new(projection, 500.0, 500.0, AnimationConfig::default())
    }

    #[test]
    fn test_pan_sensitivity_falls_with_zoom() {
        let config = AnimationConfig::default();
        assert_eq!(pan_sensitivity(&config, 1.0), 0.25);
        assert_eq!(pan_sensitivity(&config, 2.0), 0.125);

        let flat = AnimationConfig {
            pan_scale_alpha: 0.0,
            ..AnimationConfig::default()
        };
        assert_eq!(pan_sensitivity(&flat, 4.0), 0.25);
    }

    #[test]
    fn test_drag_rotation_clamps_latitude() {
        let rotation = drag_rotation([0.0, 80.0, 0.0], Point::new(4.0, -100.0), 0.25);
        assert_eq!(rotation, [1.0, 90.0, 0.0]);
    }

    #[test]
    fn test_drag_requires_drag_start() {
        let mut handler = InteractionHandler::new();
        let mut engine = engine();
        let mut scheduler = ManualScheduler::new();
        let drag = InputEvent::Drag {
            delta: Point::new(40.0, 0.0),
        };

        assert_eq!(
            handler.handle_event(&drag, &mut engine, &mut scheduler),
            EventHandled::NotHandled
        );
        handler.handle_event(
            &InputEvent::DragStart {
                position: Point::new(0.0, 0.0),
            },
            &mut engine,
            &mut scheduler,
        );
        handler.handle_event(&drag, &mut engine, &mut scheduler);
        handler.handle_event(&drag, &mut engine, &mut scheduler);
        assert_eq!(engine.target_rotation(), [20.0, 0.0, 0.0]);
        assert_eq!(scheduler.pending_count(), 1);
    }

    #[test]
    fn test_scroll_zooms_within_extent() {
        let mut handler = InteractionHandler::new();
        let mut engine = engine();
        let mut scheduler = ManualScheduler::new();
        for _ in 0..200 {
            handler.handle_event(
                &InputEvent::Scroll {
                    delta: 1.0,
                    position: Point::new(250.0, 250.0),
                },
                &mut engine,
                &mut scheduler,
            );
        }
        assert_eq!(engine.target_scale(), 2000.0);
    }

    #[test]
    fn test_two_finger_pinch() {
        let mut handler = InteractionHandler::new();
        let mut engine = engine();
        let mut scheduler = ManualScheduler::new();
        handler.handle_event(
            &InputEvent::Touch {
                event_type: TouchEventType::Start,
                touches: vec![
                    TouchPoint::new(1, Point::new(100.0, 100.0)),
                    TouchPoint::new(2, Point::new(200.0, 100.0)),
                ],
            },
            &mut engine,
            &mut scheduler,
        );
        let handled = handler.handle_event(
            &InputEvent::Touch {
                event_type: TouchEventType::Move,
                touches: vec![TouchPoint::new(2, Point::new(300.0, 100.0))],
            },
            &mut engine,
            &mut scheduler,
        );
        assert_eq!(handled, EventHandled::Handled);
        assert!((engine.target_scale() - 500.0).abs() < 1e-9);
    }
}
