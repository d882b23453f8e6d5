use crate::core::geo::{normalize_angle, shortest_angle_delta, LatLng, Point};
use crate::projection::ProjectionParams;

/// Interpolation trait for values that can be smoothly transitioned
pub trait Interpolatable {
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

/// Various easing functions for animations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EasingFunction {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInOutSine,
}

impl EasingFunction {
    /// Apply the easing function to a normalized time value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseInQuad => t * t,
            EasingFunction::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            EasingFunction::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            EasingFunction::EaseInCubic => t * t * t,
            EasingFunction::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            EasingFunction::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            EasingFunction::EaseInOutSine => -(((std::f64::consts::PI * t).cos() - 1.0) / 2.0),
        }
    }
}

impl Default for EasingFunction {
    fn default() -> Self {
        EasingFunction::EaseInOutCubic
    }
}

/// Main interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two f64 values
    pub fn linear(start: f64, end: f64, t: f64) -> f64 {
        start + (end - start) * t
    }

    /// Interpolation with easing function
    pub fn ease(start: f64, end: f64, t: f64, easing: EasingFunction) -> f64 {
        let eased_t = easing.apply(t);
        Self::linear(start, end, eased_t)
    }

    /// Interpolate two angles in degrees along the shorter arc
    ///
    /// The result is normalized to [-180, 180].
    pub fn angle(start: f64, end: f64, t: f64) -> f64 {
        let from = normalize_angle(start);
        normalize_angle(from + shortest_angle_delta(from, end) * t)
    }

    /// Interpolate a `[lambda, phi, gamma]` rotation axis by axis along the shorter arcs
    pub fn rotation(start: &[f64; 3], end: &[f64; 3], t: f64) -> [f64; 3] {
        [
            Self::angle(start[0], end[0], t),
            Self::angle(start[1], end[1], t),
            Self::angle(start[2], end[2], t),
        ]
    }

    /// Interpolate between two LatLng coordinates, crossing the antimeridian when shorter
    pub fn lat_lng(start: &LatLng, end: &LatLng, t: f64) -> LatLng {
        LatLng::new(
            Self::linear(start.lat, end.lat, t),
            Self::angle(start.lng, end.lng, t),
        )
    }

    /// Cross-fade weights `(outgoing, incoming)` at progress t
    pub fn cross_fade(t: f64) -> (f64, f64) {
        let t = t.clamp(0.0, 1.0);
        (1.0 - t, t)
    }
}

// Implement Interpolatable for basic types
impl Interpolatable for f64 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Interpolation::linear(*self, *other, t)
    }
}

impl Interpolatable for Point {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Point::new(
            Interpolation::linear(self.x, other.x, t),
            Interpolation::linear(self.y, other.y, t),
        )
    }
}

impl Interpolatable for LatLng {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Interpolation::lat_lng(self, other, t)
    }
}

impl Interpolatable for ProjectionParams {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        ProjectionParams {
            scale: self.scale.lerp(&other.scale, t),
            translate: self.translate.lerp(&other.translate, t),
            rotate: Interpolation::rotation(&self.rotate, &other.rotate, t),
        }
    }
}
