use crate::core::geo::{LatLng, Point};
use serde::{Deserialize, Serialize};

/// Mutable parameters of a projection instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionState {
    /// Pixels per unit-sphere radian, always positive
    pub scale: f64,
    /// Pixel position of the projected center
    pub translate: Point,
    /// `[lambda, phi, gamma]` rotation in degrees
    pub rotate: [f64; 3],
    /// Small-circle clip radius in degrees; `None` means unclipped
    pub clip_angle: Option<f64>,
    /// Geographic point placed at `translate` before rotation
    pub center: LatLng,
}

impl ProjectionState {
    pub fn params(&self) -> ProjectionParams {
        ProjectionParams {
            scale: self.scale,
            translate: self.translate,
            rotate: self.rotate,
        }
    }

    /// Copy the animatable parameters into this state
    pub fn apply_params(&mut self, params: &ProjectionParams) {
        if params.scale > 0.0 && params.scale.is_finite() {
            self.scale = params.scale;
        }
        self.translate = params.translate;
        self.rotate = params.rotate;
    }
}

impl Default for ProjectionState {
    fn default() -> Self {
        Self {
            scale: 150.0,
            translate: Point::new(480.0, 250.0),
            rotate: [0.0, 0.0, 0.0],
            clip_angle: None,
            center: LatLng::default(),
        }
    }
}

/// The animatable subset of [`ProjectionState`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParams {
    pub scale: f64,
    pub translate: Point,
    pub rotate: [f64; 3],
}

impl ProjectionParams {
    pub fn new(scale: f64, translate: Point, rotate: [f64; 3]) -> Self {
        Self {
            scale,
            translate,
            rotate,
        }
    }
}

impl Default for ProjectionParams {
    fn default() -> Self {
        ProjectionState::default().params()
    }
}
