use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// Read-only snapshot of what the map currently shows
///
/// `scale` is relative: 1.0 means the projection's initial fit to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    /// The center of the view in geographical coordinates
    pub center: LatLng,
    /// Scale multiplier relative to the initial fit
    pub scale: f64,
    /// Width of the drawing area in pixels
    pub width: f64,
    /// Height of the drawing area in pixels
    pub height: f64,
}

impl ViewportState {
    pub fn new(center: LatLng, scale: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            scale,
            width,
            height,
        }
    }

    pub fn min_dimension(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Pixel position of the viewport center
    pub fn half_size(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(LatLng::default(), 1.0, 960.0, 600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_creation() {
        let viewport = ViewportState::new(LatLng::new(40.7, -74.0), 2.5, 800.0, 600.0);
        assert_eq!(viewport.scale, 2.5);
        assert_eq!(viewport.min_dimension(), 600.0);
        assert_eq!(viewport.half_size(), (400.0, 300.0));
    }
}
