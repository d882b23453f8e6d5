//! Geographic-to-planar projections
//!
//! A [`Projection`] combines a raw spherical formula with a three-axis
//! rotation, an optional small-circle clip, and a scale/translate transform
//! into pixel space. Which parameters a projection honors is fixed at
//! construction through its [`Capabilities`].

pub mod albers_usa;
pub mod raw;
pub mod rotation;
pub mod state;

use crate::core::geo::{normalize_angle, LatLng, Point};
use crate::ProjletError;
use albers_usa::AlbersUsa;
use raw::{ConicEqualArea, RawProjection};
use rotation::Rotation;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use state::{ProjectionParams, ProjectionState};

/// Named projection families known to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectionKind {
    Equirectangular,
    Mercator,
    Orthographic,
    NaturalEarth,
    AzimuthalEqualArea,
    ConicEqualArea,
    Albers,
    AlbersUsa,
    Stereographic,
}

impl ProjectionKind {
    pub const ALL: [ProjectionKind; 9] = [
        ProjectionKind::Equirectangular,
        ProjectionKind::Mercator,
        ProjectionKind::Orthographic,
        ProjectionKind::NaturalEarth,
        ProjectionKind::AzimuthalEqualArea,
        ProjectionKind::ConicEqualArea,
        ProjectionKind::Albers,
        ProjectionKind::AlbersUsa,
        ProjectionKind::Stereographic,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ProjectionKind::Equirectangular => "equirectangular",
            ProjectionKind::Mercator => "mercator",
            ProjectionKind::Orthographic => "orthographic",
            ProjectionKind::NaturalEarth => "natural-earth",
            ProjectionKind::AzimuthalEqualArea => "azimuthal-equal-area",
            ProjectionKind::ConicEqualArea => "conic-equal-area",
            ProjectionKind::Albers => "albers",
            ProjectionKind::AlbersUsa => "albers-usa",
            ProjectionKind::Stereographic => "stereographic",
        }
    }

    /// Clip radius every instance of this family starts with
    pub fn default_clip_angle(&self) -> Option<f64> {
        match self {
            ProjectionKind::Orthographic => Some(90.0),
            ProjectionKind::AzimuthalEqualArea => Some(180.0 - 1e-3),
            ProjectionKind::Stereographic => Some(142.0),
            _ => None,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        match self {
            ProjectionKind::AlbersUsa => Capabilities {
                supports_rotation: false,
                supports_clip_angle: false,
                supports_center: false,
                supports_inverse: true,
            },
            _ => Capabilities::full(),
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProjectionKind {
    type Err = ProjletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectionKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ProjletError::UnknownProjection(s.to_string()))
    }
}

/// Optional features of a projection, checked once instead of per call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub supports_rotation: bool,
    pub supports_clip_angle: bool,
    pub supports_center: bool,
    pub supports_inverse: bool,
}

impl Capabilities {
    pub fn full() -> Self {
        Self {
            supports_rotation: true,
            supports_clip_angle: true,
            supports_center: true,
            supports_inverse: true,
        }
    }
}

/// A configured projection from (lng, lat) degrees to pixel coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    kind: ProjectionKind,
    raw: RawProjection,
    state: ProjectionState,
    capabilities: Capabilities,
    rotation: Rotation,
    center_offset: (f64, f64),
    clip_cos: Option<f64>,
    composite: Option<Box<AlbersUsa>>,
}

impl Projection {
    /// Create a projection of the given family with its default parameters
    pub fn new(kind: ProjectionKind) -> Self {
        let mut state = ProjectionState {
            clip_angle: kind.default_clip_angle(),
            ..ProjectionState::default()
        };

        let raw = match kind {
            ProjectionKind::Equirectangular => RawProjection::Equirectangular,
            ProjectionKind::Mercator => RawProjection::Mercator,
            ProjectionKind::Orthographic => RawProjection::Orthographic,
            ProjectionKind::NaturalEarth => RawProjection::NaturalEarth,
            ProjectionKind::AzimuthalEqualArea => RawProjection::AzimuthalEqualArea,
            ProjectionKind::Stereographic => RawProjection::Stereographic,
            ProjectionKind::ConicEqualArea => {
                RawProjection::ConicEqualArea(ConicEqualArea::new(20.0, 50.0))
            }
            ProjectionKind::Albers | ProjectionKind::AlbersUsa => {
                state.rotate = [96.0, 0.0, 0.0];
                state.center = LatLng::new(38.7, -0.6);
                RawProjection::ConicEqualArea(ConicEqualArea::new(29.5, 45.5))
            }
        };

        if kind == ProjectionKind::AlbersUsa {
            state.scale = 1070.0;
        }

        Self::from_parts(kind, raw, state)
    }

    /// Equal-area conic with explicit standard parallels, rotation and center
    pub fn conic_equal_area(parallels: (f64, f64), rotate: [f64; 3], center: LatLng) -> Self {
        let state = ProjectionState {
            rotate,
            center,
            ..ProjectionState::default()
        };
        Self::from_parts(
            ProjectionKind::ConicEqualArea,
            RawProjection::ConicEqualArea(ConicEqualArea::new(parallels.0, parallels.1)),
            state,
        )
    }

    fn from_parts(kind: ProjectionKind, raw: RawProjection, state: ProjectionState) -> Self {
        let mut projection = Self {
            kind,
            raw,
            state,
            capabilities: kind.capabilities(),
            rotation: Rotation::identity(),
            center_offset: (0.0, 0.0),
            clip_cos: None,
            composite: None,
        };
        projection.sync();
        projection
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    pub fn state(&self) -> &ProjectionState {
        &self.state
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn scale(&self) -> f64 {
        self.state.scale
    }

    pub fn translate(&self) -> Point {
        self.state.translate
    }

    pub fn rotate(&self) -> [f64; 3] {
        self.state.rotate
    }

    /// Project a geographic coordinate; `None` outside the projection's domain
    pub fn forward(&self, lat_lng: LatLng) -> Option<Point> {
        if let Some(composite) = &self.composite {
            return composite.forward(lat_lng);
        }
        if !lat_lng.is_finite() {
            return None;
        }

        let (lambda, phi) = self
            .rotation
            .forward(lat_lng.lng.to_radians(), lat_lng.lat.to_radians());
        if !self.is_visible(lambda, phi) {
            return None;
        }

        let (x, y) = self.raw.forward(lambda, phi)?;
        let point = self.to_screen(x, y);
        point.is_finite().then_some(point)
    }

    /// Unproject a pixel; `None` where the pixel has no geographic meaning
    pub fn invert(&self, point: Point) -> Option<LatLng> {
        if !self.capabilities.supports_inverse {
            return None;
        }
        if let Some(composite) = &self.composite {
            return composite.invert(point);
        }

        let k = self.state.scale;
        let x = (point.x - self.state.translate.x) / k + self.center_offset.0;
        let y = self.center_offset.1 - (point.y - self.state.translate.y) / k;

        let (lambda, phi) = self.raw.invert(x, y)?;
        if !self.is_visible(lambda, phi) {
            return None;
        }

        let (lambda, phi) = self.rotation.invert(lambda, phi);
        let lat_lng = LatLng::new(phi.to_degrees(), lambda.to_degrees());
        lat_lng.is_finite().then_some(lat_lng)
    }

    /// Geographic point currently shown at the rotation origin
    pub fn rotation_center(&self) -> LatLng {
        let (lambda, phi) = self.rotation.invert(0.0, 0.0);
        LatLng::new(phi.to_degrees(), lambda.to_degrees())
    }

    /// Geographic point at the middle of the view
    ///
    /// Combines the longitude rotation with the latitude tilt and the
    /// latitude of the center offset.
    pub fn view_center(&self) -> LatLng {
        LatLng::new(
            (self.state.center.lat - self.state.rotate[1]).clamp(-90.0, 90.0),
            normalize_angle(self.state.center.lng - self.state.rotate[0]),
        )
    }

    /// Set the scale; non-positive or non-finite values are ignored
    pub fn set_scale(&mut self, scale: f64) {
        if scale > 0.0 && scale.is_finite() {
            self.state.scale = scale;
            self.sync();
        } else {
            log::warn!("ignoring invalid scale {} for {}", scale, self.kind);
        }
    }

    pub fn set_translate(&mut self, translate: Point) {
        self.state.translate = translate;
        self.sync();
    }

    /// Returns false when the projection cannot rotate
    pub fn set_rotation(&mut self, rotate: [f64; 3]) -> bool {
        if !self.capabilities.supports_rotation {
            return false;
        }
        self.state.rotate = rotate;
        self.sync();
        true
    }

    /// Returns false when the projection cannot clip
    pub fn set_clip_angle(&mut self, clip_angle: Option<f64>) -> bool {
        if !self.capabilities.supports_clip_angle {
            return false;
        }
        self.state.clip_angle = clip_angle.filter(|angle| *angle > 0.0);
        self.sync();
        true
    }

    /// Returns false when the projection has no movable center
    pub fn set_center(&mut self, center: LatLng) -> bool {
        if !self.capabilities.supports_center {
            return false;
        }
        self.state.center = center;
        self.sync();
        true
    }

    /// Apply scale, translate and, when supported, rotation
    pub fn apply_params(&mut self, params: &ProjectionParams) {
        if params.scale > 0.0 && params.scale.is_finite() {
            self.state.scale = params.scale;
        }
        self.state.translate = params.translate;
        if self.capabilities.supports_rotation {
            self.state.rotate = params.rotate;
        }
        self.sync();
    }

    /// Apply every parameter this projection supports
    pub fn apply_state(&mut self, state: &ProjectionState) {
        self.apply_params(&state.params());
        if self.capabilities.supports_clip_angle {
            self.state.clip_angle = state.clip_angle;
        }
        if self.capabilities.supports_center {
            self.state.center = state.center;
        }
        self.sync();
    }

    fn is_visible(&self, lambda: f64, phi: f64) -> bool {
        match self.clip_cos {
            Some(cos_radius) => lambda.cos() * phi.cos() >= cos_radius - 1e-12,
            None => true,
        }
    }

    fn to_screen(&self, x: f64, y: f64) -> Point {
        let k = self.state.scale;
        Point::new(
            self.state.translate.x + k * (x - self.center_offset.0),
            self.state.translate.y - k * (y - self.center_offset.1),
        )
    }

    fn sync(&mut self) {
        self.rotation = Rotation::new(self.state.rotate);
        self.center_offset = self
            .raw
            .forward(
                self.state.center.lng.to_radians(),
                self.state.center.lat.to_radians(),
            )
            .unwrap_or((0.0, 0.0));
        self.clip_cos = self.state.clip_angle.map(|angle| angle.to_radians().cos());
        if self.kind == ProjectionKind::AlbersUsa {
            self.composite = Some(Box::new(AlbersUsa::new(
                self.state.scale,
                self.state.translate,
            )));
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(ProjectionKind::Equirectangular)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in ProjectionKind::ALL {
            assert_eq!(kind.name().parse::<ProjectionKind>().unwrap(), kind);
        }
        assert!(matches!(
            "robinson".parse::<ProjectionKind>(),
            Err(ProjletError::UnknownProjection(_))
        ));
    }

    #[test]
    fn test_equirectangular_center_maps_to_translate() {
        let projection = Projection::new(ProjectionKind::Equirectangular);
        let p = projection.forward(LatLng::new(0.0, 0.0)).unwrap();
        assert_abs_diff_eq!(p.x, 480.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, 250.0, epsilon = 1e-9);
    }

    #[test]
    fn test_forward_invert_round_trip_with_rotation() {
        for kind in ProjectionKind::ALL {
            let mut projection = Projection::new(kind);
            projection.set_rotation([-10.0, -20.0, 0.0]);
            let target = if kind == ProjectionKind::AlbersUsa {
                LatLng::new(39.0, -98.0)
            } else {
                LatLng::new(25.0, 15.0)
            };
            let pixel = projection.forward(target).unwrap();
            let back = projection.invert(pixel).unwrap();
            assert_abs_diff_eq!(back.lat, target.lat, epsilon = 1e-4);
            assert_abs_diff_eq!(back.lng, target.lng, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_orthographic_clips_back_hemisphere() {
        let projection = Projection::new(ProjectionKind::Orthographic);
        assert!(projection.forward(LatLng::new(0.0, 120.0)).is_none());
        assert!(projection.forward(LatLng::new(0.0, 60.0)).is_some());
        // Pixel well outside the globe disc
        assert!(projection.invert(Point::new(480.0 + 400.0, 250.0)).is_none());
    }

    #[test]
    fn test_capabilities_gate_setters() {
        let mut usa = Projection::new(ProjectionKind::AlbersUsa);
        assert!(!usa.set_rotation([10.0, 0.0, 0.0]));
        assert!(!usa.set_clip_angle(Some(90.0)));
        assert!(!usa.set_center(LatLng::new(10.0, 10.0)));

        let mut mercator = Projection::new(ProjectionKind::Mercator);
        assert!(mercator.set_rotation([10.0, 0.0, 0.0]));
        assert_eq!(mercator.rotate(), [10.0, 0.0, 0.0]);
    }

    #[test]
    fn test_invalid_scale_ignored() {
        let mut projection = Projection::new(ProjectionKind::Mercator);
        projection.set_scale(-5.0);
        assert_eq!(projection.scale(), 150.0);
        projection.set_scale(300.0);
        assert_eq!(projection.scale(), 300.0);
    }

    #[test]
    fn test_rotation_center() {
        let mut projection = Projection::new(ProjectionKind::Orthographic);
        projection.set_rotation([-40.0, -30.0, 0.0]);
        let center = projection.rotation_center();
        assert_abs_diff_eq!(center.lng, 40.0, epsilon = 1e-9);
        assert_abs_diff_eq!(center.lat, 30.0, epsilon = 1e-9);

        let view = projection.view_center();
        assert_abs_diff_eq!(view.lng, 40.0, epsilon = 1e-9);
        assert_abs_diff_eq!(view.lat, 30.0, epsilon = 1e-9);
    }
}
