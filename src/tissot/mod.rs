//! Tissot's indicatrix
//!
//! The forward projection is differentiated numerically on a lon/lat grid.
//! At each sample the Gram matrix of the local Jacobian gives the squared
//! axis lengths of the ellipse a small ground circle turns into on screen.
//! Samples whose projection or local metric is undefined are left out.

use crate::core::config::TissotConfig;
use crate::core::constants::EARTH_RADIUS_MEAN;
use crate::core::geo::{LatLng, Point};
use crate::projection::{Projection, ProjectionKind, ProjectionState};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Below this the off-diagonal term counts as zero
const ORIENTATION_EPSILON: f64 = 1e-12;
/// Forward difference this many times the backward one means a cut was crossed
const CUT_JUMP_RATIO: f64 = 1e3;

/// Distortion ellipse at one grid point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TissotSample {
    pub longitude: f64,
    pub latitude: f64,
    /// Semi-major axis in pixels
    pub major_axis: f64,
    /// Semi-minor axis in pixels
    pub minor_axis: f64,
    /// Orientation of the major axis in radians
    pub rotation: f64,
    /// Projected position of the sample
    pub center: Point,
    /// Pixels per degree of longitude and latitude, `[[dx/dλ, dx/dφ], [dy/dλ, dy/dφ]]`
    pub jacobian: [[f64; 2]; 2],
    /// Ground radius of the indicatrix circle in degrees
    pub angular_radius: f64,
}

impl TissotSample {
    /// 0 for a circle, approaching 1 as the ellipse flattens
    pub fn flattening(&self) -> f64 {
        1.0 - self.minor_axis / self.major_axis
    }

    /// Screen area of the ellipse relative to a circle of the same angular radius
    ///
    /// Measured per square degree of longitude and latitude, so an equal-area
    /// projection gives a value proportional to `cos(lat)`.
    pub fn area_ratio(&self) -> f64 {
        self.major_axis * self.minor_axis / (self.angular_radius * self.angular_radius)
    }
}

/// Ground distance in meters as an angle in degrees on the mean sphere
pub fn angular_radius_deg(radius_meters: f64) -> f64 {
    (radius_meters / EARTH_RADIUS_MEAN).to_degrees()
}

/// Compute the indicatrix on a regular grid with the default epsilon
pub fn compute_distortion_grid(
    projection: &Projection,
    grid_spacing_deg: f64,
    radius_meters: f64,
) -> Vec<TissotSample> {
    compute_distortion_grid_with(
        projection,
        &TissotConfig {
            grid_spacing_deg,
            radius_meters,
            ..TissotConfig::default()
        },
    )
}

/// Longitudes run over [-180, 180], latitudes over [-90 + spacing, 90 - spacing]
pub fn compute_distortion_grid_with(
    projection: &Projection,
    config: &TissotConfig,
) -> Vec<TissotSample> {
    let spacing = config.grid_spacing_deg;
    if !(spacing > 0.0 && spacing.is_finite()) {
        return Vec::new();
    }
    let angular = angular_radius_deg(config.radius_meters);

    let lon_steps = (360.0 / spacing).floor() as usize;
    let lat_steps = (180.0 / spacing).ceil() as usize;
    let mut samples = Vec::new();
    for j in 1..lat_steps {
        let lat = -90.0 + j as f64 * spacing;
        if lat >= 90.0 {
            break;
        }
        for i in 0..=lon_steps {
            let lon = -180.0 + i as f64 * spacing;
            if let Some(sample) =
                sample_at(projection, LatLng::new(lat, lon), config.epsilon_deg, angular)
            {
                samples.push(sample);
            }
        }
    }
    samples
}

/// Indicatrix at a single point; `None` where it is undefined
pub fn sample_at(
    projection: &Projection,
    lat_lng: LatLng,
    epsilon_deg: f64,
    angular_radius: f64,
) -> Option<TissotSample> {
    let center = projection.forward(lat_lng)?;
    let east = projection.forward(LatLng::new(lat_lng.lat, lat_lng.lng + epsilon_deg))?;
    let north = projection.forward(LatLng::new(lat_lng.lat + epsilon_deg, lat_lng.lng))?;
    let west = projection.forward(LatLng::new(lat_lng.lat, lat_lng.lng - epsilon_deg));
    let south = projection.forward(LatLng::new(lat_lng.lat - epsilon_deg, lat_lng.lng));

    let d_lambda = one_sided_difference(center, east, west, epsilon_deg);
    let d_phi = one_sided_difference(center, north, south, epsilon_deg);
    let jacobian = [[d_lambda.x, d_phi.x], [d_lambda.y, d_phi.y]];

    let ellipse = ellipse_from_jacobian(jacobian)?;
    Some(TissotSample {
        longitude: lat_lng.lng,
        latitude: lat_lng.lat,
        major_axis: ellipse.0 * angular_radius,
        minor_axis: ellipse.1 * angular_radius,
        rotation: ellipse.2,
        center,
        jacobian,
        angular_radius,
    })
}

/// Forward difference, or the backward one when the forward step jumps a cut
///
/// A forward step across the antimeridian of a rotated projection or an
/// interruption lands on the far side of the map. That shows up as a forward
/// difference many times longer than the backward one.
fn one_sided_difference(center: Point, ahead: Point, behind: Option<Point>, step: f64) -> Point {
    let forward = ahead.subtract(&center).multiply(1.0 / step);
    if let Some(behind) = behind {
        let backward = center.subtract(&behind).multiply(1.0 / step);
        if forward.x.hypot(forward.y) > CUT_JUMP_RATIO * backward.x.hypot(backward.y) {
            return backward;
        }
    }
    forward
}

/// Axis scale factors and orientation from a 2x2 Jacobian
///
/// Returns `(sqrt(λ1), sqrt(λ2), angle)` for the eigenvalues of the Gram
/// matrix, or `None` when the local metric is degenerate.
pub fn ellipse_from_jacobian(jacobian: [[f64; 2]; 2]) -> Option<(f64, f64, f64)> {
    if !jacobian.iter().flatten().all(|value| value.is_finite()) {
        return None;
    }
    let [[dx_dlambda, dx_dphi], [dy_dlambda, dy_dphi]] = jacobian;
    let a = dx_dlambda * dx_dlambda + dy_dlambda * dy_dlambda;
    let c = dx_dphi * dx_dphi + dy_dphi * dy_dphi;
    let b = dx_dlambda * dx_dphi + dy_dlambda * dy_dphi;

    let determinant = a * c - b * b;
    let trace = a + c;
    if !(determinant > 0.0 && trace >= 0.0) {
        return None;
    }

    // Equal to trace²/4 - det, but never negative under rounding
    let half_difference = (a - c) / 2.0;
    let root = half_difference.hypot(b);
    let lambda_1 = trace / 2.0 + root;
    let lambda_2 = trace / 2.0 - root;
    if !(lambda_2 > 0.0) {
        return None;
    }

    let angle = if b.abs() > ORIENTATION_EPSILON * trace {
        b.atan2(half_difference) / 2.0
    } else if a >= c {
        0.0
    } else {
        FRAC_PI_2
    };

    Some((lambda_1.sqrt(), lambda_2.sqrt(), angle))
}

/// Closed ring tracing the image of a lon/lat circle of the sample's angular radius
///
/// Uses the local Jacobian, so the outline is exactly the ellipse described
/// by the sample's axes and lies in screen orientation.
pub fn ellipse_outline(sample: &TissotSample, segments: usize) -> Vec<Point> {
    let segments = segments.max(3);
    let [[j00, j01], [j10, j11]] = sample.jacobian;
    let r = sample.angular_radius;
    let mut ring: Vec<Point> = (0..segments)
        .map(|i| {
            let t = i as f64 / segments as f64 * std::f64::consts::TAU;
            let (east, north) = (t.cos() * r, t.sin() * r);
            Point::new(
                sample.center.x + j00 * east + j01 * north,
                sample.center.y + j10 * east + j11 * north,
            )
        })
        .collect();
    if let Some(first) = ring.first().copied() {
        ring.push(first);
    }
    ring
}

/// Indicatrix overlay that recomputes whenever the projection changes
#[derive(Debug, Clone, Default)]
pub struct TissotOverlay {
    config: TissotConfig,
    computed_for: Option<(ProjectionKind, ProjectionState)>,
    samples: Vec<TissotSample>,
    recomputations: u64,
}

impl TissotOverlay {
    pub fn new(config: TissotConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &TissotConfig {
        &self.config
    }

    /// Changing the grid or radius invalidates the current samples
    pub fn set_config(&mut self, config: TissotConfig) {
        if config != self.config {
            self.config = config;
            self.computed_for = None;
        }
    }

    pub fn samples(&self) -> &[TissotSample] {
        &self.samples
    }

    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Recompute if any projection parameter differs; returns true when it did
    pub fn update(&mut self, projection: &Projection) -> bool {
        let key = (projection.kind(), *projection.state());
        if self.computed_for.as_ref() == Some(&key) {
            return false;
        }
        self.samples = compute_distortion_grid_with(projection, &self.config);
        self.computed_for = Some(key);
        self.recomputations += 1;
        log::debug!(
            "tissot overlay recomputed for {}: {} samples",
            projection.kind(),
            self.samples.len()
        );
        true
    }

    /// One closed ring per sample, ready for the drawing surface
    pub fn outlines(&self) -> Vec<Vec<Point>> {
        self.samples
            .iter()
            .map(|sample| ellipse_outline(sample, self.config.outline_segments))
            .collect()
    }
}
