//! Coarse distortion hints per projection family
//!
//! These are rules of thumb for the UI, not measurements; see
//! [`crate::tissot`] for the real thing.

use crate::projection::ProjectionKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistortionInfo {
    /// Area scale factor, 1 for no area distortion
    pub area: f64,
    /// Maximum angular deformation in degrees
    pub angular: f64,
}

/// Approximate `(area, angular)` distortion of `kind` at `latitude`
pub fn get_distortion_info(kind: ProjectionKind, latitude: f64) -> DistortionInfo {
    // Stay off the poles where sec(lat) blows up
    let abs_lat = latitude.abs().min(89.0);
    let cos_lat = abs_lat.to_radians().cos();
    let polar = abs_lat / 90.0;

    match kind {
        ProjectionKind::Mercator => DistortionInfo {
            area: 1.0 / (cos_lat * cos_lat),
            angular: 0.0,
        },
        ProjectionKind::Stereographic => {
            // Exact along the polar aspect: k = 2 / (1 + sin(lat))
            let k = 2.0 / (1.0 + abs_lat.to_radians().sin());
            DistortionInfo {
                area: k * k,
                angular: 0.0,
            }
        }
        ProjectionKind::AzimuthalEqualArea
        | ProjectionKind::ConicEqualArea
        | ProjectionKind::Albers
        | ProjectionKind::AlbersUsa => DistortionInfo {
            area: 1.0,
            angular: 40.0 * polar * polar,
        },
        ProjectionKind::Equirectangular => DistortionInfo {
            area: 1.0 / cos_lat,
            angular: (1.0 / cos_lat - 1.0).atan().to_degrees(),
        },
        ProjectionKind::NaturalEarth => DistortionInfo {
            area: 1.0 + 0.5 * polar * polar,
            angular: 25.0 * polar,
        },
        ProjectionKind::Orthographic => DistortionInfo {
            area: cos_lat,
            angular: 30.0 * polar * polar,
        },
    }
}
