//! Building projections fitted to a viewport and carrying views across families

use crate::core::geo::{LatLng, Point};
use crate::projection::{Projection, ProjectionKind};
use crate::selector::catalog;
use std::f64::consts::{PI, TAU};

/// Width of Natural Earth at the equator on the unit sphere
const NATURAL_EARTH_WIDTH: f64 = 2.0 * PI * 0.8707;
/// Share of the smaller viewport side filled by a disc-shaped projection
const DISC_FILL: f64 = 0.9;
/// Reference fit of the US composite: scale 1070 at 960 pixels wide
const ALBERS_USA_SCALE_PER_PIXEL: f64 = 1070.0 / 960.0;

/// Scale at which `kind` fits a `width x height` viewport
pub fn base_scale(kind: ProjectionKind, width: f64, height: f64) -> f64 {
    let min_side = width.min(height);
    match kind {
        ProjectionKind::Equirectangular | ProjectionKind::Mercator => width / TAU,
        ProjectionKind::NaturalEarth => width / NATURAL_EARTH_WIDTH,
        ProjectionKind::Orthographic => DISC_FILL * min_side / 2.0,
        // Hemisphere radius is 2 on the unit sphere for both
        ProjectionKind::AzimuthalEqualArea | ProjectionKind::Stereographic => {
            DISC_FILL * min_side / 4.0
        }
        ProjectionKind::ConicEqualArea => width / 5.0,
        ProjectionKind::Albers => width * 1.5 / 2.0,
        ProjectionKind::AlbersUsa => width * ALBERS_USA_SCALE_PER_PIXEL,
    }
}

/// Azimuthal families tilt toward the center; the rest keep north up
fn tilts_to_center(kind: ProjectionKind) -> bool {
    matches!(
        kind,
        ProjectionKind::Orthographic
            | ProjectionKind::AzimuthalEqualArea
            | ProjectionKind::Stereographic
    )
}

/// New projection of `kind` fitted to the viewport and optionally centered
pub fn create_projection(
    kind: ProjectionKind,
    width: f64,
    height: f64,
    center: Option<LatLng>,
) -> Projection {
    let mut projection = Projection::new(kind);
    projection.set_scale(base_scale(kind, width, height));
    projection.set_translate(Point::new(width / 2.0, height / 2.0));

    if let Some(clip_angle) = catalog::config_for(kind).and_then(|config| config.clip_angle) {
        projection.set_clip_angle(Some(clip_angle));
    }

    if let Some(center) = center {
        let applied = if tilts_to_center(kind) {
            projection.set_rotation([-center.lng, -center.lat, 0.0])
        } else {
            projection.set_rotation([-center.lng, 0.0, 0.0])
                && projection.set_center(LatLng::new(center.lat, 0.0))
        };
        if !applied {
            log::debug!("{} keeps its fixed center", kind);
        }
    }
    projection
}

/// Scale of `projection` as a multiple of its family's fitted scale
pub fn relative_scale(projection: &Projection, width: f64, height: f64) -> f64 {
    let base = base_scale(projection.kind(), width, height);
    if base > 0.0 {
        projection.scale() / base
    } else {
        1.0
    }
}

/// The same view expressed in another projection family
///
/// Center and relative scale carry over so that switching families
/// mid-interaction does not jump.
pub fn transfer_state(
    from: &Projection,
    to_kind: ProjectionKind,
    width: f64,
    height: f64,
) -> Projection {
    let center = from.view_center();
    let relative = relative_scale(from, width, height);
    let mut projection = create_projection(to_kind, width, height, Some(center));
    projection.set_scale(base_scale(to_kind, width, height) * relative);
    projection
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_base_scales() {
        assert_abs_diff_eq!(
            base_scale(ProjectionKind::Mercator, 960.0, 600.0),
            960.0 / TAU,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            base_scale(ProjectionKind::Orthographic, 960.0, 600.0),
            270.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_create_projection_centers_view() {
        let center = LatLng::new(45.0, 10.0);
        let globe = create_projection(ProjectionKind::Orthographic, 800.0, 600.0, Some(center));
        assert_eq!(globe.state().clip_angle, Some(90.0));
        let middle = globe.forward(center).unwrap();
        assert_abs_diff_eq!(middle.x, 400.0, epsilon = 1e-6);
        assert_abs_diff_eq!(middle.y, 300.0, epsilon = 1e-6);

        let mercator = create_projection(ProjectionKind::Mercator, 800.0, 600.0, Some(center));
        let middle = mercator.forward(center).unwrap();
        assert_abs_diff_eq!(middle.x, 400.0, epsilon = 1e-6);
        assert_abs_diff_eq!(middle.y, 300.0, epsilon = 1e-6);
        assert_abs_diff_eq!(mercator.view_center().lat, 45.0, epsilon = 1e-9);
        assert_abs_diff_eq!(mercator.view_center().lng, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fixed_center_composite() {
        let usa = create_projection(
            ProjectionKind::AlbersUsa,
            960.0,
            600.0,
            Some(LatLng::new(0.0, 0.0)),
        );
        assert_eq!(usa.rotate(), Projection::new(ProjectionKind::AlbersUsa).rotate());
    }

    #[test]
    fn test_transfer_keeps_center_and_relative_scale() {
        let (w, h) = (960.0, 600.0);
        let mut globe =
            create_projection(ProjectionKind::Orthographic, w, h, Some(LatLng::new(30.0, -40.0)));
        globe.set_scale(base_scale(ProjectionKind::Orthographic, w, h) * 3.0);

        let conic = transfer_state(&globe, ProjectionKind::ConicEqualArea, w, h);
        assert_eq!(conic.kind(), ProjectionKind::ConicEqualArea);
        assert_abs_diff_eq!(relative_scale(&conic, w, h), 3.0, epsilon = 1e-9);

        let center = conic.view_center();
        assert_abs_diff_eq!(center.lat, 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(center.lng, -40.0, epsilon = 1e-9);
    }
}
