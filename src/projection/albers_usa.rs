//! Composite equal-area projection of the United States.
//!
//! The lower 48 states use an Albers conic; Alaska and Hawaii are drawn as
//! insets with their own conics, each accepted only inside its pixel extent.

use crate::core::geo::{LatLng, Point};
use crate::projection::Projection;

#[derive(Debug, Clone, PartialEq)]
pub struct AlbersUsa {
    scale: f64,
    translate: Point,
    lower48: Projection,
    alaska: Projection,
    hawaii: Projection,
}

/// Pixel extent as `(x0, y0, x1, y1)` relative to translate, in scale units
type Extent = (f64, f64, f64, f64);

const LOWER48_EXTENT: Extent = (-0.455, -0.238, 0.455, 0.238);
const ALASKA_EXTENT: Extent = (-0.425, 0.120, -0.214, 0.234);
const HAWAII_EXTENT: Extent = (-0.214, 0.166, -0.115, 0.234);

impl AlbersUsa {
    pub fn new(scale: f64, translate: Point) -> Self {
        let k = scale;
        let mut lower48 =
            Projection::conic_equal_area((29.5, 45.5), [96.0, 0.0, 0.0], LatLng::new(38.7, -0.6));
        lower48.state.scale = k;
        lower48.state.translate = translate;
        lower48.sync();

        let mut alaska =
            Projection::conic_equal_area((55.0, 65.0), [154.0, 0.0, 0.0], LatLng::new(58.5, -2.0));
        alaska.state.scale = 0.35 * k;
        alaska.state.translate = Point::new(translate.x - 0.307 * k, translate.y + 0.201 * k);
        alaska.sync();

        let mut hawaii =
            Projection::conic_equal_area((8.0, 18.0), [157.0, 0.0, 0.0], LatLng::new(19.9, -3.0));
        hawaii.state.scale = k;
        hawaii.state.translate = Point::new(translate.x - 0.205 * k, translate.y + 0.212 * k);
        hawaii.sync();

        Self {
            scale,
            translate,
            lower48,
            alaska,
            hawaii,
        }
    }

    pub fn forward(&self, lat_lng: LatLng) -> Option<Point> {
        [
            (&self.lower48, LOWER48_EXTENT),
            (&self.alaska, ALASKA_EXTENT),
            (&self.hawaii, HAWAII_EXTENT),
        ]
        .into_iter()
        .find_map(|(projection, extent)| {
            projection
                .forward(lat_lng)
                .filter(|point| self.contains(extent, *point))
        })
    }

    pub fn invert(&self, point: Point) -> Option<LatLng> {
        let projection = if self.contains(ALASKA_EXTENT, point) {
            &self.alaska
        } else if self.contains(HAWAII_EXTENT, point) {
            &self.hawaii
        } else {
            &self.lower48
        };
        projection.invert(point)
    }

    fn contains(&self, extent: Extent, point: Point) -> bool {
        let x = (point.x - self.translate.x) / self.scale;
        let y = (point.y - self.translate.y) / self.scale;
        x >= extent.0 && x < extent.2 && y >= extent.1 && y < extent.3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insets_are_selected() {
        let usa = AlbersUsa::new(1070.0, Point::new(480.0, 250.0));
        let kansas = usa.forward(LatLng::new(39.0, -98.0)).unwrap();
        let anchorage = usa.forward(LatLng::new(61.2, -149.9)).unwrap();
        let honolulu = usa.forward(LatLng::new(21.3, -157.8)).unwrap();

        assert!(usa.contains(LOWER48_EXTENT, kansas));
        assert!(usa.contains(ALASKA_EXTENT, anchorage));
        assert!(usa.contains(HAWAII_EXTENT, honolulu));

        let back = usa.invert(anchorage).unwrap();
        assert!((back.lat - 61.2).abs() < 1e-4);
        assert!((back.lng + 149.9).abs() < 1e-4);
    }

    #[test]
    fn test_outside_every_inset_is_undefined() {
        let usa = AlbersUsa::new(1070.0, Point::new(480.0, 250.0));
        assert!(usa.forward(LatLng::new(48.8, 2.3)).is_none());
    }
}
