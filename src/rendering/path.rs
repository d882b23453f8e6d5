//! Projecting `geo-types` geometries into screen-space rings
//!
//! Runs of coordinates are split wherever a point has no projection or two
//! neighbours land on opposite sides of an interruption, so the surface
//! never draws a line across the map.

use crate::core::geo::{LatLng, Point};
use crate::projection::rotation::Rotation;
use crate::projection::Projection;
use crate::rendering::surface::PathRing;
use geo_types::{Coord, Geometry, LineString, MultiLineString, Polygon};
use std::f64::consts::PI;

/// Interval between graticule lines in degrees
pub const GRATICULE_STEP: f64 = 10.0;
/// Sampling density along graticule lines in degrees
const GRATICULE_PRECISION: f64 = 2.5;
/// Angular offset that keeps outline samples inside the clip edge
const EDGE_EPSILON: f64 = 1e-6;

/// A feature from the geometry source: stable id plus lon/lat geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: String,
    pub geometry: Geometry<f64>,
}

impl Feature {
    pub fn new(id: impl Into<String>, geometry: impl Into<Geometry<f64>>) -> Self {
        Self {
            id: id.into(),
            geometry: geometry.into(),
        }
    }
}

/// Longest screen jump between neighbours before the run is split
fn max_jump(projection: &Projection) -> f64 {
    projection.scale() * PI
}

/// Project a run of lon/lat coordinates, splitting on gaps
pub fn project_coords<'a>(
    projection: &Projection,
    coords: impl IntoIterator<Item = &'a Coord<f64>>,
) -> Vec<Vec<Point>> {
    let limit = max_jump(projection);
    let mut runs = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for coord in coords {
        match projection.forward(LatLng::from_lng_lat(coord.x, coord.y)) {
            Some(point) => {
                if let Some(last) = current.last() {
                    if last.distance_to(&point) > limit {
                        runs.push(std::mem::take(&mut current));
                    }
                }
                current.push(point);
            }
            None => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs.retain(|run| !run.is_empty());
    runs
}

pub fn project_line(projection: &Projection, line: &LineString<f64>) -> Vec<PathRing> {
    project_coords(projection, line.coords())
        .into_iter()
        .filter(|run| run.len() > 1)
        .map(PathRing::open)
        .collect()
}

/// Rings that project without a break stay closed; broken ones become open runs
pub fn project_polygon(projection: &Projection, polygon: &Polygon<f64>) -> Vec<PathRing> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .flat_map(|ring| {
            let mut runs = project_coords(projection, ring.coords());
            if runs.len() == 1 {
                runs.pop().map(PathRing::closed).into_iter().collect::<Vec<_>>()
            } else {
                runs.into_iter().map(PathRing::open).collect()
            }
        })
        .collect()
}

pub fn project_geometry(projection: &Projection, geometry: &Geometry<f64>) -> Vec<PathRing> {
    match geometry {
        Geometry::Point(point) => projection
            .forward(LatLng::from_lng_lat(point.x(), point.y()))
            .map(|p| vec![PathRing::open(vec![p])])
            .unwrap_or_default(),
        Geometry::MultiPoint(points) => points
            .iter()
            .filter_map(|point| projection.forward(LatLng::from_lng_lat(point.x(), point.y())))
            .map(|p| PathRing::open(vec![p]))
            .collect(),
        Geometry::Line(line) => {
            project_line(projection, &LineString::from(vec![line.start, line.end]))
        }
        Geometry::LineString(line) => project_line(projection, line),
        Geometry::MultiLineString(lines) => lines
            .iter()
            .flat_map(|line| project_line(projection, line))
            .collect(),
        Geometry::Polygon(polygon) => project_polygon(projection, polygon),
        Geometry::MultiPolygon(polygons) => polygons
            .iter()
            .flat_map(|polygon| project_polygon(projection, polygon))
            .collect(),
        Geometry::Rect(rect) => project_polygon(projection, &rect.to_polygon()),
        Geometry::Triangle(triangle) => project_polygon(projection, &triangle.to_polygon()),
        Geometry::GeometryCollection(collection) => collection
            .iter()
            .flat_map(|geometry| project_geometry(projection, geometry))
            .collect(),
    }
}

/// Meridians every `step` degrees pole to pole, parallels up to ±80
pub fn graticule(step: f64) -> MultiLineString<f64> {
    let step = if step > 0.0 { step } else { GRATICULE_STEP };
    let samples = |from: f64, to: f64| {
        let count = ((to - from) / GRATICULE_PRECISION).ceil() as usize;
        (0..=count).map(move |i| (from + i as f64 * GRATICULE_PRECISION).min(to))
    };

    let mut lines = Vec::new();
    let mut lon = -180.0;
    while lon < 180.0 {
        lines.push(LineString::from(
            samples(-90.0, 90.0).map(|lat| (lon, lat)).collect::<Vec<_>>(),
        ));
        lon += step;
    }
    let mut lat = -80.0;
    while lat <= 80.0 {
        lines.push(LineString::from(
            samples(-180.0, 180.0).map(|lon| (lon, lat)).collect::<Vec<_>>(),
        ));
        lat += step;
    }
    MultiLineString::new(lines)
}

pub fn project_graticule(projection: &Projection, step: f64) -> Vec<PathRing> {
    graticule(step)
        .iter()
        .flat_map(|line| project_line(projection, line))
        .collect()
}

/// Edge of the visible sphere in screen space
///
/// Clipped projections trace the clip circle; the others trace the
/// antimeridian of the rotated frame.
pub fn sphere_outline(projection: &Projection, segments: usize) -> Vec<PathRing> {
    let segments = segments.max(8);
    let rotation = Rotation::new(projection.rotate());

    let rotated: Vec<(f64, f64)> = match projection.state().clip_angle {
        Some(clip) => {
            let radius = clip.to_radians() - EDGE_EPSILON;
            (0..=segments)
                .map(|i| {
                    let theta = i as f64 / segments as f64 * 2.0 * PI;
                    let phi = (radius.sin() * theta.sin()).asin();
                    let lambda = (radius.sin() * theta.cos()).atan2(radius.cos());
                    (lambda, phi)
                })
                .collect()
        }
        None => {
            let half = segments / 2;
            let edge = PI - EDGE_EPSILON;
            let meridian = |lambda: f64, upward: bool| {
                (0..=half).map(move |i| {
                    let t = i as f64 / half as f64;
                    let t = if upward { t } else { 1.0 - t };
                    (lambda, (t - 0.5) * (PI - EDGE_EPSILON))
                })
            };
            meridian(edge, true).chain(meridian(-edge, false)).collect()
        }
    };

    let coords: Vec<Coord<f64>> = rotated
        .into_iter()
        .map(|(lambda, phi)| {
            let (lambda, phi) = rotation.invert(lambda, phi);
            Coord {
                x: lambda.to_degrees(),
                y: phi.to_degrees(),
            }
        })
        .collect();

    let mut runs = project_coords(projection, coords.iter());
    if runs.len() == 1 && projection.state().clip_angle.is_some() {
        runs.pop().map(PathRing::closed).into_iter().collect()
    } else {
        runs.into_iter().filter(|run| run.len() > 1).map(PathRing::open).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::ProjectionKind;
    use geo_types::{line_string, polygon};

    #[test]
    fn test_line_breaks_at_hidden_points() {
        let globe = Projection::new(ProjectionKind::Orthographic);
        // Runs from the front hemisphere over the back and out again
        let line = line_string![
            (x: -30.0, y: 0.0),
            (x: 0.0, y: 0.0),
            (x: 120.0, y: 0.0),
            (x: 180.0, y: 0.0),
            (x: 300.0, y: 0.0),
            (x: 330.0, y: 0.0),
        ];
        let rings = project_line(&globe, &line);
        assert_eq!(rings.len(), 2);
        assert!(rings.iter().all(|ring| !ring.closed));
    }

    #[test]
    fn test_line_breaks_at_antimeridian() {
        let plate = Projection::new(ProjectionKind::Equirectangular);
        let line = line_string![
            (x: 170.0, y: 10.0),
            (x: 179.0, y: 10.0),
            (x: -179.0, y: 10.0),
            (x: -170.0, y: 10.0),
        ];
        assert_eq!(project_line(&plate, &line).len(), 2);
    }

    #[test]
    fn test_polygon_stays_closed() {
        let plate = Projection::new(ProjectionKind::Equirectangular);
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 10.0),
            (x: 0.0, y: 0.0),
        ];
        let rings = project_geometry(&plate, &Geometry::Polygon(square));
        assert_eq!(rings.len(), 1);
        assert!(rings[0].closed);
        assert_eq!(rings[0].points.len(), 5);
    }

    #[test]
    fn test_graticule_lines() {
        let lines = graticule(GRATICULE_STEP);
        // 36 meridians and 17 parallels
        assert_eq!(lines.0.len(), 53);
        let first = &lines.0[0];
        assert_eq!(first.0.first().map(|c| c.y), Some(-90.0));
        assert_eq!(first.0.last().map(|c| c.y), Some(90.0));
    }

    #[test]
    fn test_orthographic_outline_is_a_circle() {
        let globe = Projection::new(ProjectionKind::Orthographic);
        let outline = sphere_outline(&globe, 64);
        assert_eq!(outline.len(), 1);
        assert!(outline[0].closed);
        let center = globe.translate();
        for point in &outline[0].points {
            assert!((point.distance_to(&center) - globe.scale()).abs() < 1e-3);
        }
    }

    #[test]
    fn test_unclipped_outline_spans_the_map() {
        let plate = Projection::new(ProjectionKind::Equirectangular);
        let outline = sphere_outline(&plate, 64);
        assert!(!outline.is_empty());
        let xs: Vec<f64> = outline
            .iter()
            .flat_map(|ring| ring.points.iter().map(|p| p.x))
            .collect();
        let width = xs.iter().cloned().fold(f64::MIN, f64::max)
            - xs.iter().cloned().fold(f64::MAX, f64::min);
        assert!((width - 2.0 * PI * plate.scale()).abs() < 1e-2);
    }
}
