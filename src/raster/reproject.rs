//! Inverse-mapping raster reprojection
//!
//! Every target pixel is inverted through the display projection and looked
//! up in the source raster through the source projection's closed-form
//! forward formula. Pixels without a geographic meaning, outside the source
//! domain or outside the source raster stay fully transparent.

use crate::core::constants::MERCATOR_MAX_LATITUDE;
use crate::core::geo::{LatLng, Point};
use crate::projection::{Projection, ProjectionKind};
use crate::raster::buffer::{RasterBuffer, CHANNELS};
use crate::raster::sampling;
use instant::Instant;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_4, PI};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SamplingMode {
    Nearest,
    Bilinear,
    /// Plain copy of the overlapping region, no projection math
    Baseline,
}

impl SamplingMode {
    pub const ALL: [SamplingMode; 3] = [
        SamplingMode::Baseline,
        SamplingMode::Nearest,
        SamplingMode::Bilinear,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SamplingMode::Nearest => "nearest",
            SamplingMode::Bilinear => "bilinear",
            SamplingMode::Baseline => "baseline",
        }
    }
}

impl fmt::Display for SamplingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SamplingMode {
    type Err = crate::ProjletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SamplingMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| crate::ProjletError::Config(format!("unknown sampling mode {}", s)))
    }
}

/// Projection the source raster is stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceProjection {
    /// Spherical Web Mercator covering latitudes up to 85 degrees
    WebMercator,
    /// Plate carrée covering the whole globe
    Equirectangular,
}

impl SourceProjection {
    /// Whether the source raster holds data for this coordinate
    pub fn contains(&self, lat_lng: LatLng) -> bool {
        if !lat_lng.is_finite() || lat_lng.lng.abs() > 180.0 {
            return false;
        }
        match self {
            SourceProjection::WebMercator => lat_lng.lat.abs() <= MERCATOR_MAX_LATITUDE,
            SourceProjection::Equirectangular => lat_lng.lat.abs() <= 90.0,
        }
    }

    /// Fractional source pixel for a coordinate inside the domain
    pub fn to_pixel(&self, lat_lng: LatLng, width: u32, height: u32) -> (f64, f64) {
        let x = (lat_lng.lng + 180.0) / 360.0 * width as f64;
        let y = match self {
            SourceProjection::WebMercator => {
                let merc = (FRAC_PI_4 + lat_lng.lat * PI / 360.0).tan().ln();
                (1.0 - merc / PI) / 2.0 * height as f64
            }
            SourceProjection::Equirectangular => (90.0 - lat_lng.lat) / 180.0 * height as f64,
        };
        (x, y)
    }
}

/// A freshly reprojected buffer and the time spent in the pixel loop
#[derive(Debug, Clone)]
pub struct Reprojection {
    pub buffer: RasterBuffer,
    pub elapsed_ms: f64,
    /// Target pixels that received a sample
    pub sampled_pixels: usize,
}

/// Equirectangular display projection centered on `(center_lat, center_lon)`
pub fn display_projection(
    width: u32,
    height: u32,
    scale: f64,
    center_lon: f64,
    center_lat: f64,
) -> Projection {
    let mut projection = Projection::new(ProjectionKind::Equirectangular);
    projection.set_scale(scale);
    projection.set_translate(Point::new(width as f64 / 2.0, height as f64 / 2.0));
    projection.set_rotation([-center_lon, 0.0, 0.0]);
    projection.set_center(LatLng::new(center_lat, 0.0));
    projection
}

/// Reproject `source` into a new equirectangular view of `width x height`
#[allow(clippy::too_many_arguments)]
pub fn reproject(
    source: &RasterBuffer,
    source_projection: SourceProjection,
    width: u32,
    height: u32,
    scale: f64,
    center_lon: f64,
    center_lat: f64,
    mode: SamplingMode,
) -> Reprojection {
    let target = display_projection(width, height, scale, center_lon, center_lat);
    reproject_to(source, source_projection, &target, width, height, mode)
}

/// Reproject `source` through an arbitrary target projection
pub fn reproject_to(
    source: &RasterBuffer,
    source_projection: SourceProjection,
    target: &Projection,
    width: u32,
    height: u32,
    mode: SamplingMode,
) -> Reprojection {
    let mut buffer = RasterBuffer::new(width, height);

    let start = Instant::now();
    let sampled_pixels = match mode {
        SamplingMode::Baseline => copy_overlap(source, &mut buffer),
        SamplingMode::Nearest | SamplingMode::Bilinear => {
            inverse_map(source, source_projection, target, &mut buffer, mode)
        }
    };
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    Reprojection {
        buffer,
        elapsed_ms,
        sampled_pixels,
    }
}

fn inverse_map(
    source: &RasterBuffer,
    source_projection: SourceProjection,
    target: &Projection,
    buffer: &mut RasterBuffer,
    mode: SamplingMode,
) -> usize {
    let (width, height) = (buffer.width(), buffer.height());
    let (src_width, src_height) = (source.width(), source.height());
    let mut sampled = 0;

    for y in 0..height {
        for x in 0..width {
            let Some(lat_lng) = target.invert(Point::new(x as f64, y as f64)) else {
                continue;
            };
            if !source_projection.contains(lat_lng) {
                continue;
            }
            let (src_x, src_y) = source_projection.to_pixel(lat_lng, src_width, src_height);
            if !(src_x >= 0.0
                && src_x < src_width as f64
                && src_y >= 0.0
                && src_y < src_height as f64)
            {
                continue;
            }

            let rgba = match mode {
                SamplingMode::Bilinear => sampling::bilinear(source, src_x, src_y),
                _ => sampling::nearest(source, src_x, src_y),
            };
            if let Some(rgba) = rgba {
                buffer.set_pixel(x, y, rgba);
                sampled += 1;
            }
        }
    }
    sampled
}

fn copy_overlap(source: &RasterBuffer, buffer: &mut RasterBuffer) -> usize {
    let columns = source.width().min(buffer.width()) as usize;
    let rows = source.height().min(buffer.height()) as usize;
    let src_stride = source.width() as usize * CHANNELS;
    let dst_stride = buffer.width() as usize * CHANNELS;
    let row_bytes = columns * CHANNELS;

    let src = source.data();
    let dst = buffer.data_mut();
    for row in 0..rows {
        let from = row * src_stride;
        let to = row * dst_stride;
        dst[to..to + row_bytes].copy_from_slice(&src[from..from + row_bytes]);
    }
    rows * columns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_copy_is_byte_identical() {
        let source = RasterBuffer::solid(100, 100, [255, 0, 0, 255]);
        let result = reproject(
            &source,
            SourceProjection::WebMercator,
            100,
            100,
            100.0 / std::f64::consts::TAU,
            0.0,
            0.0,
            SamplingMode::Baseline,
        );
        assert_eq!(result.buffer, source);
        assert_eq!(result.sampled_pixels, 10_000);
    }

    #[test]
    fn test_baseline_copies_only_the_overlap() {
        let source = RasterBuffer::solid(4, 4, [1, 2, 3, 4]);
        let result = reproject_to(
            &source,
            SourceProjection::Equirectangular,
            &Projection::default(),
            6,
            2,
            SamplingMode::Baseline,
        );
        assert_eq!(result.buffer.pixel(3, 1), Some([1, 2, 3, 4]));
        assert_eq!(result.buffer.pixel(4, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_mercator_domain() {
        let mercator = SourceProjection::WebMercator;
        assert!(mercator.contains(LatLng::new(85.0, 180.0)));
        assert!(!mercator.contains(LatLng::new(85.1, 0.0)));
        assert!(!mercator.contains(LatLng::new(0.0, 180.5)));
        assert!(SourceProjection::Equirectangular.contains(LatLng::new(89.9, 0.0)));
    }

    #[test]
    fn test_mercator_forward_formula() {
        let (x, y) = SourceProjection::WebMercator.to_pixel(LatLng::new(0.0, 0.0), 256, 256);
        assert!((x - 128.0).abs() < 1e-9);
        assert!((y - 128.0).abs() < 1e-9);

        let (_, top) =
            SourceProjection::WebMercator.to_pixel(LatLng::new(85.0511287798, 0.0), 256, 256);
        assert!(top.abs() < 1e-6);
    }

    #[test]
    fn test_sampling_mode_names() {
        for mode in SamplingMode::ALL {
            assert_eq!(mode.name().parse::<SamplingMode>().unwrap(), mode);
        }
        assert!("cubic".parse::<SamplingMode>().is_err());
    }
}
