//! Pixel samplers for inverse-mapped reprojection
//!
//! Both samplers take fractional source coordinates that the caller has
//! already bounds-checked against `[0, width) x [0, height)`.

use crate::raster::buffer::{RasterBuffer, CHANNELS};

/// Copy the pixel containing `(src_x, src_y)`
pub fn nearest(source: &RasterBuffer, src_x: f64, src_y: f64) -> Option<[u8; 4]> {
    if !(src_x >= 0.0 && src_y >= 0.0) {
        return None;
    }
    source.pixel(src_x.floor() as u32, src_y.floor() as u32)
}

/// Blend the four pixels around `(src_x, src_y)`
///
/// Channels are interpolated independently along x and then along y, and
/// rounded to the nearest byte. Neighbors past the last row or column
/// reuse the edge pixel.
pub fn bilinear(source: &RasterBuffer, src_x: f64, src_y: f64) -> Option<[u8; 4]> {
    let (width, height) = (source.width(), source.height());
    if !(src_x >= 0.0 && src_y >= 0.0) || width == 0 || height == 0 {
        return None;
    }

    let x0 = src_x.floor() as u32;
    let y0 = src_y.floor() as u32;
    if x0 >= width || y0 >= height {
        return None;
    }
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);
    let x_frac = src_x - x0 as f64;
    let y_frac = src_y - y0 as f64;

    let data = source.data();
    let stride = width as usize;
    let index = |x: u32, y: u32| (y as usize * stride + x as usize) * CHANNELS;
    let (i00, i10, i01, i11) = (index(x0, y0), index(x1, y0), index(x0, y1), index(x1, y1));

    let mut out = [0u8; 4];
    for (c, channel) in out.iter_mut().enumerate() {
        let top = data[i00 + c] as f64 * (1.0 - x_frac) + data[i10 + c] as f64 * x_frac;
        let bottom = data[i01 + c] as f64 * (1.0 - x_frac) + data[i11 + c] as f64 * x_frac;
        *channel = (top * (1.0 - y_frac) + bottom * y_frac).round() as u8;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> RasterBuffer {
        RasterBuffer::from_rgba(
            2,
            2,
            vec![
                0, 0, 0, 255, //
                100, 0, 0, 255, //
                0, 200, 0, 255, //
                100, 200, 0, 255,
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_nearest_floors_coordinates() {
        let source = two_by_two();
        assert_eq!(nearest(&source, 1.9, 0.2), Some([100, 0, 0, 255]));
        assert_eq!(nearest(&source, 0.0, 1.99), Some([0, 200, 0, 255]));
        assert_eq!(nearest(&source, 2.0, 0.0), None);
        assert_eq!(nearest(&source, -0.5, 0.0), None);
    }

    #[test]
    fn test_bilinear_blends_neighbors() {
        let source = two_by_two();
        assert_eq!(bilinear(&source, 0.5, 0.5), Some([50, 100, 0, 255]));
        assert_eq!(bilinear(&source, 0.25, 0.0), Some([25, 0, 0, 255]));
        // Edge column clamps instead of reading past the row
        assert_eq!(bilinear(&source, 1.5, 0.0), Some([100, 0, 0, 255]));
        assert_eq!(bilinear(&source, 0.0, 0.0), nearest(&source, 0.0, 0.0));
    }
}
