use crate::{ProjletError, Result};

/// Bytes per RGBA pixel
pub const CHANNELS: usize = 4;

/// An RGBA8 pixel buffer, row-major, top row first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterBuffer {
    /// Fully transparent buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * CHANNELS],
        }
    }

    /// Wrap existing RGBA bytes; the length must be `width * height * 4`
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if data.len() != width as usize * height as usize * CHANNELS {
            return Err(ProjletError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * CHANNELS)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    /// Alternating squares of `cell` pixels
    pub fn checkerboard(width: u32, height: u32, cell: u32, a: [u8; 4], b: [u8; 4]) -> Self {
        let cell = cell.max(1);
        let mut buffer = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let color = if ((x / cell) + (y / cell)) % 2 == 0 { a } else { b };
                buffer.set_pixel(x, y, color);
            }
        }
        buffer
    }

    /// Opaque tile whose red channel follows x and green channel follows y
    ///
    /// Handy for checking where a reprojected pixel was sampled from.
    pub fn gradient(width: u32, height: u32) -> Self {
        let mut buffer = Self::new(width, height);
        let span = |n: u32| (n.max(2) - 1) as f64;
        for y in 0..height {
            for x in 0..width {
                let r = (x as f64 / span(width) * 255.0).round() as u8;
                let g = (y as f64 / span(height) * 255.0).round() as u8;
                buffer.set_pixel(x, y, [r, g, 128, 255]);
            }
        }
        buffer
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * CHANNELS)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let i = self.offset(x, y)?;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.data[i..i + CHANNELS]);
        Some(rgba)
    }

    /// Out-of-range coordinates are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(i) = self.offset(x, y) {
            self.data[i..i + CHANNELS].copy_from_slice(&rgba);
        }
    }

    /// Fraction of pixels with zero alpha
    pub fn transparent_fraction(&self) -> f64 {
        if self.pixel_count() == 0 {
            return 0.0;
        }
        let transparent = self
            .data
            .chunks_exact(CHANNELS)
            .filter(|pixel| pixel[3] == 0)
            .count();
        transparent as f64 / self.pixel_count() as f64
    }

    #[cfg(feature = "png")]
    pub fn load_png(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let image = image::open(path.as_ref())?.to_rgba8();
        let (width, height) = image.dimensions();
        Self::from_rgba(width, height, image.into_raw())
    }

    #[cfg(feature = "png")]
    pub fn save_png(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let image = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or(ProjletError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })?;
        image.save(path.as_ref())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_and_pixel_access() {
        let mut buffer = RasterBuffer::solid(3, 2, [255, 0, 0, 255]);
        assert_eq!(buffer.data().len(), 24);
        assert_eq!(buffer.pixel(2, 1), Some([255, 0, 0, 255]));
        assert_eq!(buffer.pixel(3, 0), None);

        buffer.set_pixel(1, 1, [0, 0, 0, 0]);
        buffer.set_pixel(10, 10, [1, 1, 1, 1]);
        assert_eq!(buffer.pixel(1, 1), Some([0, 0, 0, 0]));
        assert!((buffer.transparent_fraction() - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_rgba_checks_length() {
        assert!(RasterBuffer::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            RasterBuffer::from_rgba(2, 2, vec![0; 15]),
            Err(ProjletError::InvalidDimensions {
                width: 2,
                height: 2
            })
        ));
    }

    #[test]
    fn test_synthetic_tiles() {
        let board = RasterBuffer::checkerboard(4, 4, 2, [0, 0, 0, 255], [255, 255, 255, 255]);
        assert_eq!(board.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(board.pixel(2, 0), Some([255, 255, 255, 255]));
        assert_eq!(board.pixel(2, 2), Some([0, 0, 0, 255]));

        let gradient = RasterBuffer::gradient(256, 256);
        assert_eq!(gradient.pixel(0, 0), Some([0, 0, 128, 255]));
        assert_eq!(gradient.pixel(255, 255), Some([255, 255, 128, 255]));
    }
}
