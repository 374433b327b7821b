//! RGB-encoded elevation rasters.

use super::DecodeError;

/// A square raster of byte samples with at least three channels.
///
/// Only the first three channels (R, G, B) carry elevation; any further
/// channels (alpha) are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterTile {
    side: u32,
    channels: u8,
    samples: Vec<u8>,
}

impl RasterTile {
    /// Builds a raster from interleaved samples in row-major order.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the side is zero, fewer than three channels
    /// are given, or the buffer length is not `side² · channels`.
    pub fn from_samples(side: u32, channels: u8, samples: Vec<u8>) -> Result<Self, DecodeError> {
        if side == 0 {
            return Err(DecodeError::InvalidDimensions {
                width: 0,
                height: 0,
                reason: "raster is empty".to_string(),
            });
        }
        if channels < 3 {
            return Err(DecodeError::UnsupportedChannels(channels));
        }
        let expected = side as usize * side as usize * channels as usize;
        if samples.len() != expected {
            return Err(DecodeError::BufferLength {
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            side,
            channels,
            samples,
        })
    }

    /// Decodes a PNG (or any format the `image` crate recognises) into an
    /// RGB raster.
    pub fn from_encoded(bytes: &[u8]) -> Result<Self, DecodeError> {
        let rgb = image::load_from_memory(bytes)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width != height {
            return Err(DecodeError::InvalidDimensions {
                width,
                height,
                reason: "raster must be square".to_string(),
            });
        }
        Self::from_samples(width, 3, rgb.into_raw())
    }

    /// Number of samples along each edge.
    pub fn side(&self) -> u32 {
        self.side
    }

    /// The R, G, B bytes of the sample at column `x`, row `y`.
    #[inline]
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let offset = (y as usize * self.side as usize + x as usize) * self.channels as usize;
        [
            self.samples[offset],
            self.samples[offset + 1],
            self.samples[offset + 2],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    #[test]
    fn test_from_samples_reads_rgb() {
        let samples = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        let raster = RasterTile::from_samples(2, 3, samples).unwrap();
        assert_eq!(raster.rgb(0, 0), [1, 2, 3]);
        assert_eq!(raster.rgb(1, 0), [4, 5, 6]);
        assert_eq!(raster.rgb(0, 1), [7, 8, 9]);
        assert_eq!(raster.rgb(1, 1), [10, 11, 12]);
    }

    #[test]
    fn test_from_samples_skips_alpha() {
        let samples = vec![1, 2, 3, 255, 4, 5, 6, 255, 7, 8, 9, 255, 10, 11, 12, 255];
        let raster = RasterTile::from_samples(2, 4, samples).unwrap();
        assert_eq!(raster.rgb(1, 1), [10, 11, 12]);
    }

    #[test]
    fn test_from_samples_rejects_bad_input() {
        assert!(matches!(
            RasterTile::from_samples(0, 3, vec![]),
            Err(DecodeError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            RasterTile::from_samples(2, 2, vec![0; 8]),
            Err(DecodeError::UnsupportedChannels(2))
        ));
        assert!(matches!(
            RasterTile::from_samples(2, 3, vec![0; 11]),
            Err(DecodeError::BufferLength {
                expected: 12,
                actual: 11
            })
        ));
    }

    #[test]
    fn test_from_encoded_png() {
        let image = RgbImage::from_pixel(4, 4, Rgb([0, 39, 16]));
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let raster = RasterTile::from_encoded(&png).unwrap();
        assert_eq!(raster.side(), 4);
        assert_eq!(raster.rgb(3, 3), [0, 39, 16]);
    }

    #[test]
    fn test_from_encoded_rgba_png_drops_alpha() {
        let image = RgbaImage::from_pixel(2, 2, Rgba([128, 0, 0, 255]));
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let raster = RasterTile::from_encoded(&png).unwrap();
        assert_eq!(raster.rgb(0, 0), [128, 0, 0]);
    }

    #[test]
    fn test_from_encoded_rejects_non_square() {
        let image = RgbImage::new(4, 2);
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        assert!(matches!(
            RasterTile::from_encoded(&png),
            Err(DecodeError::InvalidDimensions {
                width: 4,
                height: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_from_encoded_rejects_garbage() {
        let result = RasterTile::from_encoded(b"<html>404</html>");
        assert!(matches!(result, Err(DecodeError::Image(_))));
    }
}
