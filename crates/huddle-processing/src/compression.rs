//! JPEG recompression.
//!
//! Decodes any format the `image` crate understands, bounds the longest side,
//! and re-encodes as baseline JPEG. Everything here is CPU-bound and
//! synchronous; async callers run it on the blocking pool.

use std::io::{Cursor, Write};

use huddle_core::PhotoSettings;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader};

use crate::upload::types::ProcessedImage;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompressionError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// Output size for a `width`×`height` image bounded by `max_dimension`.
///
/// The longer side becomes `max_dimension` and the shorter side is scaled by
/// the same factor and rounded. Images already within bounds keep their size;
/// nothing is ever upscaled. A `max_dimension` of 0 is treated as 1.
pub fn target_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let max_dimension = max_dimension.max(1);

    if width <= max_dimension && height <= max_dimension {
        return (width, height);
    }

    let scale = |side: u32, long: u32| -> u32 {
        let scaled = (side as f64 * max_dimension as f64 / long as f64).round() as u32;
        scaled.max(1)
    };

    if width >= height {
        (max_dimension, scale(height, width))
    } else {
        (scale(width, height), max_dimension)
    }
}

/// Bounded-size JPEG recompressor.
#[derive(Debug, Clone, Copy)]
pub struct Recompressor {
    max_dimension: u32,
    quality: u8,
}

impl Recompressor {
    pub fn new(max_dimension: u32, quality: u8) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
            quality: quality.clamp(1, 100),
        }
    }

    pub fn from_settings(settings: &PhotoSettings) -> Self {
        Self::new(settings.max_dimension, settings.jpeg_quality)
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Decode, resize if needed, and encode as JPEG.
    ///
    /// An encoder failure is an error. The original bytes are never returned
    /// in place of a JPEG.
    pub fn recompress(&self, data: &[u8]) -> Result<ProcessedImage, CompressionError> {
        let img = Self::decode(data)?;
        let img = self.resize(img);
        let (width, height) = (img.width(), img.height());
        let data = self.encode_jpeg(&img)?;

        Ok(ProcessedImage {
            data,
            width,
            height,
        })
    }

    /// Decode and turn the pixels upright according to the EXIF orientation.
    ///
    /// The JPEG written afterwards carries no EXIF block, so the rotation has
    /// to be baked into the pixels here.
    fn decode(data: &[u8]) -> Result<DynamicImage, CompressionError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| CompressionError::Decode(e.to_string()))?;

        if reader.format().is_none() {
            return Err(CompressionError::Decode(
                "unrecognized image format".to_string(),
            ));
        }

        let mut decoder = reader
            .into_decoder()
            .map_err(|e| CompressionError::Decode(e.to_string()))?;

        let orientation = decoder.orientation().unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Unreadable EXIF orientation, keeping pixels as stored");
            Orientation::NoTransforms
        });

        let mut img = DynamicImage::from_decoder(decoder)
            .map_err(|e| CompressionError::Decode(e.to_string()))?;

        if orientation != Orientation::NoTransforms {
            tracing::debug!(orientation = ?orientation, "Applying EXIF orientation");
            img.apply_orientation(orientation);
        }

        Ok(img)
    }

    /// Resize so the longer side is at most `max_dimension`.
    pub fn resize(&self, img: DynamicImage) -> DynamicImage {
        let (width, height) = (img.width(), img.height());
        let (target_w, target_h) = target_dimensions(width, height, self.max_dimension);

        if (target_w, target_h) == (width, height) {
            return img;
        }

        img.resize_exact(target_w, target_h, FilterType::CatmullRom)
    }

    /// Encode to JPEG. Alpha is dropped since JPEG has no transparency.
    pub fn encode_jpeg(&self, img: &DynamicImage) -> Result<Vec<u8>, CompressionError> {
        let mut buf = Vec::new();
        self.write_jpeg(img, &mut buf)?;

        if buf.is_empty() {
            return Err(CompressionError::Encode(
                "encoder produced no output".to_string(),
            ));
        }

        Ok(buf)
    }
}

impl Recompressor {
    fn write_jpeg<W: Write>(&self, img: &DynamicImage, writer: W) -> Result<(), CompressionError> {
        let rgb = img.to_rgb8();

        JpegEncoder::new_with_quality(writer, self.quality)
            .encode_image(&rgb)
            .map_err(|e| CompressionError::Encode(e.to_string()))
    }
}

impl Default for Recompressor {
    fn default() -> Self {
        Self::from_settings(&PhotoSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, _| image::Rgb([(x % 256) as u8, 0, 0]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Jpeg)
            .unwrap();
        buf.into_inner()
    }

    /// Insert an APP1 EXIF segment holding only an Orientation tag right after SOI.
    fn with_exif_orientation(jpeg: Vec<u8>, orientation: u16) -> Vec<u8> {
        let mut tiff = b"MM\x00\x2a\x00\x00\x00\x08".to_vec();
        tiff.extend_from_slice(&1u16.to_be_bytes());
        tiff.extend_from_slice(&0x0112u16.to_be_bytes());
        tiff.extend_from_slice(&3u16.to_be_bytes());
        tiff.extend_from_slice(&1u32.to_be_bytes());
        tiff.extend_from_slice(&orientation.to_be_bytes());
        tiff.extend_from_slice(&[0, 0]);
        tiff.extend_from_slice(&0u32.to_be_bytes());

        let mut payload = b"Exif\x00\x00".to_vec();
        payload.extend(tiff);

        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&[0xFF, 0xE1]);
        out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
        out.extend(payload);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn test_target_dimensions_landscape() {
        assert_eq!(target_dimensions(4000, 3000, 1920), (1920, 1440));
    }

    #[test]
    fn test_target_dimensions_portrait() {
        assert_eq!(target_dimensions(3000, 4000, 1920), (1440, 1920));
    }

    #[test]
    fn test_target_dimensions_square_and_rounding() {
        assert_eq!(target_dimensions(2000, 2000, 1920), (1920, 1920));
        // 1001 * 1920 / 3000 = 640.64
        assert_eq!(target_dimensions(3000, 1001, 1920), (1920, 641));
    }

    #[test]
    fn test_target_dimensions_never_upscales() {
        assert_eq!(target_dimensions(500, 500, 1920), (500, 500));
        assert_eq!(target_dimensions(1920, 1080, 1920), (1920, 1080));
    }

    #[test]
    fn test_target_dimensions_extreme_aspect_keeps_one_pixel() {
        assert_eq!(target_dimensions(10000, 1, 1920), (1920, 1));
    }

    #[test]
    fn test_target_dimensions_preserves_aspect_ratio() {
        let max = 1920u32;
        for width in (1..=6000u32).step_by(37) {
            for height in (1..=6000u32).step_by(53) {
                let (tw, th) = target_dimensions(width, height, max);
                let long = width.max(height);

                if long <= max {
                    assert_eq!((tw, th), (width, height));
                    continue;
                }

                let (short, short_target, long_target) = if width >= height {
                    (height, th, tw)
                } else {
                    (width, tw, th)
                };
                assert_eq!(long_target, max, "{width}x{height}");

                let exact = short as f64 * max as f64 / long as f64;
                assert!(
                    (short_target as f64 - exact).abs() <= 1.0,
                    "{width}x{height} -> {tw}x{th}, exact short side {exact}"
                );
            }
        }
    }

    #[test]
    fn test_zero_max_dimension_is_clamped() {
        assert_eq!(target_dimensions(400, 200, 0), (1, 1));
        assert_eq!(Recompressor::new(0, 70).max_dimension(), 1);

        let out = Recompressor::new(0, 70).recompress(&png_bytes(4, 2)).unwrap();
        assert_eq!((out.width, out.height), (1, 1));
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("sink closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_encode_failure_is_an_error() {
        let img = DynamicImage::new_rgb8(16, 16);
        let result = Recompressor::default().write_jpeg(&img, BrokenSink);
        match result {
            Err(CompressionError::Encode(msg)) => assert!(msg.contains("sink closed"), "{msg}"),
            other => panic!("expected encode error, got {other:?}"),
        }
    }

    #[test]
    fn test_exif_orientation_is_applied() {
        // Stored landscape, tagged "rotate 90 CW" the way phone cameras write portraits.
        let data = with_exif_orientation(jpeg_bytes(40, 20), 6);
        let out = Recompressor::default().recompress(&data).unwrap();
        assert_eq!((out.width, out.height), (20, 40));

        let decoded = image::load_from_memory(&out.data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (20, 40));
    }

    #[test]
    fn test_exif_orientation_before_resize() {
        let data = with_exif_orientation(jpeg_bytes(400, 300), 6);
        let out = Recompressor::new(200, 70).recompress(&data).unwrap();
        assert_eq!((out.width, out.height), (150, 200));
    }

    #[test]
    fn test_upright_exif_orientation_keeps_dimensions() {
        let data = with_exif_orientation(jpeg_bytes(40, 20), 1);
        let out = Recompressor::default().recompress(&data).unwrap();
        assert_eq!((out.width, out.height), (40, 20));
    }

    #[test]
    fn test_recompress_outputs_jpeg_with_bounded_size() {
        let recompressor = Recompressor::new(64, 70);
        let out = recompressor.recompress(&png_bytes(200, 100)).unwrap();

        assert_eq!((out.width, out.height), (64, 32));
        assert_eq!(image::guess_format(&out.data).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_recompress_keeps_small_image_dimensions() {
        let recompressor = Recompressor::default();
        let out = recompressor.recompress(&png_bytes(50, 40)).unwrap();
        assert_eq!((out.width, out.height), (50, 40));
    }

    #[test]
    fn test_recompress_flattens_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, image::Rgba([0, 0, 0, 0])));
        let recompressor = Recompressor::default();
        let jpeg = recompressor.encode_jpeg(&img).unwrap();
        assert!(!jpeg.is_empty());
    }

    #[test]
    fn test_recompress_rejects_garbage() {
        let recompressor = Recompressor::default();
        let result = recompressor.recompress(b"definitely not an image");
        assert!(matches!(result, Err(CompressionError::Decode(_))));
    }

    #[test]
    fn test_recompress_rejects_truncated_png() {
        let mut data = png_bytes(32, 32);
        data.truncate(data.len() / 2);
        let result = Recompressor::default().recompress(&data);
        assert!(matches!(result, Err(CompressionError::Decode(_))));
    }

    #[test]
    fn test_quality_is_clamped() {
        assert_eq!(Recompressor::new(10, 0).quality(), 1);
        assert_eq!(Recompressor::new(10, 250).quality(), 100);
    }
}
