//! Image file boundary
//!
//! Decoding is delegated to the `image` crate. Only 4-channel, 8-bit images are
//! accepted; anything else is rejected here rather than converted.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageError, ImageFormat, RgbaImage};

use crate::error::{RasterError, Result};
use crate::rasterizer::{Color, ImageBuffer};

/// Load an RGBA8 image from disk
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<ImageBuffer> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let buffer = decode_image(&bytes)?;
    log::info!(
        "Loaded image {} ({}x{})",
        path.display(),
        buffer.width(),
        buffer.height()
    );
    Ok(buffer)
}

/// Decode an in-memory image file
pub fn decode_image(bytes: &[u8]) -> Result<ImageBuffer> {
    if image::guess_format(bytes).ok() == Some(ImageFormat::Png) {
        check_png_header(bytes)?;
    }
    let img = image::load_from_memory(bytes).map_err(image_error)?;

    let rgba = match img {
        DynamicImage::ImageRgba8(rgba) => rgba,
        other => {
            return Err(RasterError::UnsupportedFormat(format!(
                "expected 8-bit RGBA, got {:?}",
                other.color()
            )))
        }
    };

    let (width, height) = rgba.dimensions();
    let pixels: Vec<Color> = rgba.pixels().map(|p| Color::from_bytes(p.0)).collect();

    ImageBuffer::from_pixels(width as usize, height as usize, pixels)
}

/// Write a buffer as an RGBA8 PNG
pub fn save_png<P: AsRef<Path>>(buffer: &ImageBuffer, path: P) -> Result<()> {
    let path = path.as_ref();
    let (width, height) = match (u32::try_from(buffer.width()), u32::try_from(buffer.height())) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(RasterError::InvalidDimensions {
                width: buffer.width(),
                height: buffer.height(),
            })
        }
    };

    let img = RgbaImage::from_raw(width, height, buffer.to_rgba_bytes()).ok_or(
        RasterError::InvalidDimensions {
            width: buffer.width(),
            height: buffer.height(),
        },
    )?;
    img.save_with_format(path, ImageFormat::Png)
        .map_err(image_error)?;

    log::info!("Wrote {}x{} PNG to {}", width, height, path.display());
    Ok(())
}

/// The PNG decoder expands palettes (with tRNS) straight to RGBA8, so the stored
/// color type has to be read from the header
fn check_png_header(bytes: &[u8]) -> Result<()> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    let info = decoder
        .read_header_info()
        .map_err(|e| RasterError::UnsupportedFormat(e.to_string()))?;

    match (info.color_type, info.bit_depth) {
        (png::ColorType::Rgba, png::BitDepth::Eight) => Ok(()),
        (color, depth) => Err(RasterError::UnsupportedFormat(format!(
            "expected 8-bit RGBA PNG, got {:?} at {:?}",
            color, depth
        ))),
    }
}

fn image_error(e: ImageError) -> RasterError {
    match e {
        ImageError::IoError(io) => RasterError::IoFailure(io),
        other => RasterError::UnsupportedFormat(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_png(img: impl Into<DynamicImage>) -> Vec<u8> {
        let img: DynamicImage = img.into();
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_rgba8_keeps_channel_order() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgba([10, 20, 30, 40]));
        let buffer = decode_image(&encode_png(img)).unwrap();

        assert_eq!((buffer.width(), buffer.height()), (3, 2));
        let c = buffer.get(2, 1).unwrap();
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (10, 20, 30, 40));
        assert_eq!(buffer.get(0, 0).unwrap(), Color::TRANSPARENT);
    }

    #[test]
    fn test_rejects_three_channel_image() {
        let img = image::RgbImage::new(2, 2);
        let err = decode_image(&encode_png(img)).unwrap_err();
        assert!(matches!(err, RasterError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_rejects_sixteen_bit_image() {
        let img: image::ImageBuffer<image::Rgba<u16>, Vec<u16>> = image::ImageBuffer::new(2, 2);
        let err = decode_image(&encode_png(img)).unwrap_err();
        assert!(matches!(err, RasterError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_rejects_palette_image_with_transparency() {
        let mut bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, 2, 1);
            encoder.set_color(png::ColorType::Indexed);
            encoder.set_depth(png::BitDepth::Eight);
            encoder.set_palette(vec![255, 0, 0, 0, 0, 255]);
            encoder.set_trns(vec![128, 255]);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[0, 1]).unwrap();
            writer.finish().unwrap();
        }

        // image on its own hands this back as RGBA8
        assert!(matches!(
            image::load_from_memory(&bytes).unwrap(),
            DynamicImage::ImageRgba8(_)
        ));
        let err = decode_image(&bytes).unwrap_err();
        assert!(matches!(err, RasterError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_rejects_garbage() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, RasterError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file_is_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, RasterError::IoFailure(_)));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");

        let mut fb = ImageBuffer::allocate(5, 4).unwrap();
        fb.fill_rect(1, 1, 2, 2, Color::with_alpha(200, 100, 50, 255));
        save_png(&fb, &path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded, fb);
    }
}
