//! Decoding of stored and freshly picked images for display.
//!
//! Decoding is blocking and runs on rayon workers; only the final conversion
//! to `slint::Image` happens on the UI thread.

use crate::error::{AppError, Result};
use crate::file_utils;
use crate::image_cache::CachedImage;
use image::DynamicImage;
use slint::{Image, Rgb8Pixel, SharedPixelBuffer};
use std::path::Path;

/// Longest edge of a decoded gallery image.
const MAX_DISPLAY_EDGE: u32 = 720;

fn into_cached(image: DynamicImage) -> CachedImage {
    let image = if image.width() > MAX_DISPLAY_EDGE || image.height() > MAX_DISPLAY_EDGE {
        image.thumbnail(MAX_DISPLAY_EDGE, MAX_DISPLAY_EDGE)
    } else {
        image
    };
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    CachedImage::new(rgb.into_raw(), width, height)
}

/// Decodes an in-memory image (e.g. a file picked for upload).
pub fn decode_blocking(bytes: &[u8]) -> Result<CachedImage> {
    Ok(into_cached(image::load_from_memory(bytes)?))
}

/// Loads and decodes an image file.
pub fn load_image_blocking(path: &Path) -> Result<CachedImage> {
    let image = image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?;
    Ok(into_cached(image))
}

/// Loads the image behind a stored item's reference.
pub fn load_reference_blocking(url: &str) -> Result<CachedImage> {
    let path = file_utils::url_to_path(url)
        .ok_or_else(|| AppError::ImageLoad(format!("Unsupported image reference: {}", url)))?;
    load_image_blocking(&path)
}

/// Converts RGB8 pixel data into a Slint image. Must run on the UI thread.
pub fn create_slint_image(cached: &CachedImage) -> Image {
    let buffer = SharedPixelBuffer::<Rgb8Pixel>::clone_from_slice(
        &cached.data,
        cached.width,
        cached.height,
    );
    Image::from_rgb8(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        RgbImage::new(width, height)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decodes_small_images_as_is() {
        let cached = decode_blocking(&png_bytes(3, 2)).unwrap();
        assert_eq!((cached.width, cached.height), (3, 2));
        assert_eq!(cached.data.len(), 3 * 2 * 3);
    }

    #[test]
    fn large_images_are_scaled_down() {
        let cached = decode_blocking(&png_bytes(2048, 1024)).unwrap();
        assert_eq!((cached.width, cached.height), (720, 360));
    }

    #[test]
    fn garbage_is_an_image_error() {
        assert!(matches!(decode_blocking(b"nope"), Err(AppError::ImageLoad(_))));
    }

    #[test]
    fn non_file_references_are_rejected() {
        assert!(matches!(
            load_reference_blocking("https://example.com/a.png"),
            Err(AppError::ImageLoad(_))
        ));
    }
}
