//! Image inspection utilities for testing.
//!
//! This module provides helper functions for checking rendered output files.

use image::{DynamicImage, GenericImageView, ImageError, ImageFormat, Rgba};
use rplot::layout::PixelRect;
use std::collections::HashMap;
use std::path::Path;

/// Load an image from a file
pub fn load_image(path: &Path) -> Result<DynamicImage, ImageError> {
    image::open(path)
}

/// Detect image format from bytes
pub fn detect_image_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok()
}

/// Check if an image has the expected dimensions
pub fn assert_image_dimensions(
    image: &DynamicImage,
    expected_width: u32,
    expected_height: u32,
) -> Result<(), String> {
    let (actual_width, actual_height) = image.dimensions();

    if actual_width != expected_width || actual_height != expected_height {
        return Err(format!(
            "Image dimensions differ: actual = {}x{}, expected = {}x{}",
            actual_width, actual_height, expected_width, expected_height
        ));
    }

    Ok(())
}

/// Check if a file starts with the signature of the expected format
pub fn assert_file_format(path: &Path, expected_format: ImageFormat) -> Result<(), String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    let actual_format =
        detect_image_format(&bytes).ok_or_else(|| "Could not detect image format".to_string())?;

    if actual_format != expected_format {
        return Err(format!(
            "Image format differs: actual = {:?}, expected = {:?}",
            actual_format, expected_format
        ));
    }

    Ok(())
}

/// Count pixels for which `predicate` holds
pub fn count_pixels(image: &DynamicImage, predicate: impl Fn(Rgba<u8>) -> bool) -> usize {
    image.pixels().filter(|(_, _, p)| predicate(*p)).count()
}

/// Pixels of `rect` shrunk by `inset` on every side, row by row
pub fn interior_pixels(image: &DynamicImage, rect: PixelRect, inset: u32) -> Vec<Rgba<u8>> {
    let x0 = rect.x.max(0) as u32 + inset;
    let y0 = rect.y.max(0) as u32 + inset;
    let x1 = (rect.right().max(0) as u32).saturating_sub(inset);
    let y1 = (rect.bottom().max(0) as u32).saturating_sub(inset);

    let mut pixels = Vec::new();
    for y in y0..y1.min(image.height()) {
        for x in x0..x1.min(image.width()) {
            pixels.push(image.get_pixel(x, y));
        }
    }
    pixels
}

/// Most frequent pixel value
pub fn dominant_pixel(pixels: &[Rgba<u8>]) -> Option<Rgba<u8>> {
    let mut counts: HashMap<[u8; 4], usize> = HashMap::new();
    for p in pixels {
        *counts.entry(p.0).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by_key(|(_, n)| *n)
        .map(|(value, _)| Rgba(value))
}

/// Sum of the colour channels
pub fn brightness(pixel: Rgba<u8>) -> u32 {
    pixel.0[..3].iter().map(|&c| c as u32).sum()
}

/// Strongly saturated pixel with the given dominant channel (0 = red, 2 = blue)
pub fn is_dominant(pixel: Rgba<u8>, channel: usize) -> bool {
    let c = pixel.0;
    (0..3)
        .filter(|&i| i != channel)
        .all(|i| c[channel] as i16 - c[i] as i16 > 100)
}

/// Pixel whose channels are equal within a small tolerance
pub fn is_gray(pixel: Rgba<u8>) -> bool {
    let [r, g, b, _] = pixel.0;
    let max = r.max(g).max(b) as i16;
    let min = r.min(g).min(b) as i16;
    max - min <= 12
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageBuffer;

    #[test]
    fn test_interior_pixels_and_dominant() {
        let mut img = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_pixel(10, 10, Rgba([5, 5, 5, 255]));
        img.put_pixel(4, 4, Rgba([200, 0, 0, 255]));
        let img = DynamicImage::ImageRgba8(img);
        let rect = PixelRect {
            x: 2,
            y: 2,
            width: 6,
            height: 6,
        };

        let pixels = interior_pixels(&img, rect, 1);
        assert_eq!(pixels.len(), 16);
        assert_eq!(dominant_pixel(&pixels), Some(Rgba([5, 5, 5, 255])));
        assert_eq!(brightness(Rgba([200, 0, 0, 255])), 200);
        assert_eq!(dominant_pixel(&[]), None);
    }

    #[test]
    fn test_detect_image_format() {
        let img = ImageBuffer::<Rgba<u8>, Vec<u8>>::new(2, 2);
        let mut png_bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
            .unwrap();

        assert_eq!(detect_image_format(&png_bytes), Some(ImageFormat::Png));
    }

    #[test]
    fn test_assert_image_dimensions() {
        let img = DynamicImage::new_rgb8(10, 20);

        assert!(assert_image_dimensions(&img, 10, 20).is_ok());
        assert!(assert_image_dimensions(&img, 11, 20).is_err());
        assert!(assert_image_dimensions(&img, 10, 21).is_err());
    }

    #[test]
    fn test_pixel_predicates() {
        assert!(is_dominant(Rgba([250, 10, 10, 255]), 0));
        assert!(!is_dominant(Rgba([250, 200, 10, 255]), 0));
        assert!(is_dominant(Rgba([0, 0, 255, 255]), 2));
        assert!(is_gray(Rgba([128, 130, 125, 255])));
        assert!(!is_gray(Rgba([0, 0, 255, 255])));
    }
}
