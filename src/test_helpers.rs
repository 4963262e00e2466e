//! Shared test utilities: synthetic in-memory images.

use image::{ExtendedColorType, ImageEncoder, RgbImage};

/// Encode a small gradient PNG with the given dimensions.
pub fn synthetic_png(width: u32, height: u32) -> Vec<u8> {
    let img = test_pattern(width, height);
    let mut buf = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// Encode a small gradient JPEG with the given dimensions.
pub fn synthetic_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = test_pattern(width, height);
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

fn test_pattern(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}
