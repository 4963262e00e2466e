//! Decode, resize, crop and re-encode — the per-variant transform.
//!
//! The upload is decoded exactly once into a [`SourceImage`]; every
//! variant is derived from that shared, read-only decode. Each step
//! returns a fresh image value, so deriving one variant can never
//! disturb another.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, TIFF, WebP) | `image::load_from_memory_with_format` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Centered crop | `DynamicImage::crop_imm` |
//! | Encode (JPEG) | `image::codecs::jpeg::JpegEncoder` with quality |
//! | Encode (others) | `DynamicImage::write_to` |

use super::geometry::{GeometryError, cover_box, fit_within};
use super::params::{Quality, RESAMPLE_FILTER, ResizePolicy, VariantSpec};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Malformed or unsupported input bytes. Raised at decode, before any
    /// variant work or blob write happens.
    #[error("invalid image: {0}")]
    InvalidImage(String),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("encoding to {format:?} failed: {message}")]
    Encode {
        format: ImageFormat,
        message: String,
    },
}

/// One decoded upload, shared read-only by every variant derivation.
///
/// Remembers the original encoding so variants are written back in the
/// same format the upload arrived in.
pub struct SourceImage {
    image: DynamicImage,
    format: ImageFormat,
}

impl SourceImage {
    /// Decode raw upload bytes in the format implied by the filename.
    ///
    /// An empty or corrupt buffer fails here with
    /// [`PipelineError::InvalidImage`], never a generic I/O error.
    pub fn decode(bytes: &[u8], format: ImageFormat) -> Result<Self, PipelineError> {
        let image = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| PipelineError::InvalidImage(e.to_string()))?;
        Ok(Self { image, format })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }
}

/// Encoded output of one variant derivation.
#[derive(Debug, Clone)]
pub struct EncodedVariant {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Derive a single variant: geometry, resize, optional centered crop,
/// re-encode to the source's format.
pub fn produce_variant(
    source: &SourceImage,
    spec: &VariantSpec,
    quality: Quality,
) -> Result<EncodedVariant, PipelineError> {
    let target = match spec.policy {
        ResizePolicy::Fit => fit_within(
            spec.target.width,
            spec.target.height,
            source.width(),
            source.height(),
        )?,
        ResizePolicy::CoverCrop => cover_box(
            spec.target.width,
            spec.target.height,
            source.width(),
            source.height(),
        )?,
    };

    let (width, height) = target.to_pixels();
    let resized = source.image.resize_exact(width, height, RESAMPLE_FILTER);

    let finished = match spec.policy {
        ResizePolicy::Fit => resized,
        ResizePolicy::CoverCrop => {
            // Rounding can undershoot the box by a pixel; clamp the crop
            // window so it always stays inside the resized image.
            let crop_w = spec.target.width.min(width);
            let crop_h = spec.target.height.min(height);
            let x = (width - crop_w) / 2;
            let y = (height - crop_h) / 2;
            resized.crop_imm(x, y, crop_w, crop_h)
        }
    };

    let bytes = encode(&finished, source.format, quality)?;
    Ok(EncodedVariant {
        bytes,
        width: finished.width(),
        height: finished.height(),
    })
}

/// Encode an image into an in-memory buffer in the given format.
fn encode(
    img: &DynamicImage,
    format: ImageFormat,
    quality: Quality,
) -> Result<Vec<u8>, PipelineError> {
    let mut buf = Cursor::new(Vec::new());
    let result = match format {
        ImageFormat::Jpeg => {
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.value() as u8);
            img.write_with_encoder(encoder)
        }
        other => img.write_to(&mut buf, other),
    };
    result.map_err(|e| PipelineError::Encode {
        format,
        message: e.to_string(),
    })?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::{TargetBox, VARIANT_LADDER, VariantLabel};
    use crate::test_helpers::{synthetic_jpeg, synthetic_png};

    fn spec(label: VariantLabel, width: u32, height: u32, policy: ResizePolicy) -> VariantSpec {
        VariantSpec {
            label,
            target: TargetBox { width, height },
            policy,
        }
    }

    // =========================================================================
    // Decode
    // =========================================================================

    #[test]
    fn decode_valid_png() {
        let source = SourceImage::decode(&synthetic_png(320, 240), ImageFormat::Png).unwrap();
        assert_eq!(source.width(), 320);
        assert_eq!(source.height(), 240);
        assert_eq!(source.format(), ImageFormat::Png);
    }

    #[test]
    fn decode_corrupt_bytes_is_invalid_image() {
        let result = SourceImage::decode(b"definitely not a picture", ImageFormat::Png);
        assert!(matches!(result, Err(PipelineError::InvalidImage(_))));
    }

    #[test]
    fn decode_empty_buffer_is_invalid_image() {
        let result = SourceImage::decode(&[], ImageFormat::Jpeg);
        assert!(matches!(result, Err(PipelineError::InvalidImage(_))));
    }

    #[test]
    fn decode_wrong_format_is_invalid_image() {
        // PNG bytes announced as JPEG must not decode
        let result = SourceImage::decode(&synthetic_png(10, 10), ImageFormat::Jpeg);
        assert!(matches!(result, Err(PipelineError::InvalidImage(_))));
    }

    // =========================================================================
    // Fit variants
    // =========================================================================

    #[test]
    fn fit_variant_has_computed_dimensions() {
        let source = SourceImage::decode(&synthetic_png(2000, 1000), ImageFormat::Png).unwrap();
        let variant = produce_variant(
            &source,
            &spec(VariantLabel::Large, 1024, 768, ResizePolicy::Fit),
            Quality::default(),
        )
        .unwrap();

        assert_eq!((variant.width, variant.height), (1024, 512));
        assert!(!variant.bytes.is_empty());
    }

    #[test]
    fn fit_variant_reencodes_in_source_format() {
        let source = SourceImage::decode(&synthetic_png(800, 600), ImageFormat::Png).unwrap();
        let variant = produce_variant(
            &source,
            &spec(VariantLabel::Medium, 640, 480, ResizePolicy::Fit),
            Quality::default(),
        )
        .unwrap();

        let decoded =
            image::load_from_memory_with_format(&variant.bytes, ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (640, 480));
    }

    #[test]
    fn jpeg_source_yields_jpeg_variant() {
        let source = SourceImage::decode(&synthetic_jpeg(800, 600), ImageFormat::Jpeg).unwrap();
        let variant = produce_variant(
            &source,
            &spec(VariantLabel::Medium, 640, 480, ResizePolicy::Fit),
            Quality::new(85),
        )
        .unwrap();

        assert_eq!(image::guess_format(&variant.bytes).unwrap(), ImageFormat::Jpeg);
    }

    // =========================================================================
    // Cover-crop variants
    // =========================================================================

    #[test]
    fn cover_crop_yields_exact_box() {
        let source = SourceImage::decode(&synthetic_png(2000, 1000), ImageFormat::Png).unwrap();
        let variant = produce_variant(
            &source,
            &spec(VariantLabel::Square, 150, 150, ResizePolicy::CoverCrop),
            Quality::default(),
        )
        .unwrap();

        assert_eq!((variant.width, variant.height), (150, 150));
    }

    #[test]
    fn cover_crop_upscales_small_source() {
        // 100x100 into a 150x150 box: isotropic upscale, crop is a no-op
        let source = SourceImage::decode(&synthetic_png(100, 100), ImageFormat::Png).unwrap();
        let variant = produce_variant(
            &source,
            &spec(VariantLabel::Square, 150, 150, ResizePolicy::CoverCrop),
            Quality::default(),
        )
        .unwrap();

        assert_eq!((variant.width, variant.height), (150, 150));
    }

    #[test]
    fn ladder_areas_are_non_increasing() {
        let source = SourceImage::decode(&synthetic_png(2000, 1500), ImageFormat::Png).unwrap();
        let areas: Vec<u64> = VARIANT_LADDER
            .iter()
            .map(|spec| {
                let v = produce_variant(&source, spec, Quality::default()).unwrap();
                u64::from(v.width) * u64::from(v.height)
            })
            .collect();
        assert!(areas.windows(2).all(|w| w[0] >= w[1]), "areas grew: {areas:?}");
    }
}
