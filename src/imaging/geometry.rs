//! Pure target-size math for the two resize policies.
//!
//! All functions here are pure and testable without any I/O or images.
//! Results are real-valued; callers round at the last possible moment so
//! repeated derivations stay deterministic.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("degenerate source dimensions: {width}x{height}")]
    DegenerateSource { width: u32, height: u32 },
    #[error("target box must have positive dimensions: {width}x{height}")]
    EmptyBox { width: u32, height: u32 },
}

/// Real-valued target dimensions produced by the calculators below.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSize {
    pub width: f64,
    pub height: f64,
}

impl TargetSize {
    /// Round to whole pixels for the resampler. Never rounds to zero.
    pub fn to_pixels(self) -> (u32, u32) {
        (
            self.width.round().max(1.0) as u32,
            self.height.round().max(1.0) as u32,
        )
    }
}

fn check_dimensions(
    box_width: u32,
    box_height: u32,
    source_width: u32,
    source_height: u32,
) -> Result<(), GeometryError> {
    if box_width == 0 || box_height == 0 {
        return Err(GeometryError::EmptyBox {
            width: box_width,
            height: box_height,
        });
    }
    if source_width == 0 || source_height == 0 {
        return Err(GeometryError::DegenerateSource {
            width: source_width,
            height: source_height,
        });
    }
    Ok(())
}

/// Largest size that fits entirely inside the box, aspect ratio preserved.
///
/// One dimension always matches the box exactly; the other is derived from
/// the source aspect ratio and never exceeds the box ("contain" semantics).
///
/// # Examples
/// ```
/// # use picture_mill::imaging::geometry::fit_within;
/// // 2000x1000 into 1024x768: width pins to 1024, height derives to 512
/// let size = fit_within(1024, 768, 2000, 1000).unwrap();
/// assert_eq!(size.to_pixels(), (1024, 512));
/// ```
pub fn fit_within(
    box_width: u32,
    box_height: u32,
    source_width: u32,
    source_height: u32,
) -> Result<TargetSize, GeometryError> {
    check_dimensions(box_width, box_height, source_width, source_height)?;

    let box_aspect = box_height as f64 / box_width as f64;
    let source_aspect = source_height as f64 / source_width as f64;

    // Box taller than source: width is the constraint, otherwise height is.
    if box_aspect > source_aspect {
        let width = box_width as f64;
        Ok(TargetSize {
            width,
            height: width / source_width as f64 * source_height as f64,
        })
    } else {
        let height = box_height as f64;
        Ok(TargetSize {
            width: height / source_height as f64 * source_width as f64,
            height,
        })
    }
}

/// Smallest size that fully covers the box, aspect ratio preserved.
///
/// Both dimensions end up >= the box, so a subsequent centered crop to
/// exactly the box discards only excess and never needs padding. The
/// branch selection is the complement of [`fit_within`].
///
/// # Examples
/// ```
/// # use picture_mill::imaging::geometry::cover_box;
/// // 100x100 into a 150x150 box: isotropic upscale, crop is a no-op
/// let size = cover_box(150, 150, 100, 100).unwrap();
/// assert_eq!(size.to_pixels(), (150, 150));
/// ```
pub fn cover_box(
    box_width: u32,
    box_height: u32,
    source_width: u32,
    source_height: u32,
) -> Result<TargetSize, GeometryError> {
    check_dimensions(box_width, box_height, source_width, source_height)?;

    let box_aspect = box_height as f64 / box_width as f64;
    let source_aspect = source_height as f64 / source_width as f64;

    if box_aspect < source_aspect {
        let width = box_width as f64;
        Ok(TargetSize {
            width,
            height: width / source_width as f64 * source_height as f64,
        })
    } else {
        let height = box_height as f64;
        Ok(TargetSize {
            width: height / source_height as f64 * source_width as f64,
            height,
        })
    }
}
