//! Image derivation — pure Rust, in-memory, no temp files.
//!
//! The module is split into:
//! - **Geometry**: pure functions for target-size math (unit testable)
//! - **Parameters**: the fixed variant ladder and encoding knobs
//! - **Pipeline**: decode / resize / crop / encode over the `image` crate

pub mod geometry;
pub mod params;
pub mod pipeline;

pub use geometry::{GeometryError, TargetSize, cover_box, fit_within};
pub use params::{
    Quality, ResizePolicy, TargetBox, VARIANT_LADDER, VariantLabel, VariantSpec,
};
pub use pipeline::{EncodedVariant, PipelineError, SourceImage, produce_variant};
