//! Parameter types for the variant pipeline.
//!
//! These structs describe *what* to derive, not *how*. The three-tier
//! ladder in [`VARIANT_LADDER`] is fixed: every ingested picture gets a
//! `large` and `medium` fit-resize plus a `square` cover-crop, in that
//! order, and the manifest on the stored record mirrors that order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resampling filter used for every resize. Affects visual quality only.
pub const RESAMPLE_FILTER: image::imageops::FilterType = image::imageops::FilterType::Lanczos3;

/// Quality setting for lossy re-encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Size label attached to each derived variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantLabel {
    Large,
    Medium,
    Square,
}

impl VariantLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Large => "large",
            Self::Medium => "medium",
            Self::Square => "square",
        }
    }
}

impl fmt::Display for VariantLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a variant relates to its target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePolicy {
    /// Largest size fully inside the box ("contain").
    Fit,
    /// Smallest size covering the box, then a centered crop to exactly it.
    CoverCrop,
}

/// Bounding box a variant is derived against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetBox {
    pub width: u32,
    pub height: u32,
}

/// Full description of one variant to derive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantSpec {
    pub label: VariantLabel,
    pub target: TargetBox,
    pub policy: ResizePolicy,
}

/// The fixed derivation ladder, in processing (and manifest) order.
pub const VARIANT_LADDER: [VariantSpec; 3] = [
    VariantSpec {
        label: VariantLabel::Large,
        target: TargetBox {
            width: 1024,
            height: 768,
        },
        policy: ResizePolicy::Fit,
    },
    VariantSpec {
        label: VariantLabel::Medium,
        target: TargetBox {
            width: 640,
            height: 480,
        },
        policy: ResizePolicy::Fit,
    },
    VariantSpec {
        label: VariantLabel::Square,
        target: TargetBox {
            width: 150,
            height: 150,
        },
        policy: ResizePolicy::CoverCrop,
    },
];
