//! Upload filename parsing and variant naming.
//!
//! Uploads arrive with their original filename. The stem (extension
//! stripped) names the picture record and prefixes every variant blob;
//! the extension selects the codec for decode and re-encode. Variant
//! blobs are named `{stem}_{label}.{ext}`:
//!
//! - `holiday.jpg` → `holiday_large.jpg`, `holiday_medium.jpg`, `holiday_square.jpg`
//! - `my.best.shot.png` → stem `my.best.shot`, extension `png`

use crate::imaging::VariantLabel;

/// Stem and extension of an upload filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadName {
    /// Filename without its final extension.
    pub stem: String,
    /// Final extension, lowercased, without the dot.
    pub extension: String,
}

/// Split an upload filename on its last dot.
///
/// Returns `None` when there is no extension or no stem (`"photo"`,
/// `".png"`, `"photo."`) — such uploads cannot name their codec.
pub fn parse_upload_name(file_name: &str) -> Option<UploadName> {
    let dot = file_name.rfind('.')?;
    let (stem, ext) = file_name.split_at(dot);
    let ext = &ext[1..];
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(UploadName {
        stem: stem.to_string(),
        extension: ext.to_lowercase(),
    })
}

/// Blob filename for one variant: `{stem}_{label}.{ext}`.
pub fn variant_file_name(name: &UploadName, label: VariantLabel) -> String {
    format!("{}_{}.{}", name.stem, label, name.extension)
}
