//! Ingestion orchestrator: one upload in, one committed picture out.
//!
//! [`ingest`] decodes the upload once, derives the three ladder variants
//! strictly in order, writes each to the blob store, and saves the
//! record only after the whole ladder succeeded. Any failure aborts the
//! rest of the run immediately; nothing is retried and no partial record
//! is ever persisted.
//!
//! Blobs written before a failing step are *not* rolled back — their ids
//! are logged at `warn` for offline cleanup. This mirrors the historical
//! behavior of the system this replaces; compensating deletes would be a
//! behavioral change and are left to embedders who want the stronger
//! guarantee.
//!
//! [`remove`] is the inverse flow: delete every manifest blob, then the
//! record. A failed blob delete aborts the removal so the record never
//! ends up pointing at missing blobs.

use crate::imaging::{
    GeometryError, PipelineError, Quality, SourceImage, VARIANT_LADDER, VariantSpec,
    produce_variant,
};
use crate::naming::{UploadName, parse_upload_name, variant_file_name};
use crate::store::{
    BlobError, BlobId, BlobMeta, BlobStore, PictureId, PictureRecord, RecordError, RecordStore,
    SizeEntry, StoredBlob,
};
use image::ImageFormat;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum IngestError {
    /// Upload could not be decoded: corrupt bytes, unsupported or
    /// missing extension.
    #[error("invalid image: {0}")]
    InvalidImage(String),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("encoding failed: {0}")]
    Encode(String),
    #[error("blob write failed: {0}")]
    BlobWrite(#[source] BlobError),
    #[error("blob read failed: {0}")]
    BlobRead(#[source] BlobError),
    #[error("blob delete failed: {0}")]
    BlobDelete(#[source] BlobError),
    #[error("record persistence failed: {0}")]
    RecordPersist(#[source] RecordError),
    #[error("picture not found: {0}")]
    PictureNotFound(PictureId),
    #[error("blob not found: {0}")]
    BlobNotFound(BlobId),
}

impl From<PipelineError> for IngestError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidImage(message) => Self::InvalidImage(message),
            PipelineError::Geometry(err) => Self::Geometry(err),
            PipelineError::Encode { .. } => Self::Encode(err.to_string()),
        }
    }
}

/// Error body for the (external) HTTP layer: `{ "message": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub message: String,
}

impl From<&IngestError> for ErrorPayload {
    fn from(err: &IngestError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// One raw upload as handed over by the transport layer.
#[derive(Debug, Clone, Copy)]
pub struct Upload<'a> {
    pub bytes: &'a [u8],
    /// Original filename, extension included.
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub owner_id: &'a str,
}

/// Knobs for the ingestion run. The ladder itself is not configurable.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestConfig {
    pub quality: Quality,
}

/// Public download path served by the routing layer for a variant blob.
pub fn download_path(id: BlobId) -> String {
    format!("api/pictures/download/{id}")
}

/// Ingest one upload: decode, derive the ladder, persist blobs and record.
///
/// On success the returned record is committed to `records` and its
/// manifest holds exactly three entries in `large`, `medium`, `square`
/// order. On failure the triggering error is returned as-is and no
/// record is persisted; see the module docs for the orphaned-blob
/// caveat.
pub fn ingest(
    blobs: &impl BlobStore,
    records: &impl RecordStore,
    upload: Upload<'_>,
    config: &IngestConfig,
) -> Result<PictureRecord, IngestError> {
    let name = parse_upload_name(upload.file_name).ok_or_else(|| {
        IngestError::InvalidImage(format!(
            "cannot determine image format of '{}'",
            upload.file_name
        ))
    })?;
    let format = ImageFormat::from_extension(&name.extension).ok_or_else(|| {
        IngestError::InvalidImage(format!("unsupported image extension '{}'", name.extension))
    })?;

    let source = SourceImage::decode(upload.bytes, format)?;
    debug!(
        file_name = upload.file_name,
        width = source.width(),
        height = source.height(),
        "decoded upload"
    );

    let mut record = PictureRecord::new(upload.owner_id, &name.stem);

    for spec in &VARIANT_LADDER {
        match derive_and_store(blobs, &source, spec, &name, upload.content_type, config) {
            Ok(entry) => record.sizes.push(entry),
            Err(err) => {
                log_orphans(&record);
                return Err(err);
            }
        }
    }

    if let Err(err) = records.save(&record) {
        log_orphans(&record);
        return Err(IngestError::RecordPersist(err));
    }
    Ok(record)
}

/// Derive one variant and write it to the blob store, returning its
/// manifest entry. The blob write must complete before the entry exists,
/// so manifest order always matches blob-write order.
fn derive_and_store(
    blobs: &impl BlobStore,
    source: &SourceImage,
    spec: &VariantSpec,
    name: &UploadName,
    content_type: &str,
    config: &IngestConfig,
) -> Result<SizeEntry, IngestError> {
    let variant = produce_variant(source, spec, config.quality)?;
    let meta = BlobMeta {
        file_name: variant_file_name(name, spec.label),
        content_type: content_type.to_string(),
    };
    let blob_id = blobs.put(&meta, &variant.bytes).map_err(IngestError::BlobWrite)?;
    debug!(
        label = %spec.label,
        %blob_id,
        width = variant.width,
        height = variant.height,
        bytes = variant.bytes.len(),
        "stored variant"
    );
    Ok(SizeEntry {
        blob_id,
        label: spec.label,
        download_path: download_path(blob_id),
        width: variant.width,
        height: variant.height,
    })
}

/// Record the blob ids an aborted ingestion leaves behind.
fn log_orphans(record: &PictureRecord) {
    for entry in &record.sizes {
        warn!(
            blob_id = %entry.blob_id,
            label = %entry.label,
            "ingestion aborted; variant blob left orphaned"
        );
    }
}

/// Delete a picture: every manifest blob first, then the record.
///
/// Fails without touching the record if any blob delete fails, so the
/// stored manifest never references missing blobs. Returns the removed
/// record.
pub fn remove(
    blobs: &impl BlobStore,
    records: &impl RecordStore,
    id: PictureId,
) -> Result<PictureRecord, IngestError> {
    let record = records.find(id).map_err(|err| match err {
        RecordError::NotFound(id) => IngestError::PictureNotFound(id),
        other => IngestError::RecordPersist(other),
    })?;

    for entry in &record.sizes {
        blobs.delete(entry.blob_id).map_err(IngestError::BlobDelete)?;
    }

    records.delete(id).map_err(IngestError::RecordPersist)?;
    Ok(record)
}

/// Resolve a blob id to its stored bytes and content type — the data
/// contract behind the download endpoint.
pub fn download(blobs: &impl BlobStore, id: BlobId) -> Result<StoredBlob, IngestError> {
    blobs.get(id).map_err(|err| match err {
        BlobError::NotFound(id) => IngestError::BlobNotFound(id),
        other => IngestError::BlobRead(other),
    })
}
