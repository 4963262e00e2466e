//! Picture records and the record store seam.
//!
//! A [`PictureRecord`] is built in memory while variants are derived and
//! persisted exactly once, after the whole ladder succeeds. The manifest
//! (`sizes`) is ordered: `large`, `medium`, `square`, with non-increasing
//! pixel area. [`RecordStore::save`] enforces that shape, so a partially
//! ingested record can never be committed.

use crate::imaging::VariantLabel;
use crate::store::blob::BlobId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use thiserror::Error;
use uuid::Uuid;

/// Identifier of one picture record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PictureId(Uuid);

impl PictureId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PictureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for PictureId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s).map(Self)
    }
}

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("picture not found: {0}")]
    NotFound(PictureId),
    #[error("record validation failed: {0}")]
    Validation(String),
    #[error("record store failure: {0}")]
    Storage(String),
}

/// One entry of a picture's size manifest, appended per derived variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeEntry {
    pub blob_id: BlobId,
    pub label: VariantLabel,
    /// Public path the routing layer serves this variant under.
    pub download_path: String,
    pub width: u32,
    pub height: u32,
}

impl SizeEntry {
    fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// A picture and its derived-variant manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureRecord {
    pub id: PictureId,
    pub owner_id: String,
    /// Upload filename with the extension stripped.
    pub file_name: String,
    /// Manifest in processing order: `large`, `medium`, `square`.
    pub sizes: Vec<SizeEntry>,
    pub created: DateTime<Utc>,
}

impl PictureRecord {
    /// A fresh pending record with an empty manifest.
    pub fn new(owner_id: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            id: PictureId::generate(),
            owner_id: owner_id.into(),
            file_name: file_name.into(),
            sizes: Vec::new(),
            created: Utc::now(),
        }
    }

    /// Check the manifest invariant: empty, or exactly the three labels
    /// in ladder order with non-increasing pixel area. A violation means
    /// a partial ingestion leaked into a save.
    pub fn validate_sizes(&self) -> Result<(), RecordError> {
        if self.sizes.is_empty() {
            return Ok(());
        }

        let labels: Vec<VariantLabel> = self.sizes.iter().map(|s| s.label).collect();
        let expected = [
            VariantLabel::Large,
            VariantLabel::Medium,
            VariantLabel::Square,
        ];
        if labels != expected {
            return Err(RecordError::Validation(format!(
                "manifest labels must be {expected:?} in order, got {labels:?}"
            )));
        }

        let areas: Vec<u64> = self.sizes.iter().map(SizeEntry::area).collect();
        if !areas.windows(2).all(|w| w[0] >= w[1]) {
            return Err(RecordError::Validation(format!(
                "manifest areas must be non-increasing, got {areas:?}"
            )));
        }
        Ok(())
    }
}

/// Durable record storage consumed by the ingestion pipeline.
///
/// `save` is called once per ingestion, at commit; `find` and `delete`
/// serve the removal flow.
pub trait RecordStore: Send + Sync {
    fn save(&self, record: &PictureRecord) -> Result<(), RecordError>;
    fn find(&self, id: PictureId) -> Result<PictureRecord, RecordError>;
    fn delete(&self, id: PictureId) -> Result<(), RecordError>;
}

/// In-memory [`RecordStore`] with the same validation a durable store
/// would run on save.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<HashMap<PictureId, PictureRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for MemoryRecordStore {
    fn save(&self, record: &PictureRecord) -> Result<(), RecordError> {
        record.validate_sizes()?;
        self.records
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        Ok(())
    }

    fn find(&self, id: PictureId) -> Result<PictureRecord, RecordError> {
        self.records
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(RecordError::NotFound(id))
    }

    fn delete(&self, id: PictureId) -> Result<(), RecordError> {
        self.records
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(RecordError::NotFound(id))
    }
}
