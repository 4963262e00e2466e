//! Blob access facade.
//!
//! The [`BlobStore`] trait is the seam between the ingestion pipeline and
//! whatever actually holds the bytes (GridFS, S3, a local directory). The
//! engine itself is out of scope here; the trait models only what the
//! pipeline needs: write-with-generated-id, read, delete. The store
//! allocates identifiers — callers never pick blob ids.
//!
//! [`MemoryBlobStore`] is a complete in-memory implementation, used both
//! for deterministic tests and for embedding without a storage backend.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use thiserror::Error;
use uuid::Uuid;

/// Store-allocated identifier for one stored blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobId(Uuid);

impl BlobId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for BlobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s).map(Self)
    }
}

#[derive(Error, Debug)]
pub enum BlobError {
    #[error("blob not found: {0}")]
    NotFound(BlobId),
    #[error("blob write failed: {0}")]
    WriteFailed(String),
    #[error("blob delete failed: {0}")]
    DeleteFailed(String),
}

/// Metadata recorded alongside a blob at write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobMeta {
    pub file_name: String,
    pub content_type: String,
}

/// A blob read back out of the store, ready to stream to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Scoped binary storage consumed by the ingestion pipeline.
pub trait BlobStore: Send + Sync {
    /// Write a blob; the store allocates and returns its id. The call
    /// returns only once the underlying storage has acknowledged the
    /// full write.
    fn put(&self, meta: &BlobMeta, bytes: &[u8]) -> Result<BlobId, BlobError>;

    /// Read a blob back with its stored metadata.
    fn get(&self, id: BlobId) -> Result<StoredBlob, BlobError>;

    /// Delete a blob. Deleting an unknown id is an error, not a no-op:
    /// callers use it to detect dangling manifest references.
    fn delete(&self, id: BlobId) -> Result<(), BlobError>;
}

/// In-memory [`BlobStore`]. Uses a Mutex (not RefCell) so shared
/// references stay usable across threads.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<BlobId, StoredBlob>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs currently held.
    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of all stored blobs, in no particular order.
    pub fn ids(&self) -> Vec<BlobId> {
        self.blobs.lock().unwrap().keys().copied().collect()
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, meta: &BlobMeta, bytes: &[u8]) -> Result<BlobId, BlobError> {
        let id = BlobId::generate();
        self.blobs.lock().unwrap().insert(
            id,
            StoredBlob {
                file_name: meta.file_name.clone(),
                content_type: meta.content_type.clone(),
                bytes: bytes.to_vec(),
            },
        );
        Ok(id)
    }

    fn get(&self, id: BlobId) -> Result<StoredBlob, BlobError> {
        self.blobs
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(BlobError::NotFound(id))
    }

    fn delete(&self, id: BlobId) -> Result<(), BlobError> {
        self.blobs
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(BlobError::NotFound(id))
    }
}
