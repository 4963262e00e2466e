//! Persistence seams: the blob access facade and the record store.
//!
//! Both are traits so the orchestrator can be exercised against the
//! bundled in-memory implementations; production embedders plug in
//! their own backends.

pub mod blob;
pub mod record;

pub use blob::{BlobError, BlobId, BlobMeta, BlobStore, MemoryBlobStore, StoredBlob};
pub use record::{
    MemoryRecordStore, PictureId, PictureRecord, RecordError, RecordStore, SizeEntry,
};
