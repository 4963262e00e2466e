//! # Picture Mill
//!
//! Multi-resolution picture ingestion: one uploaded image in, three
//! deterministically derived variants out, each persisted as an
//! independent blob and recorded in an ordered size manifest on the
//! picture record.
//!
//! # The Ladder
//!
//! Every ingested picture gets exactly three variants, derived in a
//! fixed order that the stored manifest mirrors:
//!
//! ```text
//! large    1024x768   fit (contain — whole image visible)
//! medium    640x480   fit
//! square    150x150   cover-crop (fill the box, centered crop)
//! ```
//!
//! Variants are re-encoded in the upload's own format; the pipeline
//! never converts between formats.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Target-size geometry, the variant ladder, decode/resize/crop/encode |
//! | [`store`] | The [`BlobStore`](store::BlobStore) and [`RecordStore`](store::RecordStore) seams plus in-memory implementations |
//! | [`ingest`] | The orchestrator: upload → blobs + committed record; removal and download lookup |
//! | [`naming`] | Upload filename parsing and the `{stem}_{label}.{ext}` blob naming convention |
//!
//! # Design Decisions
//!
//! ## Injected persistence
//!
//! Both persistence seams are traits passed into the orchestrator, not
//! ambient globals. The bundled in-memory implementations make every
//! ingestion path — including simulated storage failure mid-ladder —
//! testable without a running blob engine or database.
//!
//! ## Fail-fast, no rollback
//!
//! Any stage error aborts the remaining pipeline immediately and no
//! partial record is ever committed. Blobs written before the failing
//! step stay behind; their ids are logged at `warn` for offline cleanup.
//! See the [`ingest`] module docs for why that gap is kept rather than
//! papered over.
//!
//! ## Strictly sequential ladder
//!
//! The three variants depend only on the shared decoded source and
//! could be computed in parallel, but blob writes and manifest appends
//! happen in ladder order so manifest indexing stays deterministic.
//! Sequential derivation keeps that property trivially true.
//!
//! # Example
//!
//! ```
//! use picture_mill::ingest::{Upload, IngestConfig, ingest};
//! use picture_mill::store::{MemoryBlobStore, MemoryRecordStore};
//!
//! # fn sample_png() -> Vec<u8> {
//! #     let img = image::RgbImage::from_pixel(400, 300, image::Rgb([10, 20, 30]));
//! #     let mut buf = Vec::new();
//! #     use image::ImageEncoder;
//! #     image::codecs::png::PngEncoder::new(&mut buf)
//! #         .write_image(img.as_raw(), 400, 300, image::ExtendedColorType::Rgb8)
//! #         .unwrap();
//! #     buf
//! # }
//! let blobs = MemoryBlobStore::new();
//! let records = MemoryRecordStore::new();
//! let png = sample_png();
//!
//! let record = ingest(
//!     &blobs,
//!     &records,
//!     Upload {
//!         bytes: &png,
//!         file_name: "holiday.png",
//!         content_type: "image/png",
//!         owner_id: "user-1",
//!     },
//!     &IngestConfig::default(),
//! )?;
//!
//! assert_eq!(record.sizes.len(), 3);
//! # Ok::<(), picture_mill::ingest::IngestError>(())
//! ```

pub mod imaging;
pub mod ingest;
pub mod naming;
pub mod store;

#[cfg(test)]
pub(crate) mod test_helpers;
