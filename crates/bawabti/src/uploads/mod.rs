//! Validation, naming and storage of user-submitted files.
//!
//! Every artifact flows through the same three steps: [`UploadPolicy::check`] rejects
//! disallowed extensions and oversized payloads, [`storage_name`] derives the on-disk
//! name from the kind, the upload second and the sanitized filename, and
//! [`MediaStore::persist`] writes the bytes and returns the public `/uploads/...` path.

mod kind;
mod naming;
mod pipeline;
mod policy;
mod store;

pub use kind::ArtifactKind;
pub use naming::{sanitize_filename, storage_name, Clock, FixedClock, SystemClock};
pub use pipeline::{UploadPipeline, ValidatedUpload};
pub use policy::{UploadLimits, UploadPolicy, UploadRejection};
pub use store::{MediaStore, StorageError, StoredArtifact};

/// A file pulled out of a multipart request, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
