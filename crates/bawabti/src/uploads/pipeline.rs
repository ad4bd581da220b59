use std::sync::Arc;

use super::kind::ArtifactKind;
use super::naming::{sanitize_filename, Clock, SystemClock};
use super::policy::{UploadPolicy, UploadRejection};
use super::store::{MediaStore, StorageError, StoredArtifact};
use super::UploadedFile;

/// An upload that passed the policy and is ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    pub kind: ArtifactKind,
    pub sanitized_filename: String,
    pub bytes: Vec<u8>,
}

/// Validator, namer and persister wired together around one upload root.
#[derive(Clone)]
pub struct UploadPipeline {
    policy: UploadPolicy,
    store: MediaStore,
    clock: Arc<dyn Clock>,
}

impl UploadPipeline {
    pub fn new(policy: UploadPolicy, store: MediaStore) -> Self {
        Self {
            policy,
            store,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    pub fn store(&self) -> &MediaStore {
        &self.store
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Sanitize the client filename and check it against the kind's policy. Nothing is
    /// written.
    pub fn validate(
        &self,
        kind: ArtifactKind,
        file: UploadedFile,
    ) -> Result<ValidatedUpload, UploadRejection> {
        let sanitized_filename = sanitize_filename(&file.filename);
        self.policy.check(kind, &sanitized_filename, file.len())?;
        Ok(ValidatedUpload {
            kind,
            sanitized_filename,
            bytes: file.bytes,
        })
    }

    /// Name the upload from the current second and write it to the kind's folder.
    pub fn persist(&self, upload: &ValidatedUpload) -> Result<StoredArtifact, StorageError> {
        self.store.persist(
            upload.kind,
            &upload.sanitized_filename,
            &upload.bytes,
            self.clock.now(),
        )
    }
}

impl std::fmt::Debug for UploadPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadPipeline")
            .field("policy", &self.policy)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uploads::{FixedClock, UploadLimits};
    use chrono::{TimeZone, Utc};

    fn pipeline(root: &std::path::Path) -> UploadPipeline {
        let at = Utc
            .with_ymd_and_hms(2024, 1, 15, 8, 0, 0)
            .single()
            .expect("valid instant");
        UploadPipeline::new(
            UploadPolicy::new(UploadLimits {
                max_resume_bytes: 16,
                max_video_bytes: 32,
                max_logo_bytes: 8,
            }),
            MediaStore::new(root),
        )
        .with_clock(Arc::new(FixedClock(at)))
    }

    #[test]
    fn validation_checks_the_sanitized_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pipeline = pipeline(dir.path());

        let upload = pipeline
            .validate(
                ArtifactKind::Resume,
                UploadedFile::new("../My CV.PDF", b"cv".to_vec()),
            )
            .expect("valid résumé");
        assert_eq!(upload.sanitized_filename, "My_CV.PDF");

        let err = pipeline
            .validate(
                ArtifactKind::Resume,
                UploadedFile::new("سيرة.pdf", b"cv".to_vec()),
            )
            .expect_err("name collapses to 'pdf' without a dot");
        assert_eq!(
            err,
            UploadRejection::UnsupportedType {
                kind: ArtifactKind::Resume
            }
        );
    }

    #[test]
    fn validation_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pipeline = pipeline(dir.path());
        pipeline
            .validate(
                ArtifactKind::Video,
                UploadedFile::new("intro.mp4", vec![0; 33]),
            )
            .expect_err("over the 32 byte ceiling");
        pipeline
            .validate(ArtifactKind::Video, UploadedFile::new("intro.mp4", vec![0; 32]))
            .expect("at the ceiling");
        assert_eq!(std::fs::read_dir(dir.path()).expect("root").count(), 0);
    }

    #[test]
    fn persist_names_with_clock_second() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pipeline = pipeline(dir.path());
        let upload = pipeline
            .validate(ArtifactKind::Logo, UploadedFile::new("logo.png", vec![1; 4]))
            .expect("valid logo");
        let stored = pipeline.persist(&upload).expect("stored");
        assert_eq!(stored.public_path, "/uploads/logos/logo_1705305600_logo.png");
    }
}
