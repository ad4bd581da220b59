use super::kind::ArtifactKind;

const MEGABYTE: u64 = 1024 * 1024;

/// Byte ceilings per artifact kind. Ceilings are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_resume_bytes: u64,
    pub max_video_bytes: u64,
    pub max_logo_bytes: u64,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_resume_bytes: 5 * MEGABYTE,
            max_video_bytes: 60 * MEGABYTE,
            max_logo_bytes: 2 * MEGABYTE,
        }
    }
}

impl UploadLimits {
    pub fn ceiling_for(&self, kind: ArtifactKind) -> u64 {
        match kind {
            ArtifactKind::Resume => self.max_resume_bytes,
            ArtifactKind::Video => self.max_video_bytes,
            ArtifactKind::Logo => self.max_logo_bytes,
        }
    }

    /// Largest request body the upload endpoints accept: one résumé, one video and
    /// a megabyte of form fields.
    pub fn request_body_limit(&self) -> usize {
        let total = self
            .max_resume_bytes
            .saturating_add(self.max_video_bytes)
            .saturating_add(MEGABYTE);
        usize::try_from(total).unwrap_or(usize::MAX)
    }
}

/// Reasons an upload is refused. The messages are shown to the uploader as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("unsupported {} file type (allowed: {})", .kind.label(), .kind.allowed_extensions().join(", "))]
    UnsupportedType { kind: ArtifactKind },
    #[error("{} is too large ({} maximum)", .kind.label(), human_size(.max_bytes))]
    TooLarge { kind: ArtifactKind, max_bytes: u64 },
}

fn human_size(bytes: &u64) -> String {
    let bytes = *bytes;
    if bytes >= MEGABYTE && bytes % MEGABYTE == 0 {
        format!("{}MB", bytes / MEGABYTE)
    } else {
        format!("{bytes} bytes")
    }
}

/// Extension allow-list and size ceiling check applied before anything is written.
#[derive(Debug, Clone, Default)]
pub struct UploadPolicy {
    limits: UploadLimits,
}

impl UploadPolicy {
    pub fn new(limits: UploadLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &UploadLimits {
        &self.limits
    }

    /// Lower-cased text after the last dot, if any.
    pub fn extension_of(filename: &str) -> Option<String> {
        let (_, ext) = filename.rsplit_once('.')?;
        Some(ext.to_ascii_lowercase())
    }

    pub fn check(
        &self,
        kind: ArtifactKind,
        filename: &str,
        byte_len: u64,
    ) -> Result<(), UploadRejection> {
        let allowed = Self::extension_of(filename)
            .map(|ext| kind.allowed_extensions().contains(&ext.as_str()))
            .unwrap_or(false);
        if !allowed {
            return Err(UploadRejection::UnsupportedType { kind });
        }

        let max_bytes = self.limits.ceiling_for(kind);
        if byte_len > max_bytes {
            return Err(UploadRejection::TooLarge { kind, max_bytes });
        }

        Ok(())
    }
}
