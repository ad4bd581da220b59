use serde::{Deserialize, Serialize};

/// The kinds of artifact the board stores. Each has its own allow-list, size ceiling
/// and folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Resume,
    Video,
    Logo,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [Self::Resume, Self::Video, Self::Logo];

    /// Prefix of generated storage names.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Resume => "cv",
            Self::Video => "video",
            Self::Logo => "logo",
        }
    }

    /// Folder name under the upload root and under the public `/uploads` path.
    pub fn public_dir(self) -> &'static str {
        match self {
            Self::Resume => "cvs",
            Self::Video => "videos",
            Self::Logo => "logos",
        }
    }

    pub fn allowed_extensions(self) -> &'static [&'static str] {
        match self {
            Self::Resume => &["pdf", "doc", "docx"],
            Self::Video => &["mp4", "avi", "mov", "mkv"],
            Self::Logo => &["png", "jpg", "jpeg", "gif"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Resume => "résumé",
            Self::Video => "video",
            Self::Logo => "logo",
        }
    }

    pub fn public_path(self, stored_name: &str) -> String {
        format!("/uploads/{}/{}", self.public_dir(), stored_name)
    }
}
