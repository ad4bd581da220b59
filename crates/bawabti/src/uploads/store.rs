use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::kind::ArtifactKind;
use super::naming::storage_name;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create upload folder '{path}': {source}")]
    CreateFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where a persisted artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredArtifact {
    pub kind: ArtifactKind,
    pub stored_name: String,
    pub public_path: String,
    #[serde(skip)]
    pub disk_path: PathBuf,
    pub size: u64,
}

/// Kind-partitioned folder tree under a single upload root.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn folder_for(&self, kind: ArtifactKind) -> PathBuf {
        self.root.join(kind.public_dir())
    }

    /// Create the folder for every artifact kind.
    pub fn ensure_folders(&self) -> Result<(), StorageError> {
        for kind in ArtifactKind::ALL {
            let path = self.folder_for(kind);
            fs::create_dir_all(&path).map_err(|source| StorageError::CreateFolder {
                path: path.clone(),
                source,
            })?;
            debug!(folder = %path.display(), "upload folder ready");
        }
        Ok(())
    }

    /// Write `bytes` under the generated name, replacing any file already there.
    pub fn persist(
        &self,
        kind: ArtifactKind,
        sanitized_filename: &str,
        bytes: &[u8],
        uploaded_at: DateTime<Utc>,
    ) -> Result<StoredArtifact, StorageError> {
        let stored_name = storage_name(kind, sanitized_filename, uploaded_at);
        let folder = self.folder_for(kind);
        fs::create_dir_all(&folder).map_err(|source| StorageError::CreateFolder {
            path: folder.clone(),
            source,
        })?;

        let disk_path = folder.join(&stored_name);
        fs::write(&disk_path, bytes).map_err(|source| StorageError::Write {
            path: disk_path.clone(),
            source,
        })?;

        info!(
            kind = kind.tag(),
            stored_name = %stored_name,
            size = bytes.len(),
            "artifact stored"
        );

        Ok(StoredArtifact {
            kind,
            public_path: kind.public_path(&stored_name),
            stored_name,
            disk_path,
            size: bytes.len() as u64,
        })
    }
}
