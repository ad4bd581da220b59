use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::jobs::JobId;
use crate::uploads::UploadedFile;

/// Status every applicant starts with.
pub const DEFAULT_STATUS: &str = "new";

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicantId(pub i64);

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A job seeker's application as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Applicant {
    pub id: ApplicantId,
    pub job_id: Option<JobId>,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub cv_path: Option<String>,
    pub video_path: Option<String>,
    pub cover_letter: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Multipart application form after buffering. `job_id` is kept raw so a
/// malformed value can be reported instead of silently dropped.
#[derive(Debug, Clone, Default)]
pub struct ApplicationSubmission {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub job_id: Option<String>,
    pub cover_letter: Option<String>,
    pub resume: Option<UploadedFile>,
    pub video: Option<UploadedFile>,
}

/// Validated application ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplicant {
    pub job_id: Option<JobId>,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub cv_path: Option<String>,
    pub video_path: Option<String>,
    pub cover_letter: Option<String>,
}

/// Status label set by company staff.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusChange {
    #[serde(default)]
    pub status: String,
}
