use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{Applicant, ApplicantId, ApplicationSubmission, NewApplicant, StatusChange};
use super::repository::ApplicantRepository;
use crate::board::companies::CompanyId;
use crate::board::jobs::{JobId, JobRepository};
use crate::board::optional_text;
use crate::board::repository::RepositoryError;
use crate::uploads::{
    ArtifactKind, StorageError, StoredArtifact, UploadPipeline, UploadRejection, UploadedFile,
    ValidatedUpload,
};

const MAX_STATUS_LEN: usize = 32;

/// Intake of job applications and their résumé/video uploads.
pub struct ApplicationService<A, J> {
    applicants: Arc<A>,
    jobs: Arc<J>,
    uploads: Arc<UploadPipeline>,
}

impl<A, J> ApplicationService<A, J>
where
    A: ApplicantRepository + 'static,
    J: JobRepository + 'static,
{
    pub fn new(applicants: Arc<A>, jobs: Arc<J>, uploads: Arc<UploadPipeline>) -> Self {
        Self {
            applicants,
            jobs,
            uploads,
        }
    }

    pub fn uploads(&self) -> &UploadPipeline {
        &self.uploads
    }

    /// Validate the form and both files, write the files, then record the applicant.
    ///
    /// Every check runs before the first write, so a rejected submission leaves
    /// neither a file nor a row behind.
    pub fn submit(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<Applicant, ApplicationServiceError> {
        let full_name = optional_text(submission.full_name);
        let email = optional_text(submission.email);
        let (Some(full_name), Some(email)) = (full_name, email) else {
            return Err(ApplicationServiceError::MissingFields);
        };

        let job_id = match optional_text(submission.job_id) {
            Some(raw) => Some(self.open_job(&raw)?),
            None => None,
        };

        let resume = submission
            .resume
            .map(|file| self.uploads.validate(ArtifactKind::Resume, file))
            .transpose()?;
        let video = submission
            .video
            .map(|file| self.uploads.validate(ArtifactKind::Video, file))
            .transpose()?;

        let mut stored: Vec<StoredArtifact> = Vec::new();
        let cv_path = self.store(resume.as_ref(), &mut stored)?;
        let video_path = self.store(video.as_ref(), &mut stored)?;

        let applicant = self
            .applicants
            .insert(NewApplicant {
                job_id,
                full_name,
                email,
                phone: optional_text(submission.phone),
                cv_path,
                video_path,
                cover_letter: optional_text(submission.cover_letter),
            })
            .inspect_err(|err| log_orphans(&stored, err))?;

        info!(
            applicant_id = applicant.id.0,
            job_id = applicant.job_id.map(|id| id.0),
            has_cv = applicant.cv_path.is_some(),
            has_video = applicant.video_path.is_some(),
            "application received"
        );
        Ok(applicant)
    }

    /// Store a lone résumé or video without creating an applicant.
    pub fn upload_standalone(
        &self,
        kind: ArtifactKind,
        file: Option<UploadedFile>,
    ) -> Result<StoredArtifact, ApplicationServiceError> {
        let file = file.ok_or(ApplicationServiceError::MissingFile)?;
        let upload = self.uploads.validate(kind, file)?;
        Ok(self.uploads.persist(&upload)?)
    }

    /// Applicants for one of `company_id`'s jobs. Another company's job is reported
    /// as not found.
    pub fn applicants_for_job(
        &self,
        company_id: CompanyId,
        job_id: JobId,
    ) -> Result<Vec<Applicant>, ApplicationServiceError> {
        let job = self.jobs.fetch(job_id)?.ok_or(RepositoryError::NotFound)?;
        if job.company_id != company_id {
            return Err(RepositoryError::NotFound.into());
        }
        Ok(self.applicants.list_for_job(job_id)?)
    }

    pub fn applicants_for_company(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<Applicant>, ApplicationServiceError> {
        Ok(self.applicants.list_for_company(company_id)?)
    }

    /// Change an applicant's status. Applicants of another company's jobs are
    /// reported as not found.
    pub fn update_status(
        &self,
        company_id: CompanyId,
        applicant_id: ApplicantId,
        change: StatusChange,
    ) -> Result<Applicant, ApplicationServiceError> {
        let status = change.status.trim().to_string();
        if status.is_empty() || status.chars().count() > MAX_STATUS_LEN {
            return Err(ApplicationServiceError::InvalidStatus);
        }

        let applicant = self
            .applicants
            .fetch(applicant_id)?
            .ok_or(RepositoryError::NotFound)?;
        let owner = match applicant.job_id {
            Some(job_id) => self.jobs.fetch(job_id)?.map(|job| job.company_id),
            None => None,
        };
        if owner != Some(company_id) {
            return Err(RepositoryError::NotFound.into());
        }

        let updated = self.applicants.update_status(applicant.id, &status)?;
        info!(
            applicant_id = updated.id.0,
            company_id = company_id.0,
            status = %updated.status,
            "applicant status changed"
        );
        Ok(updated)
    }

    fn open_job(&self, raw: &str) -> Result<JobId, ApplicationServiceError> {
        let id = raw
            .parse::<i64>()
            .map(JobId)
            .map_err(|_| ApplicationServiceError::InvalidJobId(raw.to_string()))?;
        let job = self
            .jobs
            .fetch(id)?
            .ok_or(ApplicationServiceError::UnknownJob(id))?;

        let today = self.uploads.clock().now().date_naive();
        if !job.accepts_applications(today) {
            return Err(ApplicationServiceError::JobClosed(id));
        }
        Ok(id)
    }

    fn store(
        &self,
        upload: Option<&ValidatedUpload>,
        stored: &mut Vec<StoredArtifact>,
    ) -> Result<Option<String>, ApplicationServiceError> {
        let Some(upload) = upload else {
            return Ok(None);
        };
        let artifact = self
            .uploads
            .persist(upload)
            .inspect_err(|err| log_orphans(stored.as_slice(), err))?;
        let path = artifact.public_path.clone();
        stored.push(artifact);
        Ok(Some(path))
    }
}

fn log_orphans(stored: &[StoredArtifact], err: &dyn std::fmt::Display) {
    for artifact in stored {
        warn!(
            kind = ?artifact.kind,
            orphan = %artifact.disk_path.display(),
            error = %err,
            "uploaded file kept without an applicant record"
        );
    }
}

/// Error raised by the application intake service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("full name and email are required")]
    MissingFields,
    #[error("no file received")]
    MissingFile,
    #[error("job id '{0}' is not a number")]
    InvalidJobId(String),
    #[error("job {0} does not exist")]
    UnknownJob(JobId),
    #[error("job {0} is no longer accepting applications")]
    JobClosed(JobId),
    #[error("status must be between 1 and {MAX_STATUS_LEN} characters")]
    InvalidStatus,
    #[error(transparent)]
    Rejected(#[from] UploadRejection),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
