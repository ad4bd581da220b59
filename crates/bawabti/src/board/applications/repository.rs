use super::domain::{Applicant, ApplicantId, NewApplicant};
use crate::board::companies::CompanyId;
use crate::board::jobs::JobId;
use crate::board::repository::RepositoryError;

/// Storage abstraction so the intake service can be exercised in isolation.
pub trait ApplicantRepository: Send + Sync {
    fn insert(&self, applicant: NewApplicant) -> Result<Applicant, RepositoryError>;
    fn fetch(&self, id: ApplicantId) -> Result<Option<Applicant>, RepositoryError>;
    /// Applicants for one job, newest first.
    fn list_for_job(&self, job_id: JobId) -> Result<Vec<Applicant>, RepositoryError>;
    /// Applicants across every job the company owns, newest first.
    fn list_for_company(&self, company_id: CompanyId) -> Result<Vec<Applicant>, RepositoryError>;
    fn update_status(&self, id: ApplicantId, status: &str) -> Result<Applicant, RepositoryError>;
}
