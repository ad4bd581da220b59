use super::domain::{Job, JobId, NewJob};
use crate::board::companies::CompanyId;
use crate::board::repository::RepositoryError;

/// Storage abstraction for job listings. Listings come back newest first.
pub trait JobRepository: Send + Sync {
    fn insert(&self, job: NewJob) -> Result<Job, RepositoryError>;
    fn fetch(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;
    fn list_active(&self) -> Result<Vec<Job>, RepositoryError>;
    fn list_for_company(&self, company_id: CompanyId) -> Result<Vec<Job>, RepositoryError>;
}
