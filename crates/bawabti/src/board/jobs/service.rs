use std::sync::Arc;

use tracing::info;

use super::catalog::JobCatalog;
use super::domain::{Job, JobId, JobPosting, NewJob};
use super::repository::JobRepository;
use crate::board::companies::{CompanyId, CompanyRepository};
use crate::board::optional_text;
use crate::board::repository::RepositoryError;

/// Posting and browsing of job listings.
pub struct JobService<J, C> {
    jobs: Arc<J>,
    companies: Arc<C>,
    catalog: JobCatalog,
}

impl<J, C> JobService<J, C>
where
    J: JobRepository + 'static,
    C: CompanyRepository + 'static,
{
    pub fn new(jobs: Arc<J>, companies: Arc<C>) -> Self {
        Self {
            jobs,
            companies,
            catalog: JobCatalog::standard(),
        }
    }

    pub fn catalog(&self) -> &JobCatalog {
        &self.catalog
    }

    pub fn post(&self, posting: JobPosting) -> Result<Job, JobServiceError> {
        let title = posting.title.trim().to_string();
        if title.is_empty() {
            return Err(JobServiceError::MissingTitle);
        }

        let category = posting.category.trim().to_string();
        if !self.catalog.has_category(&category) {
            return Err(JobServiceError::UnknownCategory(category));
        }
        let job_type = posting.job_type.trim().to_string();
        if !self.catalog.has_job_type(&job_type) {
            return Err(JobServiceError::UnknownJobType(job_type));
        }
        let experience_level = optional_text(posting.experience_level);
        if let Some(level) = &experience_level {
            if !self.catalog.has_experience_level(level) {
                return Err(JobServiceError::UnknownExperienceLevel(level.clone()));
            }
        }

        if let (Some(min), Some(max)) = (posting.salary_min, posting.salary_max) {
            if min > max {
                return Err(JobServiceError::InvalidSalaryRange { min, max });
            }
        }
        if posting.salary_min.is_some_and(|v| v < 0) || posting.salary_max.is_some_and(|v| v < 0)
        {
            return Err(JobServiceError::NegativeSalary);
        }

        let company = self
            .companies
            .fetch(posting.company_id)?
            .ok_or(JobServiceError::UnknownCompany(posting.company_id))?;
        if !company.is_active {
            return Err(JobServiceError::InactiveCompany(company.id));
        }

        let job = self.jobs.insert(NewJob {
            company_id: company.id,
            title,
            category,
            job_type,
            experience_level,
            salary_min: posting.salary_min,
            salary_max: posting.salary_max,
            location: optional_text(posting.location),
            description: optional_text(posting.description),
            requirements: optional_text(posting.requirements),
            deadline: posting.deadline,
        })?;

        info!(job_id = job.id.0, company_id = company.id.0, "job posted");
        Ok(job)
    }

    /// Active listings, newest first.
    pub fn list_open(&self) -> Result<Vec<Job>, JobServiceError> {
        Ok(self.jobs.list_active()?)
    }

    pub fn list_for_company(&self, company_id: CompanyId) -> Result<Vec<Job>, JobServiceError> {
        self.companies
            .fetch(company_id)?
            .ok_or(JobServiceError::UnknownCompany(company_id))?;
        Ok(self.jobs.list_for_company(company_id)?)
    }

    pub fn get(&self, id: JobId) -> Result<Job, JobServiceError> {
        let job = self.jobs.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(job)
    }
}

/// Error raised by the job service.
#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error("job title is required")]
    MissingTitle,
    #[error("unknown job category '{0}'")]
    UnknownCategory(String),
    #[error("unknown job type '{0}'")]
    UnknownJobType(String),
    #[error("unknown experience level '{0}'")]
    UnknownExperienceLevel(String),
    #[error("salary_min ({min}) exceeds salary_max ({max})")]
    InvalidSalaryRange { min: i64, max: i64 },
    #[error("salary values must not be negative")]
    NegativeSalary,
    #[error("company {0} does not exist")]
    UnknownCompany(CompanyId),
    #[error("company {0} is inactive")]
    InactiveCompany(CompanyId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
