use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::board::applications::domain::{Applicant, ApplicantId, NewApplicant, DEFAULT_STATUS};
use crate::board::applications::repository::ApplicantRepository;
use crate::board::applications::{application_router, ApplicationService};
use crate::board::companies::password::hash_password;
use crate::board::companies::{
    basic_authorization, Argon2Params, Company, CompanyId, CompanyRepository, CompanyService,
    NewCompany,
};
use crate::board::jobs::{Job, JobId, JobRepository, NewJob};
use crate::board::repository::RepositoryError;
use crate::uploads::{FixedClock, MediaStore, UploadLimits, UploadPipeline, UploadPolicy};

pub(super) const BOUNDARY: &str = "bawabti-test-boundary";

pub(super) const COMPANY_PASSWORD: &str = "aden-2024";

const CHEAP_ARGON2: Argon2Params = Argon2Params {
    memory_kib: 64,
    iterations: 1,
    parallelism: 1,
};

/// 2024-01-15 08:00:00 UTC, unix second 1705305600.
pub(super) fn upload_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn small_limits() -> UploadLimits {
    UploadLimits {
        max_resume_bytes: 64,
        max_video_bytes: 128,
        max_logo_bytes: 32,
    }
}

pub(super) fn pipeline(root: &Path) -> Arc<UploadPipeline> {
    Arc::new(
        UploadPipeline::new(UploadPolicy::new(small_limits()), MediaStore::new(root))
            .with_clock(Arc::new(FixedClock(upload_instant()))),
    )
}

pub(super) fn job(id: i64, company: i64) -> Job {
    Job {
        id: JobId(id),
        company_id: CompanyId(company),
        title: "Backend Developer".to_string(),
        category: "information_technology".to_string(),
        job_type: "full_time".to_string(),
        experience_level: Some("mid".to_string()),
        salary_min: None,
        salary_max: None,
        location: Some("Aden".to_string()),
        description: None,
        requirements: None,
        deadline: None,
        is_active: true,
        created_at: upload_instant(),
    }
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn build_service(
    root: &Path,
    jobs: Vec<Job>,
) -> (
    ApplicationService<MemoryApplicants, MemoryJobs>,
    Arc<MemoryApplicants>,
) {
    let applicants = Arc::new(MemoryApplicants::default());
    let jobs = Arc::new(MemoryJobs::with(jobs));
    let service = ApplicationService::new(applicants.clone(), jobs, pipeline(root));
    (service, applicants)
}

/// Application routes backed by `service`, with companies 1 and 2 registered.
pub(super) fn router_with_service(
    service: ApplicationService<MemoryApplicants, MemoryJobs>,
) -> axum::Router {
    let uploads = Arc::new(service.uploads().clone());
    let companies = CompanyService::new(Arc::new(MemoryCompanies::seeded()), uploads)
        .with_password_params(CHEAP_ARGON2);
    application_router(Arc::new(service), Arc::new(companies))
}

pub(super) fn company_email(company: i64) -> String {
    format!("hr@company{company}.ye")
}

/// `Authorization` header for one of the seeded companies.
pub(super) fn company_authorization(company: i64) -> String {
    basic_authorization(&company_email(company), COMPANY_PASSWORD)
}

pub(super) struct MemoryCompanies {
    records: Vec<Company>,
}

impl MemoryCompanies {
    fn seeded() -> Self {
        let password_hash = hash_password(COMPANY_PASSWORD, CHEAP_ARGON2).expect("hash");
        let records = [1, 2]
            .into_iter()
            .map(|id| Company {
                id: CompanyId(id),
                name: format!("Company {id}"),
                email: company_email(id),
                password_hash: password_hash.clone(),
                phone: None,
                website: None,
                city: None,
                address: None,
                description: None,
                logo_path: None,
                is_active: true,
                created_at: upload_instant(),
            })
            .collect();
        Self { records }
    }
}

impl CompanyRepository for MemoryCompanies {
    fn insert(&self, _company: NewCompany) -> Result<Company, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, id: CompanyId) -> Result<Option<Company>, RepositoryError> {
        Ok(self.records.iter().find(|company| company.id == id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Company>, RepositoryError> {
        Ok(self
            .records
            .iter()
            .find(|company| company.email == email)
            .cloned())
    }

    fn set_logo(&self, _id: CompanyId, _logo_path: &str) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryApplicants {
    records: Mutex<Vec<Applicant>>,
}

impl MemoryApplicants {
    pub(super) fn all(&self) -> Vec<Applicant> {
        self.records.lock().expect("applicant mutex poisoned").clone()
    }
}

impl ApplicantRepository for MemoryApplicants {
    fn insert(&self, applicant: NewApplicant) -> Result<Applicant, RepositoryError> {
        let mut guard = self.records.lock().expect("applicant mutex poisoned");
        let record = Applicant {
            id: ApplicantId(guard.len() as i64 + 1),
            job_id: applicant.job_id,
            full_name: applicant.full_name,
            email: applicant.email,
            phone: applicant.phone,
            cv_path: applicant.cv_path,
            video_path: applicant.video_path,
            cover_letter: applicant.cover_letter,
            status: DEFAULT_STATUS.to_string(),
            created_at: upload_instant(),
        };
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        let guard = self.records.lock().expect("applicant mutex poisoned");
        Ok(guard.iter().find(|record| record.id == id).cloned())
    }

    fn list_for_job(&self, job_id: JobId) -> Result<Vec<Applicant>, RepositoryError> {
        let guard = self.records.lock().expect("applicant mutex poisoned");
        Ok(guard
            .iter()
            .rev()
            .filter(|record| record.job_id == Some(job_id))
            .cloned()
            .collect())
    }

    fn list_for_company(&self, _company_id: CompanyId) -> Result<Vec<Applicant>, RepositoryError> {
        Ok(Vec::new())
    }

    fn update_status(&self, id: ApplicantId, status: &str) -> Result<Applicant, RepositoryError> {
        let mut guard = self.records.lock().expect("applicant mutex poisoned");
        let record = guard
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(RepositoryError::NotFound)?;
        record.status = status.to_string();
        Ok(record.clone())
    }
}

#[derive(Default)]
pub(super) struct MemoryJobs {
    jobs: Mutex<Vec<Job>>,
}

impl MemoryJobs {
    fn with(jobs: Vec<Job>) -> Self {
        Self {
            jobs: Mutex::new(jobs),
        }
    }
}

impl JobRepository for MemoryJobs {
    fn insert(&self, _job: NewJob) -> Result<Job, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let guard = self.jobs.lock().expect("job mutex poisoned");
        Ok(guard.iter().find(|job| job.id == id).cloned())
    }

    fn list_active(&self) -> Result<Vec<Job>, RepositoryError> {
        let guard = self.jobs.lock().expect("job mutex poisoned");
        Ok(guard.iter().filter(|job| job.is_active).cloned().collect())
    }

    fn list_for_company(&self, company_id: CompanyId) -> Result<Vec<Job>, RepositoryError> {
        let guard = self.jobs.lock().expect("job mutex poisoned");
        Ok(guard
            .iter()
            .filter(|job| job.company_id == company_id)
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableApplicants;

impl ApplicantRepository for UnavailableApplicants {
    fn insert(&self, _applicant: NewApplicant) -> Result<Applicant, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_for_job(&self, _job_id: JobId) -> Result<Vec<Applicant>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_for_company(&self, _company_id: CompanyId) -> Result<Vec<Applicant>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_status(&self, _id: ApplicantId, _status: &str) -> Result<Applicant, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Files stored under one kind folder of the upload root.
pub(super) fn stored_files(root: &Path, dir: &str) -> Vec<String> {
    match std::fs::read_dir(root.join(dir)) {
        Ok(entries) => {
            let mut names: Vec<String> = entries
                .map(|entry| {
                    entry
                        .expect("dir entry")
                        .file_name()
                        .to_string_lossy()
                        .into_owned()
                })
                .collect();
            names.sort();
            names
        }
        Err(_) => Vec::new(),
    }
}

pub(super) enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub(super) fn multipart_request(method: &str, uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, filename, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("multipart request")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
