//! The job board: companies, their job listings, and the applications submitted
//! against them.

pub mod applications;
pub mod companies;
pub(crate) mod extract;
pub mod jobs;
pub(crate) mod multipart;
pub mod repository;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;
use tracing::error;

use applications::{application_router, ApplicantRepository, ApplicationService};
use companies::{company_router, CompanyRepository, CompanyService};
use jobs::{job_router, JobRepository, JobService};

pub use repository::RepositoryError;

/// All board routes merged into one router.
pub fn board_router<C, J, A>(
    companies: Arc<CompanyService<C>>,
    jobs: Arc<JobService<J, C>>,
    applications: Arc<ApplicationService<A, J>>,
) -> Router
where
    C: CompanyRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicantRepository + 'static,
{
    Router::new()
        .merge(company_router(companies.clone()))
        .merge(job_router(jobs, companies.clone()))
        .merge(application_router(applications, companies))
}

/// Run synchronous service work (Argon2, file writes, SQLite) on the blocking pool.
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, Response>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|err| {
        error!(error = %err, "blocking task did not complete");
        let payload = json!({ "error": "request could not be completed" });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
    })
}

/// Trimmed text, with blank values treated as absent.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
