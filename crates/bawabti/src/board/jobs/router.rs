use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use super::domain::{JobId, JobPosting};
use super::repository::JobRepository;
use super::service::{JobService, JobServiceError};
use crate::board::companies::router::authorize_company;
use crate::board::companies::{CompanyCredentials, CompanyId, CompanyRepository, CompanyService};
use crate::board::extract::{JsonBody, PathParam};
use crate::board::repository::RepositoryError;
use crate::board::run_blocking;

/// Job service plus the company service used to check posting credentials.
pub(crate) struct JobsState<J, C> {
    jobs: Arc<JobService<J, C>>,
    companies: Arc<CompanyService<C>>,
}

impl<J, C> Clone for JobsState<J, C> {
    fn clone(&self) -> Self {
        Self {
            jobs: self.jobs.clone(),
            companies: self.companies.clone(),
        }
    }
}

/// Router builder exposing job browsing and posting.
pub fn job_router<J, C>(jobs: Arc<JobService<J, C>>, companies: Arc<CompanyService<C>>) -> Router
where
    J: JobRepository + 'static,
    C: CompanyRepository + 'static,
{
    Router::new()
        .route(
            "/api/jobs",
            get(list_handler::<J, C>).post(post_handler::<J, C>),
        )
        .route("/api/jobs/", get(list_handler::<J, C>))
        .route("/api/jobs/:job_id", get(detail_handler::<J, C>))
        .route(
            "/api/companies/:company_id/jobs",
            get(company_jobs_handler::<J, C>),
        )
        .route("/api/catalog", get(catalog_handler::<J, C>))
        .with_state(JobsState { jobs, companies })
}

pub(crate) async fn list_handler<J, C>(
    State(state): State<JobsState<J, C>>,
) -> Result<impl IntoResponse, Response>
where
    J: JobRepository + 'static,
    C: CompanyRepository + 'static,
{
    let jobs = run_blocking(move || state.jobs.list_open())
        .await?
        .map_err(error_response)?;
    Ok(Json(jobs))
}

/// Post a listing. The credentials must belong to `company_id` in the body.
pub(crate) async fn post_handler<J, C>(
    State(state): State<JobsState<J, C>>,
    credentials: CompanyCredentials,
    JsonBody(posting): JsonBody<JobPosting>,
) -> Result<impl IntoResponse, Response>
where
    J: JobRepository + 'static,
    C: CompanyRepository + 'static,
{
    authorize_company(state.companies.clone(), credentials, posting.company_id).await?;
    let job = run_blocking(move || state.jobs.post(posting))
        .await?
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(job)))
}

pub(crate) async fn detail_handler<J, C>(
    State(state): State<JobsState<J, C>>,
    PathParam(job_id): PathParam<i64>,
) -> Result<impl IntoResponse, Response>
where
    J: JobRepository + 'static,
    C: CompanyRepository + 'static,
{
    let job = run_blocking(move || state.jobs.get(JobId(job_id)))
        .await?
        .map_err(error_response)?;
    Ok(Json(job))
}

pub(crate) async fn company_jobs_handler<J, C>(
    State(state): State<JobsState<J, C>>,
    PathParam(company_id): PathParam<i64>,
) -> Result<impl IntoResponse, Response>
where
    J: JobRepository + 'static,
    C: CompanyRepository + 'static,
{
    let listed = run_blocking(move || state.jobs.list_for_company(CompanyId(company_id))).await?;
    match listed {
        Ok(jobs) => Ok(Json(jobs)),
        Err(JobServiceError::UnknownCompany(id)) => {
            let payload = json!({ "error": format!("company {id} does not exist") });
            Err((StatusCode::NOT_FOUND, Json(payload)).into_response())
        }
        Err(err) => Err(error_response(err)),
    }
}

pub(crate) async fn catalog_handler<J, C>(State(state): State<JobsState<J, C>>) -> Response
where
    J: JobRepository + 'static,
    C: CompanyRepository + 'static,
{
    (StatusCode::OK, Json(*state.jobs.catalog())).into_response()
}

fn error_response(err: JobServiceError) -> Response {
    let status = match &err {
        JobServiceError::MissingTitle
        | JobServiceError::UnknownCategory(_)
        | JobServiceError::UnknownJobType(_)
        | JobServiceError::UnknownExperienceLevel(_)
        | JobServiceError::InvalidSalaryRange { .. }
        | JobServiceError::NegativeSalary
        | JobServiceError::UnknownCompany(_)
        | JobServiceError::InactiveCompany(_) => StatusCode::BAD_REQUEST,
        JobServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        JobServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
