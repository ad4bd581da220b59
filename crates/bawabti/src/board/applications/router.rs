use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{ApplicantId, ApplicationSubmission, StatusChange};
use super::repository::ApplicantRepository;
use super::service::{ApplicationService, ApplicationServiceError};
use crate::board::companies::router::{authenticate_company, authorize_company};
use crate::board::companies::{CompanyCredentials, CompanyId, CompanyRepository, CompanyService};
use crate::board::extract::{JsonBody, PathParam};
use crate::board::jobs::{JobId, JobRepository};
use crate::board::multipart::MultipartForm;
use crate::board::repository::RepositoryError;
use crate::board::run_blocking;
use crate::uploads::ArtifactKind;

/// Application service plus the company service that checks reviewer credentials.
pub(crate) struct ReviewState<A, J, C> {
    applications: Arc<ApplicationService<A, J>>,
    companies: Arc<CompanyService<C>>,
}

impl<A, J, C> Clone for ReviewState<A, J, C> {
    fn clone(&self) -> Self {
        Self {
            applications: self.applications.clone(),
            companies: self.companies.clone(),
        }
    }
}

/// Router builder exposing application intake, standalone uploads and applicant review.
///
/// Intake is open; review routes need the owning company's credentials.
pub fn application_router<A, J, C>(
    applications: Arc<ApplicationService<A, J>>,
    companies: Arc<CompanyService<C>>,
) -> Router
where
    A: ApplicantRepository + 'static,
    J: JobRepository + 'static,
    C: CompanyRepository + 'static,
{
    let body_limit = applications.uploads().policy().limits().request_body_limit();

    let intake = Router::new()
        .route("/api/upload", post(submit_handler::<A, J>))
        .route("/upload_cv", post(resume_upload_handler::<A, J>))
        .route("/upload_video", post(video_upload_handler::<A, J>))
        .with_state(applications.clone());

    let review = Router::new()
        .route(
            "/api/jobs/:job_id/applicants",
            get(job_applicants_handler::<A, J, C>),
        )
        .route(
            "/api/companies/:company_id/applicants",
            get(company_applicants_handler::<A, J, C>),
        )
        .route(
            "/api/companies/:company_id/applicants/:applicant_id/status",
            patch(status_handler::<A, J, C>),
        )
        .with_state(ReviewState {
            applications,
            companies,
        });

    intake
        .merge(review)
        .layer(DefaultBodyLimit::max(body_limit))
}

pub(crate) async fn submit_handler<A, J>(
    State(service): State<Arc<ApplicationService<A, J>>>,
    mut form: MultipartForm,
) -> Result<impl IntoResponse, Response>
where
    A: ApplicantRepository + 'static,
    J: JobRepository + 'static,
{
    let submission = ApplicationSubmission {
        full_name: form.text("full_name"),
        email: form.text("email"),
        phone: form.text("phone"),
        job_id: form.text("job_id"),
        cover_letter: form.text("cover_letter"),
        resume: form.take_file("cv"),
        video: form.take_file("intro_video"),
    };

    let applicant = run_blocking(move || service.submit(submission))
        .await?
        .map_err(error_response)?;
    let payload = json!({
        "message": "application submitted",
        "applicant_id": applicant.id,
        "cv": applicant.cv_path,
        "video": applicant.video_path,
    });
    Ok((StatusCode::CREATED, Json(payload)))
}

pub(crate) async fn resume_upload_handler<A, J>(
    State(service): State<Arc<ApplicationService<A, J>>>,
    form: MultipartForm,
) -> Result<impl IntoResponse, Response>
where
    A: ApplicantRepository + 'static,
    J: JobRepository + 'static,
{
    standalone_upload(service, ArtifactKind::Resume, form).await
}

pub(crate) async fn video_upload_handler<A, J>(
    State(service): State<Arc<ApplicationService<A, J>>>,
    form: MultipartForm,
) -> Result<impl IntoResponse, Response>
where
    A: ApplicantRepository + 'static,
    J: JobRepository + 'static,
{
    standalone_upload(service, ArtifactKind::Video, form).await
}

async fn standalone_upload<A, J>(
    service: Arc<ApplicationService<A, J>>,
    kind: ArtifactKind,
    mut form: MultipartForm,
) -> Result<Json<serde_json::Value>, Response>
where
    A: ApplicantRepository + 'static,
    J: JobRepository + 'static,
{
    let file = form.take_file("file");
    let stored = run_blocking(move || service.upload_standalone(kind, file))
        .await?
        .map_err(error_response)?;

    Ok(Json(json!({
        "message": format!("{} uploaded", kind.label()),
        "path": stored.public_path,
    })))
}

/// Applicants for a job owned by the authenticated company.
pub(crate) async fn job_applicants_handler<A, J, C>(
    State(state): State<ReviewState<A, J, C>>,
    PathParam(job_id): PathParam<i64>,
    credentials: CompanyCredentials,
) -> Result<impl IntoResponse, Response>
where
    A: ApplicantRepository + 'static,
    J: JobRepository + 'static,
    C: CompanyRepository + 'static,
{
    let company = authenticate_company(state.companies.clone(), credentials).await?;
    let service = state.applications;
    let applicants = run_blocking(move || service.applicants_for_job(company.id, JobId(job_id)))
        .await?
        .map_err(error_response)?;
    Ok(Json(applicants))
}

pub(crate) async fn company_applicants_handler<A, J, C>(
    State(state): State<ReviewState<A, J, C>>,
    PathParam(company_id): PathParam<i64>,
    credentials: CompanyCredentials,
) -> Result<impl IntoResponse, Response>
where
    A: ApplicantRepository + 'static,
    J: JobRepository + 'static,
    C: CompanyRepository + 'static,
{
    let company =
        authorize_company(state.companies.clone(), credentials, CompanyId(company_id)).await?;
    let service = state.applications;
    let applicants = run_blocking(move || service.applicants_for_company(company.id))
        .await?
        .map_err(error_response)?;
    Ok(Json(applicants))
}

pub(crate) async fn status_handler<A, J, C>(
    State(state): State<ReviewState<A, J, C>>,
    PathParam((company_id, applicant_id)): PathParam<(i64, i64)>,
    credentials: CompanyCredentials,
    JsonBody(change): JsonBody<StatusChange>,
) -> Result<impl IntoResponse, Response>
where
    A: ApplicantRepository + 'static,
    J: JobRepository + 'static,
    C: CompanyRepository + 'static,
{
    let company =
        authorize_company(state.companies.clone(), credentials, CompanyId(company_id)).await?;
    let service = state.applications;
    let applicant =
        run_blocking(move || service.update_status(company.id, ApplicantId(applicant_id), change))
            .await?
            .map_err(error_response)?;
    Ok(Json(applicant))
}

fn error_response(err: ApplicationServiceError) -> Response {
    let status = match &err {
        ApplicationServiceError::MissingFields
        | ApplicationServiceError::MissingFile
        | ApplicationServiceError::InvalidJobId(_)
        | ApplicationServiceError::UnknownJob(_)
        | ApplicationServiceError::JobClosed(_)
        | ApplicationServiceError::InvalidStatus
        | ApplicationServiceError::Rejected(_) => StatusCode::BAD_REQUEST,
        ApplicationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ApplicationServiceError::Storage(_) | ApplicationServiceError::Repository(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
