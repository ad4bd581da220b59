use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::warn;

use super::credentials::CompanyCredentials;
use super::domain::{Company, CompanyId, CompanyLogin, CompanyRegistration};
use super::repository::CompanyRepository;
use super::service::{CompanyService, CompanyServiceError};
use crate::board::extract::{JsonBody, PathParam};
use crate::board::multipart::MultipartForm;
use crate::board::repository::RepositoryError;
use crate::board::run_blocking;

/// Router builder exposing registration, login and logo upload.
pub fn company_router<C>(service: Arc<CompanyService<C>>) -> Router
where
    C: CompanyRepository + 'static,
{
    let body_limit = service.uploads().policy().limits().request_body_limit();

    Router::new()
        .route("/api/companies", post(register_handler::<C>))
        .route("/api/companies/login", post(login_handler::<C>))
        .route("/api/companies/:company_id", get(profile_handler::<C>))
        .route("/api/companies/:company_id/logo", post(logo_handler::<C>))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(service)
}

pub(crate) async fn register_handler<C>(
    State(service): State<Arc<CompanyService<C>>>,
    JsonBody(registration): JsonBody<CompanyRegistration>,
) -> Result<impl IntoResponse, Response>
where
    C: CompanyRepository + 'static,
{
    let company = run_blocking(move || service.register(registration))
        .await?
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(company)))
}

pub(crate) async fn login_handler<C>(
    State(service): State<Arc<CompanyService<C>>>,
    JsonBody(login): JsonBody<CompanyLogin>,
) -> Result<impl IntoResponse, Response>
where
    C: CompanyRepository + 'static,
{
    let company = run_blocking(move || service.authenticate(login))
        .await?
        .map_err(error_response)?;
    Ok(Json(company))
}

pub(crate) async fn profile_handler<C>(
    State(service): State<Arc<CompanyService<C>>>,
    PathParam(company_id): PathParam<i64>,
) -> Result<impl IntoResponse, Response>
where
    C: CompanyRepository + 'static,
{
    let company = run_blocking(move || service.get(CompanyId(company_id)))
        .await?
        .map_err(error_response)?;
    Ok(Json(company))
}

pub(crate) async fn logo_handler<C>(
    State(service): State<Arc<CompanyService<C>>>,
    PathParam(company_id): PathParam<i64>,
    credentials: CompanyCredentials,
    mut form: MultipartForm,
) -> Result<impl IntoResponse, Response>
where
    C: CompanyRepository + 'static,
{
    let company = authorize_company(service.clone(), credentials, CompanyId(company_id)).await?;
    let file = form.take_file("file");
    let stored = run_blocking(move || service.upload_logo(company.id, file))
        .await?
        .map_err(error_response)?;

    Ok(Json(json!({
        "message": "logo uploaded",
        "path": stored.public_path,
    })))
}

/// Verify the credentials. Bad credentials give 401 and an inactive account 403.
pub(crate) async fn authenticate_company<C>(
    service: Arc<CompanyService<C>>,
    credentials: CompanyCredentials,
) -> Result<Company, Response>
where
    C: CompanyRepository + 'static,
{
    let login = credentials.into_login();
    run_blocking(move || service.authenticate(login))
        .await?
        .map_err(error_response)
}

/// As [`authenticate_company`], and the credentials must belong to `company_id` (else 403).
pub(crate) async fn authorize_company<C>(
    service: Arc<CompanyService<C>>,
    credentials: CompanyCredentials,
    company_id: CompanyId,
) -> Result<Company, Response>
where
    C: CompanyRepository + 'static,
{
    let company = authenticate_company(service, credentials).await?;

    if company.id != company_id {
        warn!(
            company_id = company.id.0,
            requested = company_id.0,
            "credentials used against another company"
        );
        let payload = json!({ "error": "credentials do not belong to this company" });
        return Err((StatusCode::FORBIDDEN, Json(payload)).into_response());
    }

    Ok(company)
}

pub(crate) fn error_response(err: CompanyServiceError) -> Response {
    let status = match &err {
        CompanyServiceError::MissingFields
        | CompanyServiceError::InvalidEmail
        | CompanyServiceError::WeakPassword
        | CompanyServiceError::MissingFile
        | CompanyServiceError::Rejected(_) => StatusCode::BAD_REQUEST,
        CompanyServiceError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        CompanyServiceError::Inactive => StatusCode::FORBIDDEN,
        CompanyServiceError::Repository(RepositoryError::Conflict { field }) => {
            let payload = json!({
                "error": format!("a company with this {field} is already registered"),
            });
            return (StatusCode::CONFLICT, Json(payload)).into_response();
        }
        CompanyServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        CompanyServiceError::Storage(_)
        | CompanyServiceError::Password(_)
        | CompanyServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
