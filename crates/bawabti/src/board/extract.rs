//! Extractor wrappers whose rejections keep the `{"error": ...}` body shape.

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::debug;

/// JSON request body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiRejection))]
pub(crate) struct JsonBody<T>(pub(crate) T);

/// Typed URL path parameters.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiRejection))]
pub(crate) struct PathParam<T>(pub(crate) T);

/// A request that never reached the handler.
#[derive(Debug)]
pub(crate) enum ApiRejection {
    Json(JsonRejection),
    Path(PathRejection),
    Multipart(MultipartRejection),
}

impl From<JsonRejection> for ApiRejection {
    fn from(value: JsonRejection) -> Self {
        Self::Json(value)
    }
}

impl From<PathRejection> for ApiRejection {
    fn from(value: PathRejection) -> Self {
        Self::Path(value)
    }
}

impl From<MultipartRejection> for ApiRejection {
    fn from(value: MultipartRejection) -> Self {
        Self::Multipart(value)
    }
}

impl IntoResponse for ApiRejection {
    fn into_response(self) -> Response {
        let (status, message): (StatusCode, String) = match &self {
            ApiRejection::Json(rejection) => (rejection.status(), rejection.body_text()),
            ApiRejection::Path(rejection) => (rejection.status(), rejection.body_text()),
            ApiRejection::Multipart(rejection) => (rejection.status(), rejection.body_text()),
        };
        debug!(%status, error = %message, "request rejected by extractor");
        (status, Json(json!({ "error": message }))).into_response()
    }
}
