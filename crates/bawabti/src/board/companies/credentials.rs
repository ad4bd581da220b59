use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::json;

use super::domain::CompanyLogin;

const CHALLENGE: &str = "Basic realm=\"bawabti\", charset=\"UTF-8\"";

/// Company email and password taken from an `Authorization: Basic` header.
#[derive(Debug, Clone)]
pub struct CompanyCredentials(pub CompanyLogin);

impl CompanyCredentials {
    pub fn into_login(self) -> CompanyLogin {
        self.0
    }
}

/// `Basic base64(email:password)`; anything else yields `None`.
fn decode_basic(value: &str) -> Option<CompanyLogin> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (email, password) = text.split_once(':')?;
    Some(CompanyLogin {
        email: email.to_string(),
        password: password.to_string(),
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for CompanyCredentials
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(decode_basic)
            .map(CompanyCredentials)
            .ok_or_else(credentials_required)
    }
}

fn credentials_required() -> Response {
    let payload = json!({ "error": "company credentials required" });
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, CHALLENGE)],
        Json(payload),
    )
        .into_response()
}

/// `Authorization` header value for the given login.
pub fn basic_authorization(email: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{email}:{password}")))
}
