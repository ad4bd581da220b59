use std::collections::hash_map::Entry;
use std::collections::HashMap;

use axum::async_trait;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

use crate::board::extract::ApiRejection;
use crate::uploads::UploadedFile;

/// Text fields and files of one multipart request, fully buffered.
///
/// A repeated field name keeps its first occurrence.
#[derive(Debug, Default)]
pub(crate) struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    pub(crate) async fn read(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let bytes = field.bytes().await?;
                    // an unselected file input still arrives as a part with an empty filename
                    if filename.is_empty() {
                        continue;
                    }
                    if let Entry::Vacant(slot) = form.files.entry(name) {
                        slot.insert(UploadedFile::new(filename, bytes.to_vec()));
                    }
                }
                None => {
                    let value = field.text().await?;
                    form.fields.entry(name).or_insert(value);
                }
            }
        }

        Ok(form)
    }

    /// Trimmed value of a text field; blank counts as absent.
    pub(crate) fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    pub(crate) fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

#[async_trait]
impl<S> FromRequest<S> for MultipartForm
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| ApiRejection::from(rejection).into_response())?;
        Self::read(multipart).await.map_err(rejection_response)
    }
}

fn rejection_response(err: MultipartError) -> Response {
    let status = err.status();
    warn!(%status, error = %err, "unreadable multipart body");
    let payload = json!({ "error": err.body_text() });
    (status, Json(payload)).into_response()
}
