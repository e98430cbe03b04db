use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::de::DeserializeOwned;

use crate::constants::PHOTO_FIELD;
use crate::response::AppError;
use crate::state::AppState;
use crate::validation::validate_upload_size;

/// A wrapper around `axum::Json<T>` that returns `AppError` on deserialization failure
/// instead of Axum's default plain-text rejection.
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection_to_app_error(rejection)),
        }
    }
}

fn json_rejection_to_app_error(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(e) => {
            // serde's message names the offending field and expected choices
            tracing::warn!(error = %e, "JSON data deserialization failed");
            AppError::bad_request("INVALID_REQUEST_BODY", &e.body_text())
        }
        JsonRejection::JsonSyntaxError(e) => {
            tracing::warn!(error = %e, "JSON syntax parsing failed");
            AppError::bad_request("INVALID_REQUEST_BODY", "Request body is not valid JSON")
        }
        JsonRejection::MissingJsonContentType(e) => {
            tracing::warn!(error = %e, "Missing or invalid JSON Content-Type");
            AppError::bad_request("INVALID_REQUEST_BODY", "Expected Content-Type: application/json")
        }
        other => {
            tracing::warn!(error = %other, "Unexpected JSON body rejection");
            AppError::bad_request("INVALID_REQUEST_BODY", "Invalid request body")
        }
    }
}

impl<T> std::ops::Deref for JsonBody<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: serde::Serialize> IntoResponse for JsonBody<T> {
    fn into_response(self) -> axum::response::Response {
        axum::Json(self.0).into_response()
    }
}

/// Raw bytes of the `photo` field of a multipart upload.
#[derive(Debug)]
pub struct PhotoUpload {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

#[axum::async_trait]
impl FromRequest<AppState> for PhotoUpload {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state).await.map_err(|e| {
            tracing::warn!(error = %e, "Multipart rejection");
            AppError::bad_request("INVALID_UPLOAD", "Expected a multipart/form-data upload")
        })?;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            if field.name() != Some(PHOTO_FIELD) {
                continue;
            }
            let file_name = field.file_name().map(str::to_string);
            let bytes = field.bytes().await.map_err(multipart_error)?;
            if bytes.is_empty() {
                return Err(AppError::bad_request("INVALID_UPLOAD", "Uploaded photo is empty"));
            }
            validate_upload_size(bytes.len(), state.config().max_upload_bytes)
                .map_err(|msg| AppError::payload_too_large(&msg))?;
            return Ok(PhotoUpload {
                file_name,
                bytes: bytes.to_vec(),
            });
        }

        Err(AppError::bad_request(
            "INVALID_UPLOAD",
            "Upload an image to begin (missing 'photo' field)",
        ))
    }
}

fn multipart_error(e: MultipartError) -> AppError {
    tracing::warn!(error = %e, "Failed to read multipart body");
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large(&e.body_text())
    } else {
        AppError::bad_request("INVALID_UPLOAD", &e.body_text())
    }
}
