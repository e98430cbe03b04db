use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::detector::DetectionError;
use crate::imaging::DecodeError;
use crate::measurement::MeasurementError;
use crate::metadata::RecordError;
use crate::store::StoreError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub code: String,
    pub message: String,
    pub trace_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub is_operational: bool,
}

impl AppError {
    fn operational(status: StatusCode, code: &str, message: &str) -> Self {
        Self {
            status,
            code: code.to_string(),
            message: message.to_string(),
            is_operational: true,
        }
    }

    pub fn bad_request(code: &str, message: &str) -> Self {
        Self::operational(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn not_found(message: &str) -> Self {
        Self::operational(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn payload_too_large(message: &str) -> Self {
        Self::operational(StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", message)
    }

    pub fn unprocessable(code: &str, message: &str) -> Self {
        Self::operational(StatusCode::UNPROCESSABLE_ENTITY, code, message)
    }

    pub fn service_unavailable(code: &str, message: &str) -> Self {
        Self::operational(StatusCode::SERVICE_UNAVAILABLE, code, message)
    }

    pub fn bad_gateway(code: &str, message: &str) -> Self {
        Self::operational(StatusCode::BAD_GATEWAY, code, message)
    }

    /// Storage failures the user must see (disk full, permissions), so the
    /// message is kept even though the status is 500.
    pub fn store_failed(code: &str, message: &str) -> Self {
        Self::operational(StatusCode::INTERNAL_SERVER_ERROR, code, message)
    }

    pub fn internal(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR".to_string(),
            message: message.to_string(),
            is_operational: false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let exposed_message = if self.is_operational {
            self.message.clone()
        } else {
            "Internal server error".to_string()
        };

        if self.is_operational {
            tracing::warn!(status = %self.status, code = %self.code, error = %self.message, "API error");
        } else {
            tracing::error!(status = %self.status, code = %self.code, error = %self.message, "Internal API error");
        }

        (
            self.status,
            Json(ErrorBody {
                success: false,
                code: self.code,
                message: exposed_message,
                trace_id: None,
            }),
        )
            .into_response()
    }
}

impl From<MeasurementError> for AppError {
    fn from(value: MeasurementError) -> Self {
        AppError::bad_request("INVALID_LANDMARK_SET", &value.to_string())
    }
}

impl From<DecodeError> for AppError {
    fn from(value: DecodeError) -> Self {
        match value {
            DecodeError::Encode(_) => AppError::internal(&value.to_string()),
            _ => AppError::bad_request("DECODE_FAILED", &value.to_string()),
        }
    }
}

impl From<DetectionError> for AppError {
    fn from(value: DetectionError) -> Self {
        match &value {
            DetectionError::Unavailable => AppError::service_unavailable(
                "DETECTOR_UNAVAILABLE",
                "Auto-detect is unavailable on this deployment. \
                 You can still enter landmarks manually and save data.",
            ),
            DetectionError::Config(_) | DetectionError::Encode(_) => {
                AppError::internal(&value.to_string())
            }
            _ => AppError::bad_gateway("DETECTOR_ERROR", &format!("Auto-detect failed: {value}")),
        }
    }
}

// Read and write failures both surface to the user; the save route maps its
// own errors so they carry STORE_WRITE_FAILED.
impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        AppError::store_failed("STORE_READ_FAILED", &value.to_string())
    }
}

impl From<RecordError> for AppError {
    fn from(value: RecordError) -> Self {
        match value {
            RecordError::Validation(msg) => AppError::bad_request("VALIDATION_ERROR", msg),
            RecordError::Measurement(e) => e.into(),
        }
    }
}

pub fn ok<T: Serialize>(data: T) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data,
        }),
    )
}

pub fn created<T: Serialize>(data: T) -> impl IntoResponse {
    (
        StatusCode::CREATED,
        Json(ApiResponse {
            success: true,
            data,
        }),
    )
}
