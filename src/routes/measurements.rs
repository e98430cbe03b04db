use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use serde::Serialize;

use crate::detector::{Detection, DetectionOutcome};
use crate::extractors::{JsonBody, PhotoUpload};
use crate::imaging::{self, Photo};
use crate::measurement::engine::measure_landmarks;
use crate::measurement::{ImageFrame, LandmarkSet, MeasurementResult, NasalLandmarks, Point2D};
use crate::metadata::ViewAuto;
use crate::response::{ok, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(measure_manual))
}

pub fn detect_router() -> Router<AppState> {
    Router::new()
        .route("/", post(detect))
        .route("/overlay", post(detect_overlay))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MeasureResponse {
    measurement: MeasurementResult,
    alar_midpoint: Point2D,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DetectResponse {
    detector: &'static str,
    image: ImageFrame,
    view_auto: ViewAuto,
    landmarks: LandmarkSet,
    alar_midpoint: Point2D,
    measurement: MeasurementResult,
}

fn measure_set(set: &LandmarkSet) -> Result<MeasureResponse, AppError> {
    let lm = NasalLandmarks::from_set(set)?;
    Ok(MeasureResponse {
        measurement: measure_landmarks(&lm)?,
        alar_midpoint: lm.alar_midpoint(),
    })
}

/// Measures manually annotated landmarks.
async fn measure_manual(
    JsonBody(set): JsonBody<LandmarkSet>,
) -> Result<impl IntoResponse, AppError> {
    Ok(ok(measure_set(&set)?))
}

async fn decode_upload(upload: PhotoUpload) -> Result<Photo, AppError> {
    let file_name = upload.file_name.clone();
    let photo = tokio::task::spawn_blocking(move || imaging::decode_photo(&upload.bytes))
        .await
        .map_err(|e| AppError::internal(&format!("decode task failed: {e}")))?
        .map_err(|e| {
            tracing::warn!(file_name = ?file_name, error = %e, "Uploaded photo rejected");
            e
        })?;
    Ok(photo)
}

async fn run_detection(state: &AppState, photo: &Photo) -> Result<Detection, AppError> {
    match state.detector().detect(&photo.rgb).await? {
        DetectionOutcome::Found(detection) => Ok(detection),
        DetectionOutcome::NoLandmarks => Err(AppError::unprocessable(
            "DETECTION_FAILED",
            "No face landmarks detected. Try a clearer image.",
        )),
    }
}

async fn detect(
    State(state): State<AppState>,
    upload: PhotoUpload,
) -> Result<impl IntoResponse, AppError> {
    if !state.detector().is_available() {
        return Err(crate::detector::DetectionError::Unavailable.into());
    }
    let photo = decode_upload(upload).await?;
    let detection = run_detection(&state, &photo).await?;
    let measured = measure_set(&detection.landmarks)?;

    tracing::info!(
        detector = state.detector().name(),
        nasal_length_px = measured.measurement.nasal_length_px,
        goode_ratio = ?measured.measurement.goode_ratio.value(),
        "Auto-detect measured photo"
    );

    Ok(ok(DetectResponse {
        detector: state.detector().name(),
        image: photo.frame(),
        view_auto: detection.view_auto,
        landmarks: detection.landmarks,
        alar_midpoint: measured.alar_midpoint,
        measurement: measured.measurement,
    }))
}

/// PNG preview of the photo with the detected landmarks marked.
async fn detect_overlay(
    State(state): State<AppState>,
    upload: PhotoUpload,
) -> Result<impl IntoResponse, AppError> {
    if !state.detector().is_available() {
        return Err(crate::detector::DetectionError::Unavailable.into());
    }
    let photo = decode_upload(upload).await?;
    let detection = run_detection(&state, &photo).await?;

    let png = tokio::task::spawn_blocking(move || {
        let overlay = imaging::draw_landmark_overlay(&photo.rgb, &detection.landmarks);
        imaging::encode_png(&overlay)
    })
    .await
    .map_err(|e| AppError::internal(&format!("overlay task failed: {e}")))??;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}
