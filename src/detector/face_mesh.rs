//! Client for a face-mesh landmark service.
//!
//! The service receives the photo as PNG and answers with every detected
//! face as a list of mesh vertices in normalized `[0, 1]` image coordinates:
//!
//! ```json
//! { "faces": [ { "landmarks": [ { "x": 0.51, "y": 0.43 }, ... ] } ] }
//! ```
//!
//! Only the first face is used. Nasal landmarks are read from fixed mesh
//! vertex indices and scaled back to pixels.

use image::RgbImage;
use serde::Deserialize;

use super::{Detection, DetectionError, DetectionOutcome, LandmarkDetector};
use crate::config::DetectorConfig;
use crate::constants::{MESH_ALAR_LEFT, MESH_ALAR_RIGHT, MESH_NASION, MESH_NOSE_TIP};
use crate::imaging::encode_png;
use crate::measurement::{ImageFrame, LandmarkName, LandmarkSet, Point2D};
use crate::metadata::ViewAuto;

const MESH_INDICES: [(LandmarkName, usize); 4] = [
    (LandmarkName::NoseTip, MESH_NOSE_TIP),
    (LandmarkName::Nasion, MESH_NASION),
    (LandmarkName::AlarLeft, MESH_ALAR_LEFT),
    (LandmarkName::AlarRight, MESH_ALAR_RIGHT),
];

#[derive(Debug, Clone, Deserialize)]
pub struct FaceMeshResponse {
    #[serde(default)]
    pub faces: Vec<FaceMeshFace>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FaceMeshFace {
    pub landmarks: Vec<NormalizedPoint>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone)]
pub struct FaceMeshClient {
    url: String,
    api_key: String,
    client: reqwest::Client,
}

impl FaceMeshClient {
    pub fn new(config: &DetectorConfig) -> Result<Self, DetectionError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DetectionError::Config(e.to_string()))?;
        Ok(Self {
            url: config.url.trim().to_string(),
            api_key: config.api_key.clone(),
            client,
        })
    }
}

#[axum::async_trait]
impl LandmarkDetector for FaceMeshClient {
    fn name(&self) -> &'static str {
        "face-mesh"
    }

    async fn detect(&self, image: &RgbImage) -> Result<DetectionOutcome, DetectionError> {
        let frame = ImageFrame {
            width: image.width(),
            height: image.height(),
        };
        let body = encode_png(image).map_err(|e| DetectionError::Encode(e.to_string()))?;

        let mut request = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "image/png")
            .body(body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let started = std::time::Instant::now();
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Face-mesh service rejected request");
            return Err(DetectionError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: FaceMeshResponse = response
            .json()
            .await
            .map_err(|e| DetectionError::InvalidResponse(e.to_string()))?;
        tracing::debug!(
            faces = parsed.faces.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "Face-mesh response received"
        );

        landmarks_from_mesh(&parsed, frame)
    }
}

fn map_reqwest_error(e: reqwest::Error) -> DetectionError {
    if e.is_timeout() {
        DetectionError::Timeout
    } else {
        DetectionError::Network(e.to_string())
    }
}

/// Picks the nasal vertices of the first face and converts them to pixels.
pub fn landmarks_from_mesh(
    response: &FaceMeshResponse,
    frame: ImageFrame,
) -> Result<DetectionOutcome, DetectionError> {
    let Some(face) = response.faces.first() else {
        return Ok(DetectionOutcome::NoLandmarks);
    };
    if face.landmarks.is_empty() {
        return Ok(DetectionOutcome::NoLandmarks);
    }

    let mut landmarks = LandmarkSet::new(Some(frame));
    for (name, index) in MESH_INDICES {
        let p = face.landmarks.get(index).ok_or_else(|| {
            DetectionError::InvalidResponse(format!(
                "mesh has {} vertices, {name} needs index {index}",
                face.landmarks.len()
            ))
        })?;
        if !(p.x.is_finite() && p.y.is_finite()) {
            return Err(DetectionError::InvalidResponse(format!(
                "{name} vertex is not a finite coordinate"
            )));
        }
        landmarks.insert(
            name,
            Point2D::new(p.x * f64::from(frame.width), p.y * f64::from(frame.height)),
        );
    }

    Ok(DetectionOutcome::Found(Detection {
        landmarks,
        view_auto: ViewAuto::FrontalLike,
    }))
}
