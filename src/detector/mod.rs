pub mod face_mesh;
pub mod mock;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use image::RgbImage;
use serde::Serialize;

use crate::config::DetectorConfig;
use crate::measurement::LandmarkSet;
use crate::metadata::ViewAuto;

pub use face_mesh::FaceMeshClient;
pub use mock::MockDetector;

/// Which landmark detector the process runs with. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectorMode {
    Unavailable,
    Mock,
    FaceMesh,
}

impl FromStr for DetectorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unavailable" | "disabled" | "none" | "off" => Ok(DetectorMode::Unavailable),
            "mock" => Ok(DetectorMode::Mock),
            "face-mesh" | "facemesh" | "remote" => Ok(DetectorMode::FaceMesh),
            other => Err(format!("unknown detector mode '{other}'")),
        }
    }
}

impl fmt::Display for DetectorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectorMode::Unavailable => write!(f, "unavailable"),
            DetectorMode::Mock => write!(f, "mock"),
            DetectorMode::FaceMesh => write!(f, "face-mesh"),
        }
    }
}

/// Landmarks located in the pixel space of the analysed image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub landmarks: LandmarkSet,
    pub view_auto: ViewAuto,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetectionOutcome {
    Found(Detection),
    /// The detector ran but saw no face.
    NoLandmarks,
}

#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("landmark detector is not available on this deployment")]
    Unavailable,
    #[error("invalid detector configuration: {0}")]
    Config(String),
    #[error("detector request timed out")]
    Timeout,
    #[error("detector network error: {0}")]
    Network(String),
    #[error("detector api error: status={status}, message={message}")]
    ApiError { status: u16, message: String },
    #[error("detector returned an unusable response: {0}")]
    InvalidResponse(String),
    #[error("failed to prepare image for detector: {0}")]
    Encode(String),
}

#[axum::async_trait]
pub trait LandmarkDetector: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool {
        true
    }

    async fn detect(&self, image: &RgbImage) -> Result<DetectionOutcome, DetectionError>;
}

/// Stand-in used when no detector is configured; callers fall back to manual entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableDetector;

#[axum::async_trait]
impl LandmarkDetector for UnavailableDetector {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn detect(&self, _image: &RgbImage) -> Result<DetectionOutcome, DetectionError> {
        Err(DetectionError::Unavailable)
    }
}

/// Validate detector configuration at startup.
pub fn validate_config(config: &DetectorConfig) -> Result<(), DetectionError> {
    if config.mode == DetectorMode::FaceMesh {
        let url = config.url.trim();
        if url.is_empty() {
            return Err(DetectionError::Config(
                "DETECTOR_MODE=face-mesh requires DETECTOR_URL".to_string(),
            ));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DetectionError::Config(format!(
                "DETECTOR_URL '{url}' must be an http(s) URL"
            )));
        }
    }
    Ok(())
}

pub fn select_detector(config: &DetectorConfig) -> Result<Arc<dyn LandmarkDetector>, DetectionError> {
    validate_config(config)?;
    let detector: Arc<dyn LandmarkDetector> = match config.mode {
        DetectorMode::Unavailable => Arc::new(UnavailableDetector),
        DetectorMode::Mock => Arc::new(MockDetector),
        DetectorMode::FaceMesh => Arc::new(FaceMeshClient::new(config)?),
    };
    tracing::info!(detector = detector.name(), "Landmark detector selected");
    Ok(detector)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(mode: DetectorMode, url: &str) -> DetectorConfig {
        DetectorConfig {
            mode,
            url: url.to_string(),
            api_key: String::new(),
            timeout_secs: 1,
        }
    }

    #[test]
    fn mode_parsing_accepts_aliases() {
        assert_eq!("face-mesh".parse::<DetectorMode>(), Ok(DetectorMode::FaceMesh));
        assert_eq!(" Remote ".parse::<DetectorMode>(), Ok(DetectorMode::FaceMesh));
        assert_eq!("off".parse::<DetectorMode>(), Ok(DetectorMode::Unavailable));
        assert!("mediapipe-gpu".parse::<DetectorMode>().is_err());
    }

    #[test]
    fn face_mesh_requires_url() {
        assert!(validate_config(&cfg(DetectorMode::FaceMesh, "")).is_err());
        assert!(validate_config(&cfg(DetectorMode::FaceMesh, "ftp://x")).is_err());
        assert!(validate_config(&cfg(DetectorMode::FaceMesh, "http://127.0.0.1:9000/mesh")).is_ok());
        assert!(validate_config(&cfg(DetectorMode::Mock, "")).is_ok());
    }

    #[test]
    fn selection_follows_mode() {
        let d = select_detector(&cfg(DetectorMode::Unavailable, "")).unwrap();
        assert!(!d.is_available());
        assert_eq!(d.name(), "unavailable");

        let d = select_detector(&cfg(DetectorMode::Mock, "")).unwrap();
        assert!(d.is_available());

        let d = select_detector(&cfg(DetectorMode::FaceMesh, "http://localhost:1/mesh")).unwrap();
        assert_eq!(d.name(), "face-mesh");
    }

    #[tokio::test]
    async fn unavailable_stub_reports_unavailable() {
        let result = UnavailableDetector.detect(&RgbImage::new(4, 4)).await;
        assert!(matches!(result, Err(DetectionError::Unavailable)));
    }
}
