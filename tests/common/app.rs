use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use image::RgbImage;
use tempfile::TempDir;

use hillani_measurements::config::{Config, DetectorConfig};
use hillani_measurements::detector::{
    DetectionError, DetectionOutcome, DetectorMode, LandmarkDetector, MockDetector,
    UnavailableDetector,
};
use hillani_measurements::routes::build_router;
use hillani_measurements::state::AppState;
use hillani_measurements::store::RecordStore;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
    pub csv_path: PathBuf,
    _temp_dir: TempDir,
}

/// Always reports that the photo holds no face.
pub struct BlankDetector;

#[axum::async_trait]
impl LandmarkDetector for BlankDetector {
    fn name(&self) -> &'static str {
        "blank"
    }

    async fn detect(&self, _image: &RgbImage) -> Result<DetectionOutcome, DetectionError> {
        Ok(DetectionOutcome::NoLandmarks)
    }
}

pub fn test_config(csv_path: &str, mode: DetectorMode) -> Config {
    // built directly so parallel tests never race on process env
    Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 8501,
        log_level: "info".to_string(),
        log_json: false,
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        csv_path: csv_path.to_string(),
        static_dir: "static".to_string(),
        cors_origin: "http://localhost:8501".to_string(),
        max_upload_bytes: 512 * 1024,
        detector: DetectorConfig {
            mode,
            url: String::new(),
            api_key: String::new(),
            timeout_secs: 5,
        },
    }
}

pub fn spawn_with_detector(detector: Arc<dyn LandmarkDetector>, mode: DetectorMode) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let csv_path = temp_dir.path().join("output").join("hillani_measurements.csv");
    let config = test_config(&csv_path.to_string_lossy(), mode);

    let store = Arc::new(RecordStore::open(&csv_path).expect("open store"));
    let state = AppState::new(store, detector, &config);
    let app = build_router(state.clone());

    TestApp {
        app,
        state,
        config,
        csv_path,
        _temp_dir: temp_dir,
    }
}

/// Default app: manual entry only, like a fresh deployment.
pub fn spawn_test_app() -> TestApp {
    spawn_with_detector(Arc::new(UnavailableDetector), DetectorMode::Unavailable)
}

pub fn spawn_mock_app() -> TestApp {
    spawn_with_detector(Arc::new(MockDetector), DetectorMode::Mock)
}

pub fn spawn_blank_detector_app() -> TestApp {
    spawn_with_detector(Arc::new(BlankDetector), DetectorMode::Mock)
}
