use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::detector::LandmarkDetector;
use crate::store::RecordStore;

#[derive(Clone)]
pub struct AppState {
    store: Arc<RecordStore>,
    detector: Arc<dyn LandmarkDetector>,
    config: Arc<Config>,
    started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<RecordStore>, detector: Arc<dyn LandmarkDetector>, config: &Config) -> Self {
        Self {
            store,
            detector,
            config: Arc::new(config.clone()),
            started_at: Instant::now(),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn detector(&self) -> &dyn LandmarkDetector {
        self.detector.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{MockDetector, UnavailableDetector};

    fn state_with(detector: Arc<dyn LandmarkDetector>) -> (AppState, tempfile::TempDir) {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = Arc::new(RecordStore::open(tmp.path().join("state.csv")).unwrap());
        let cfg = Config::from_env();
        (AppState::new(store, detector, &cfg), tmp)
    }

    #[test]
    fn detector_is_shared_between_clones() {
        let (state, _tmp) = state_with(Arc::new(MockDetector));
        let cloned = state.clone();
        assert_eq!(cloned.detector().name(), "mock");
        assert!(cloned.detector().is_available());
        assert_eq!(state.store().path(), cloned.store().path());
    }

    #[test]
    fn unavailable_detector_is_reported() {
        let (state, _tmp) = state_with(Arc::new(UnavailableDetector));
        assert!(!state.detector().is_available());
        assert!(state.uptime_secs() < 5);
    }
}
