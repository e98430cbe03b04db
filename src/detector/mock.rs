use image::RgbImage;

use super::{Detection, DetectionError, DetectionOutcome, LandmarkDetector};
use crate::measurement::{ImageFrame, LandmarkName, LandmarkSet, Point2D};
use crate::metadata::ViewAuto;

/// Relative positions of a centred frontal face.
const MOCK_LAYOUT: [(LandmarkName, f64, f64); 4] = [
    (LandmarkName::NoseTip, 0.50, 0.62),
    (LandmarkName::Nasion, 0.50, 0.38),
    (LandmarkName::AlarLeft, 0.44, 0.60),
    (LandmarkName::AlarRight, 0.56, 0.60),
];

/// Deterministic detector for demos and local development.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockDetector;

#[axum::async_trait]
impl LandmarkDetector for MockDetector {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn detect(&self, image: &RgbImage) -> Result<DetectionOutcome, DetectionError> {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return Ok(DetectionOutcome::NoLandmarks);
        }

        let mut landmarks = LandmarkSet::new(Some(ImageFrame {
            width: w,
            height: h,
        }));
        for (name, fx, fy) in MOCK_LAYOUT {
            landmarks.insert(name, Point2D::new(fx * f64::from(w), fy * f64::from(h)));
        }

        Ok(DetectionOutcome::Found(Detection {
            landmarks,
            view_auto: ViewAuto::FrontalLike,
        }))
    }
}
