pub mod engine;
pub mod landmark;

use thiserror::Error;

pub use engine::{measure, GoodeRatio, MeasurementResult, NasalLandmarks};
pub use landmark::{ImageFrame, LandmarkName, LandmarkSet, Point2D};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasurementError {
    #[error("invalid landmark set{}: {reason}", landmark_suffix(.landmark))]
    InvalidLandmarkSet {
        landmark: Option<LandmarkName>,
        reason: String,
    },
}

fn landmark_suffix(landmark: &Option<LandmarkName>) -> String {
    landmark.map(|l| format!(" ({l})")).unwrap_or_default()
}

impl MeasurementError {
    pub(crate) fn missing(name: LandmarkName) -> Self {
        MeasurementError::InvalidLandmarkSet {
            landmark: Some(name),
            reason: "required landmark is missing".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_the_landmark() {
        let err = MeasurementError::missing(LandmarkName::Nasion);
        assert_eq!(
            err.to_string(),
            "invalid landmark set (nasion): required landmark is missing"
        );
    }

    #[test]
    fn message_without_landmark() {
        let err = MeasurementError::InvalidLandmarkSet {
            landmark: None,
            reason: "bad frame".to_string(),
        };
        assert_eq!(err.to_string(), "invalid landmark set: bad frame");
    }
}
