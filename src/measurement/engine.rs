use serde::{Deserialize, Serialize};

use super::landmark::{LandmarkName, LandmarkSet, Point2D};
use super::MeasurementError;

/// Goode projection ratio with the reason it may be absent made explicit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "camelCase")]
pub enum GoodeRatio {
    Computed(f64),
    /// Nasion and nose tip coincide, so the ratio has no denominator.
    Degenerate,
    /// No measurement was run for the record.
    NotComputed,
}

impl GoodeRatio {
    pub fn value(&self) -> Option<f64> {
        match self {
            GoodeRatio::Computed(v) => Some(*v),
            GoodeRatio::Degenerate | GoodeRatio::NotComputed => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementResult {
    pub nasal_length_px: f64,
    pub tip_projection_px: f64,
    pub goode_ratio: GoodeRatio,
}

/// The four required landmarks, validated finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NasalLandmarks {
    pub nose_tip: Point2D,
    pub nasion: Point2D,
    pub alar_left: Point2D,
    pub alar_right: Point2D,
}

impl NasalLandmarks {
    pub fn from_set(set: &LandmarkSet) -> Result<Self, MeasurementError> {
        if let Some(frame) = set.frame {
            if frame.width == 0 || frame.height == 0 {
                return Err(MeasurementError::InvalidLandmarkSet {
                    landmark: None,
                    reason: format!(
                        "image frame {}x{} has a zero dimension",
                        frame.width, frame.height
                    ),
                });
            }
        }

        let pick = |name: LandmarkName| -> Result<Point2D, MeasurementError> {
            let point = set
                .get(name)
                .ok_or_else(|| MeasurementError::missing(name))?;
            if !point.is_finite() {
                return Err(MeasurementError::InvalidLandmarkSet {
                    landmark: Some(name),
                    reason: format!("non-finite coordinate ({}, {})", point.x, point.y),
                });
            }
            Ok(point)
        };

        Ok(Self {
            nose_tip: pick(LandmarkName::NoseTip)?,
            nasion: pick(LandmarkName::Nasion)?,
            alar_left: pick(LandmarkName::AlarLeft)?,
            alar_right: pick(LandmarkName::AlarRight)?,
        })
    }

    pub fn alar_midpoint(&self) -> Point2D {
        midpoint(self.alar_left, self.alar_right)
    }
}

pub fn distance(p1: Point2D, p2: Point2D) -> f64 {
    (p1.x - p2.x).hypot(p1.y - p2.y)
}

pub fn midpoint(a: Point2D, b: Point2D) -> Point2D {
    Point2D::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Computes nasal length, tip projection and the Goode ratio.
pub fn measure(set: &LandmarkSet) -> Result<MeasurementResult, MeasurementError> {
    let lm = NasalLandmarks::from_set(set)?;
    measure_landmarks(&lm)
}

pub fn measure_landmarks(lm: &NasalLandmarks) -> Result<MeasurementResult, MeasurementError> {
    let alar_mid = lm.alar_midpoint();
    let nasal_length_px = distance(lm.nasion, lm.nose_tip);
    let tip_projection_px = distance(alar_mid, lm.nose_tip);

    if !nasal_length_px.is_finite() || !tip_projection_px.is_finite() {
        return Err(MeasurementError::InvalidLandmarkSet {
            landmark: None,
            reason: "coordinates too large, distance overflows".to_string(),
        });
    }

    let goode_ratio = if nasal_length_px > 0.0 {
        GoodeRatio::Computed(tip_projection_px / nasal_length_px)
    } else {
        GoodeRatio::Degenerate
    };

    Ok(MeasurementResult {
        nasal_length_px,
        tip_projection_px,
        goode_ratio,
    })
}
