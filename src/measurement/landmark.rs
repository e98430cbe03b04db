use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A point in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Anatomical landmarks the measurement engine requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkName {
    NoseTip,
    Nasion,
    AlarLeft,
    AlarRight,
}

impl LandmarkName {
    pub const REQUIRED: [LandmarkName; 4] = [
        LandmarkName::NoseTip,
        LandmarkName::Nasion,
        LandmarkName::AlarLeft,
        LandmarkName::AlarRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LandmarkName::NoseTip => "nose_tip",
            LandmarkName::Nasion => "nasion",
            LandmarkName::AlarLeft => "alar_left",
            LandmarkName::AlarRight => "alar_right",
        }
    }
}

impl fmt::Display for LandmarkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pixel dimensions of the image the landmarks were located in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFrame {
    pub width: u32,
    pub height: u32,
}

/// Named landmarks sharing one coordinate frame.
///
/// Names outside [`LandmarkName::REQUIRED`] are carried along untouched so
/// manual annotations can include extra reference points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<ImageFrame>,
    pub points: BTreeMap<String, Point2D>,
}

impl LandmarkSet {
    pub fn new(frame: Option<ImageFrame>) -> Self {
        Self {
            frame,
            points: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: LandmarkName, point: Point2D) -> Self {
        self.insert(name, point);
        self
    }

    pub fn insert(&mut self, name: LandmarkName, point: Point2D) {
        self.points.insert(name.as_str().to_string(), point);
    }

    pub fn get(&self, name: LandmarkName) -> Option<Point2D> {
        self.points.get(name.as_str()).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_serialize_as_snake_case() {
        let json = serde_json::to_value(LandmarkName::AlarLeft).unwrap();
        assert_eq!(json, "alar_left");
        for name in LandmarkName::REQUIRED {
            let json = serde_json::to_value(name).unwrap();
            assert_eq!(json, name.as_str());
        }
    }

    #[test]
    fn set_json_shape_is_name_keyed() {
        let set = LandmarkSet::new(Some(ImageFrame {
            width: 640,
            height: 480,
        }))
        .with(LandmarkName::NoseTip, Point2D::new(1.0, 2.0));

        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["frame"]["width"], 640);
        assert_eq!(json["points"]["nose_tip"]["x"], 1.0);

        let back: LandmarkSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn frame_is_optional_on_input() {
        let set: LandmarkSet = serde_json::from_value(serde_json::json!({
            "points": { "nasion": { "x": 3.0, "y": 4.0 } }
        }))
        .unwrap();
        assert!(set.frame.is_none());
        assert_eq!(set.get(LandmarkName::Nasion), Some(Point2D::new(3.0, 4.0)));
        assert_eq!(set.get(LandmarkName::NoseTip), None);
    }

    #[test]
    fn non_finite_points_are_detected() {
        assert!(Point2D::new(0.0, -3.5).is_finite());
        assert!(!Point2D::new(f64::NAN, 0.0).is_finite());
        assert!(!Point2D::new(0.0, f64::INFINITY).is_finite());
    }
}
