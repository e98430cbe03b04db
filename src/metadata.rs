//! Session metadata captured by the form and the record a save produces.

use std::fmt;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PATIENT_ID;
use crate::measurement::{self, GoodeRatio, LandmarkSet, MeasurementError, MeasurementResult};
use crate::validation::validate_patient_id;

/// Declares a single-choice form field whose wire value is a fixed label.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            #[default]
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn labels() -> Vec<&'static str> {
                Self::ALL.iter().map(|c| c.as_str()).collect()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum!(RaterId {
    Auto => "Auto",
    Rater1 => "Rater1",
    Rater2 => "Rater2",
    Other => "Other",
});

choice_enum!(ViewHint {
    Auto => "Auto",
    Basal => "Basal",
    Frontal => "Frontal",
    Lateral => "Lateral",
});

choice_enum!(
    /// View label assigned by the detector, blank for manual entry.
    ViewAuto {
        Unset => "",
        FrontalLike => "Frontal-like",
    }
);

choice_enum!(PhotoQuality {
    Ok => "OK",
    Blur => "Blur",
    Shadow => "Shadow",
    Perspective => "Perspective",
});

choice_enum!(SkinThickness {
    Unspecified => "",
    Thin => "Thin",
    Medium => "Medium",
    Thick => "Thick",
});

choice_enum!(CartilageStiffness {
    Unspecified => "",
    Soft => "Soft",
    Moderate => "Moderate",
    Firm => "Firm",
});

choice_enum!(TipSupport {
    Unspecified => "",
    Weak => "Weak",
    Moderate => "Moderate",
    Strong => "Strong",
});

fn default_patient_id() -> String {
    DEFAULT_PATIENT_ID.to_string()
}

/// Everything one "save" action submits. Built fresh per request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    #[serde(default = "default_patient_id")]
    pub patient_id: String,
    #[serde(default)]
    pub rater_id: RaterId,
    #[serde(default)]
    pub view_hint: ViewHint,
    #[serde(default)]
    pub view_auto: ViewAuto,
    #[serde(default)]
    pub photo_date: Option<NaiveDate>,
    #[serde(default)]
    pub photo_quality: PhotoQuality,
    #[serde(default)]
    pub skin_thickness: SkinThickness,
    #[serde(default)]
    pub cartilage_stiffness: CartilageStiffness,
    #[serde(default)]
    pub tip_support: TipSupport,
    #[serde(default)]
    pub landmarks: Option<LandmarkSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRecord {
    pub patient_id: String,
    pub rater_id: RaterId,
    pub view_hint: ViewHint,
    pub view_auto: ViewAuto,
    pub photo_date: NaiveDate,
    pub photo_quality: PhotoQuality,
    pub skin_thickness: SkinThickness,
    pub cartilage_stiffness: CartilageStiffness,
    pub tip_support: TipSupport,
    pub measurement: Option<MeasurementResult>,
}

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("{0}")]
    Validation(&'static str),
    #[error(transparent)]
    Measurement(#[from] MeasurementError),
}

impl SaveRequest {
    /// Validates the metadata and runs the measurement engine on any landmarks.
    pub fn into_record(self) -> Result<MeasurementRecord, RecordError> {
        let patient_id = self.patient_id.trim().to_string();
        validate_patient_id(&patient_id).map_err(RecordError::Validation)?;

        let measurement = self
            .landmarks
            .as_ref()
            .map(measurement::measure)
            .transpose()?;

        // A label without landmarks would claim a detection that never ran.
        let view_auto = if measurement.is_some() {
            self.view_auto
        } else {
            ViewAuto::Unset
        };

        Ok(MeasurementRecord {
            patient_id,
            rater_id: self.rater_id,
            view_hint: self.view_hint,
            view_auto,
            photo_date: self.photo_date.unwrap_or_else(|| Utc::now().date_naive()),
            photo_quality: self.photo_quality,
            skin_thickness: self.skin_thickness,
            cartilage_stiffness: self.cartilage_stiffness,
            tip_support: self.tip_support,
            measurement,
        })
    }
}

impl MeasurementRecord {
    pub fn goode_ratio(&self) -> GoodeRatio {
        self.measurement
            .map(|m| m.goode_ratio)
            .unwrap_or(GoodeRatio::NotComputed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::{LandmarkName, Point2D};

    fn frontal_landmarks() -> LandmarkSet {
        LandmarkSet::new(None)
            .with(LandmarkName::NoseTip, Point2D::new(100.0, 200.0))
            .with(LandmarkName::Nasion, Point2D::new(100.0, 100.0))
            .with(LandmarkName::AlarLeft, Point2D::new(80.0, 180.0))
            .with(LandmarkName::AlarRight, Point2D::new(120.0, 180.0))
    }

    #[test]
    fn labels_match_form_choices() {
        assert_eq!(RaterId::labels(), vec!["Auto", "Rater1", "Rater2", "Other"]);
        assert_eq!(PhotoQuality::labels(), vec!["OK", "Blur", "Shadow", "Perspective"]);
        assert_eq!(SkinThickness::labels(), vec!["", "Thin", "Medium", "Thick"]);
        assert_eq!(CartilageStiffness::labels(), vec!["", "Soft", "Moderate", "Firm"]);
        assert_eq!(TipSupport::labels(), vec!["", "Weak", "Moderate", "Strong"]);
        assert_eq!(ViewAuto::FrontalLike.as_str(), "Frontal-like");
    }

    #[test]
    fn empty_label_deserializes_to_unspecified() {
        let v: SkinThickness = serde_json::from_value(serde_json::json!("")).unwrap();
        assert_eq!(v, SkinThickness::Unspecified);
        let v: PhotoQuality = serde_json::from_value(serde_json::json!("OK")).unwrap();
        assert_eq!(v, PhotoQuality::Ok);
        assert!(serde_json::from_value::<ViewHint>(serde_json::json!("Oblique")).is_err());
    }

    #[test]
    fn minimal_request_uses_form_defaults() {
        let req: SaveRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        let record = req.into_record().unwrap();
        assert_eq!(record.patient_id, "P01");
        assert_eq!(record.rater_id, RaterId::Auto);
        assert_eq!(record.photo_quality, PhotoQuality::Ok);
        assert_eq!(record.tip_support, TipSupport::Unspecified);
        assert!(record.measurement.is_none());
        assert_eq!(record.goode_ratio(), GoodeRatio::NotComputed);
    }

    #[test]
    fn landmarks_are_measured_on_save() {
        let req = SaveRequest {
            patient_id: " P07 ".to_string(),
            rater_id: RaterId::Rater2,
            view_hint: ViewHint::Frontal,
            view_auto: ViewAuto::FrontalLike,
            photo_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            photo_quality: PhotoQuality::Blur,
            skin_thickness: SkinThickness::Thick,
            cartilage_stiffness: CartilageStiffness::Firm,
            tip_support: TipSupport::Weak,
            landmarks: Some(frontal_landmarks()),
        };
        let record = req.into_record().unwrap();
        assert_eq!(record.patient_id, "P07");
        assert_eq!(record.view_auto, ViewAuto::FrontalLike);
        assert_eq!(record.goode_ratio(), GoodeRatio::Computed(0.2));
    }

    #[test]
    fn view_auto_is_cleared_without_landmarks() {
        let req: SaveRequest =
            serde_json::from_value(serde_json::json!({ "viewAuto": "Frontal-like" })).unwrap();
        let record = req.into_record().unwrap();
        assert_eq!(record.view_auto, ViewAuto::Unset);
    }

    #[test]
    fn invalid_landmarks_fail_the_save() {
        let mut landmarks = frontal_landmarks();
        landmarks.points.remove("nasion");
        let req: SaveRequest = serde_json::from_value(serde_json::json!({
            "landmarks": landmarks,
        }))
        .unwrap();
        assert!(matches!(req.into_record(), Err(RecordError::Measurement(_))));
    }

    #[test]
    fn blank_patient_id_is_rejected() {
        let req: SaveRequest =
            serde_json::from_value(serde_json::json!({ "patientId": "   " })).unwrap();
        assert!(matches!(req.into_record(), Err(RecordError::Validation(_))));
    }
}
