use serde::{Deserialize, Serialize};

use crate::metadata::MeasurementRecord;

/// Column order of the measurements table. Never derived from the data.
pub const COLUMNS: [&str; 12] = [
    "Patient_ID",
    "Rater_ID",
    "View_Hint",
    "View_Auto",
    "Photo_Date",
    "Photo_Quality_Flag",
    "Skin_Thickness_Class",
    "Cartilage_Stiffness_Class",
    "Tip_Support_Class",
    "Nasal_Length_px",
    "Tip_Projection_px",
    "Goode_Ratio",
];

/// One persisted row. Field order must follow [`COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvRow {
    #[serde(rename = "Patient_ID")]
    pub patient_id: String,
    #[serde(rename = "Rater_ID")]
    pub rater_id: String,
    #[serde(rename = "View_Hint")]
    pub view_hint: String,
    #[serde(rename = "View_Auto")]
    pub view_auto: String,
    #[serde(rename = "Photo_Date")]
    pub photo_date: String,
    #[serde(rename = "Photo_Quality_Flag")]
    pub photo_quality_flag: String,
    #[serde(rename = "Skin_Thickness_Class")]
    pub skin_thickness_class: String,
    #[serde(rename = "Cartilage_Stiffness_Class")]
    pub cartilage_stiffness_class: String,
    #[serde(rename = "Tip_Support_Class")]
    pub tip_support_class: String,
    #[serde(rename = "Nasal_Length_px")]
    pub nasal_length_px: Option<f64>,
    #[serde(rename = "Tip_Projection_px")]
    pub tip_projection_px: Option<f64>,
    #[serde(rename = "Goode_Ratio")]
    pub goode_ratio: Option<f64>,
}

impl From<&MeasurementRecord> for CsvRow {
    fn from(record: &MeasurementRecord) -> Self {
        Self {
            patient_id: record.patient_id.clone(),
            rater_id: record.rater_id.as_str().to_string(),
            view_hint: record.view_hint.as_str().to_string(),
            view_auto: record.view_auto.as_str().to_string(),
            photo_date: record.photo_date.format("%Y-%m-%d").to_string(),
            photo_quality_flag: record.photo_quality.as_str().to_string(),
            skin_thickness_class: record.skin_thickness.as_str().to_string(),
            cartilage_stiffness_class: record.cartilage_stiffness.as_str().to_string(),
            tip_support_class: record.tip_support.as_str().to_string(),
            nasal_length_px: record.measurement.map(|m| m.nasal_length_px),
            tip_projection_px: record.measurement.map(|m| m.tip_projection_px),
            goode_ratio: record.goode_ratio().value(),
        }
    }
}

pub fn header_matches<'a>(header: impl IntoIterator<Item = &'a str>) -> bool {
    header.into_iter().eq(COLUMNS.iter().copied())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::measurement::{GoodeRatio, MeasurementResult};
    use crate::metadata::*;

    fn record(measurement: Option<MeasurementResult>) -> MeasurementRecord {
        MeasurementRecord {
            patient_id: "P01".to_string(),
            rater_id: RaterId::Rater1,
            view_hint: ViewHint::Basal,
            view_auto: ViewAuto::Unset,
            photo_date: NaiveDate::from_ymd_opt(2025, 1, 9).unwrap(),
            photo_quality: PhotoQuality::Shadow,
            skin_thickness: SkinThickness::Unspecified,
            cartilage_stiffness: CartilageStiffness::Soft,
            tip_support: TipSupport::Strong,
            measurement,
        }
    }

    #[test]
    fn row_uses_form_labels() {
        let row = CsvRow::from(&record(None));
        assert_eq!(row.rater_id, "Rater1");
        assert_eq!(row.photo_date, "2025-01-09");
        assert_eq!(row.photo_quality_flag, "Shadow");
        assert_eq!(row.skin_thickness_class, "");
        assert_eq!(row.nasal_length_px, None);
        assert_eq!(row.goode_ratio, None);
    }

    #[test]
    fn degenerate_ratio_is_blank_but_lengths_kept() {
        let row = CsvRow::from(&record(Some(MeasurementResult {
            nasal_length_px: 0.0,
            tip_projection_px: 12.5,
            goode_ratio: GoodeRatio::Degenerate,
        })));
        assert_eq!(row.nasal_length_px, Some(0.0));
        assert_eq!(row.tip_projection_px, Some(12.5));
        assert_eq!(row.goode_ratio, None);
    }

    #[test]
    fn header_comparison_is_order_sensitive() {
        assert!(header_matches(COLUMNS));
        let mut swapped = COLUMNS;
        swapped.swap(0, 1);
        assert!(!header_matches(swapped));
        assert!(!header_matches(COLUMNS[..11].iter().copied()));
    }
}
