use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::Serialize;

use crate::constants::DEFAULT_PATIENT_ID;
use crate::metadata::{CartilageStiffness, PhotoQuality, RaterId, SkinThickness, TipSupport, ViewHint};
use crate::response::ok;
use crate::state::AppState;
use crate::store::schema::COLUMNS;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_options))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormOptions {
    rater_ids: Vec<&'static str>,
    view_hints: Vec<&'static str>,
    photo_qualities: Vec<&'static str>,
    skin_thickness: Vec<&'static str>,
    cartilage_stiffness: Vec<&'static str>,
    tip_support: Vec<&'static str>,
    default_patient_id: &'static str,
    accepted_formats: [&'static str; 3],
    max_upload_bytes: usize,
    columns: [&'static str; 12],
    detector: DetectorStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DetectorStatus {
    name: &'static str,
    available: bool,
}

/// Everything the form needs to render its controls.
async fn get_options(State(state): State<AppState>) -> impl IntoResponse {
    let detector = state.detector();
    ok(FormOptions {
        rater_ids: RaterId::labels(),
        view_hints: ViewHint::labels(),
        photo_qualities: PhotoQuality::labels(),
        skin_thickness: SkinThickness::labels(),
        cartilage_stiffness: CartilageStiffness::labels(),
        tip_support: TipSupport::labels(),
        default_patient_id: DEFAULT_PATIENT_ID,
        accepted_formats: ["png", "jpg", "jpeg"],
        max_upload_bytes: state.config().max_upload_bytes,
        columns: COLUMNS,
        detector: DetectorStatus {
            name: detector.name(),
            available: detector.is_available(),
        },
    })
}
