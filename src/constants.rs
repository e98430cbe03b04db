/// Patient identifier pre-filled in the form
pub const DEFAULT_PATIENT_ID: &str = "P01";

/// Default location of the measurements table
pub const DEFAULT_CSV_PATH: &str = "output/hillani_measurements.csv";

/// Rows shown after a save
pub const DEFAULT_RECENT_ROWS: usize = 5;

/// Upper bound for `GET /api/records?limit=`
pub const MAX_RECENT_ROWS: usize = 100;

/// Default upload limit (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Multipart field carrying the photo
pub const PHOTO_FIELD: &str = "photo";

/// Face-mesh vertex indices of the nasal landmarks
pub const MESH_NOSE_TIP: usize = 1;
pub const MESH_NASION: usize = 168;
pub const MESH_ALAR_LEFT: usize = 94;
pub const MESH_ALAR_RIGHT: usize = 326;

/// Overlay marker radius in pixels
pub const OVERLAY_MARKER_RADIUS: i32 = 4;
