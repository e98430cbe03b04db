//! Decoding uploaded photos and drawing the landmark preview.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;
use thiserror::Error;

use crate::constants::OVERLAY_MARKER_RADIUS;
use crate::measurement::{ImageFrame, LandmarkSet, NasalLandmarks, Point2D};

const MARKER_COLOR: Rgb<u8> = Rgb([255, 255, 0]);

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unsupported image format {0:?}, upload a PNG or JPEG")]
    UnsupportedFormat(ImageFormat),
    #[error("file is not a recognizable image")]
    Unrecognized,
    #[error("failed to decode image: {0}")]
    Corrupt(String),
    #[error("failed to encode image: {0}")]
    Encode(String),
}

/// An uploaded photo as an RGB pixel grid.
#[derive(Debug, Clone)]
pub struct Photo {
    pub format: ImageFormat,
    pub rgb: RgbImage,
}

impl Photo {
    pub fn frame(&self) -> ImageFrame {
        ImageFrame {
            width: self.rgb.width(),
            height: self.rgb.height(),
        }
    }
}

pub fn decode_photo(bytes: &[u8]) -> Result<Photo, DecodeError> {
    let format = image::guess_format(bytes).map_err(|_| DecodeError::Unrecognized)?;
    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
        return Err(DecodeError::UnsupportedFormat(format));
    }

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| DecodeError::Corrupt(e.to_string()))?;
    let rgb = img.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(DecodeError::Corrupt("image has no pixels".to_string()));
    }

    tracing::debug!(?format, width = rgb.width(), height = rgb.height(), "Photo decoded");
    Ok(Photo { format, rgb })
}

pub fn encode_png(rgb: &RgbImage) -> Result<Vec<u8>, DecodeError> {
    let mut out = Cursor::new(Vec::new());
    rgb.write_to(&mut out, ImageFormat::Png)
        .map_err(|e| DecodeError::Encode(e.to_string()))?;
    Ok(out.into_inner())
}

/// Copy of `rgb` with a filled marker on each landmark and the alar midpoint.
pub fn draw_landmark_overlay(rgb: &RgbImage, landmarks: &LandmarkSet) -> RgbImage {
    let mut overlay = rgb.clone();

    let mut points: Vec<Point2D> = landmarks
        .points
        .values()
        .copied()
        .filter(Point2D::is_finite)
        .collect();
    if let Ok(lm) = NasalLandmarks::from_set(landmarks) {
        points.push(lm.alar_midpoint());
    }

    let r = f64::from(OVERLAY_MARKER_RADIUS);
    let (w, h) = (f64::from(overlay.width()), f64::from(overlay.height()));
    for p in points {
        // markers that cannot touch the image are skipped
        if p.x < -r || p.y < -r || p.x > w + r || p.y > h + r {
            tracing::debug!(x = p.x, y = p.y, "Landmark outside image, not drawn");
            continue;
        }
        // sub-pixel positions truncate toward zero
        draw_filled_circle_mut(
            &mut overlay,
            (p.x as i32, p.y as i32),
            OVERLAY_MARKER_RADIUS,
            MARKER_COLOR,
        );
    }
    overlay
}
