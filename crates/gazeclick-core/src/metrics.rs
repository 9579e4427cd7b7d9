//! Eye metrics: aspect ratio and center for one eye in one frame
//!
//! The eye aspect ratio (EAR) compares the eyelid gap to the eye width in
//! pixel space:
//!
//! ```text
//! ear = (|p1.y - p5.y| + |p2.y - p4.y|) / (2 * |p0.x - p3.x|)
//! ```
//!
//! Landmarks are truncated to whole pixels before measuring, so the ratio is
//! stable under sub-pixel jitter.

use serde::Serialize;

use crate::landmarks::{Eye, EyeShape, LandmarkPoint, Landmarks, PixelPoint};

/// Largest accepted magnitude of a normalized coordinate. Trackers report
/// points slightly outside the frame; anything past this is garbage.
pub const COORDINATE_LIMIT: f64 = 10.0;

/// Reasons an eye could not be measured in a frame
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetricsError {
    #[error("landmark {index} is missing from the frame")]
    MissingLandmark { index: usize },

    #[error("landmark {index} lies outside the accepted coordinate range")]
    OutOfRange { index: usize },

    #[error("frame is {width}x{height}, nothing can be measured")]
    EmptyFrame { width: u32, height: u32 },

    #[error("{eye} eye corners coincide, aspect ratio is undefined")]
    DegenerateGeometry { eye: Eye },
}

/// Reject frames with no pixel area.
pub fn check_frame_size(width: u32, height: u32) -> Result<(), MetricsError> {
    if width == 0 || height == 0 {
        return Err(MetricsError::EmptyFrame { width, height });
    }
    Ok(())
}

/// Aspect ratio and pixel center of one eye
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EyeMeasurement {
    pub ear: f64,
    pub center: PixelPoint,
}

fn resolve(landmarks: &Landmarks, shape: &EyeShape) -> Result<[LandmarkPoint; 6], MetricsError> {
    let mut points = [LandmarkPoint::new(0.0, 0.0); 6];
    for (slot, &index) in points.iter_mut().zip(shape.indices.iter()) {
        let point = landmarks
            .get(index)
            .ok_or(MetricsError::MissingLandmark { index })?;
        let in_range = |v: f64| v.is_finite() && v.abs() <= COORDINATE_LIMIT;
        if !(in_range(point.x) && in_range(point.y)) {
            return Err(MetricsError::OutOfRange { index });
        }
        *slot = point;
    }
    Ok(points)
}

/// Compute the eye aspect ratio for `shape`.
///
/// Fails with [`MetricsError::DegenerateGeometry`] when both eye corners land
/// on the same pixel column.
pub fn eye_aspect_ratio(
    landmarks: &Landmarks,
    shape: &EyeShape,
    width: u32,
    height: u32,
) -> Result<f64, MetricsError> {
    let points = resolve(landmarks, shape)?;
    let px = points.map(|p| p.to_pixel(width, height));

    let v1 = px[1].y.abs_diff(px[5].y);
    let v2 = px[2].y.abs_diff(px[4].y);
    let horizontal = px[0].x.abs_diff(px[3].x);

    if horizontal == 0 {
        return Err(MetricsError::DegenerateGeometry { eye: shape.eye });
    }

    Ok((v1 as f64 + v2 as f64) / (2.0 * horizontal as f64))
}

/// Mean position of the eye's landmarks, in whole pixels.
pub fn eye_center(
    landmarks: &Landmarks,
    shape: &EyeShape,
    width: u32,
    height: u32,
) -> Result<PixelPoint, MetricsError> {
    let points = resolve(landmarks, shape)?;
    let n = points.len() as f64;
    let (sum_x, sum_y) = points.iter().fold((0.0, 0.0), |(sx, sy), p| {
        (sx + p.x * width as f64, sy + p.y * height as f64)
    });
    Ok(PixelPoint::new((sum_x / n) as i64, (sum_y / n) as i64))
}

/// Measure both the aspect ratio and the center of one eye.
pub fn measure_eye(
    landmarks: &Landmarks,
    shape: &EyeShape,
    width: u32,
    height: u32,
) -> Result<EyeMeasurement, MetricsError> {
    Ok(EyeMeasurement {
        ear: eye_aspect_ratio(landmarks, shape, width, height)?,
        center: eye_center(landmarks, shape, width, height)?,
    })
}
