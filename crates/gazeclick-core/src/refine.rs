//! Optional gaze refinement from an iris crop
//!
//! A refiner isolates iris pixels in a grayscale eye crop and reports their
//! centroid. It is not part of the blink or motion pipeline; callers may use
//! it as an additional gaze signal once a real implementation exists.

use crate::landmarks::PixelPoint;

/// Default binary threshold separating iris from sclera
pub const DEFAULT_IRIS_THRESHOLD: u8 = 70;

/// Grayscale crop of a single eye, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrisFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl IrisFrame {
    /// Returns `None` if `pixels` does not hold exactly `width * height` values.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            pixels,
        })
    }
}

pub trait GazeRefiner {
    /// Locate the iris centroid within the crop, in crop pixels.
    fn locate(&self, iris: &IrisFrame) -> Option<PixelPoint>;
}

/// Refiner that never reports a location.
#[derive(Debug, Clone, Copy)]
pub struct NullGazeRefiner {
    pub threshold: u8,
}

impl Default for NullGazeRefiner {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_IRIS_THRESHOLD,
        }
    }
}

impl GazeRefiner for NullGazeRefiner {
    fn locate(&self, _iris: &IrisFrame) -> Option<PixelPoint> {
        None
    }
}
