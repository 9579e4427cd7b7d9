//! Landmark frames and the coordinate types derived from them

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::defaults;

/// A single landmark in normalized frame coordinates (0-1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f64,
    pub y: f64,
}

impl LandmarkPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Scale into pixel space, truncating toward zero
    pub fn to_pixel(self, width: u32, height: u32) -> PixelPoint {
        PixelPoint::new(
            (self.x * width as f64) as i64,
            (self.y * height as f64) as i64,
        )
    }
}

/// Landmarks of one detected face, keyed by face-mesh index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Landmarks(BTreeMap<usize, LandmarkPoint>);

impl Landmarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a dense mesh where a point's position is its index
    pub fn from_dense(points: impl IntoIterator<Item = LandmarkPoint>) -> Self {
        Self(points.into_iter().enumerate().collect())
    }

    pub fn insert(&mut self, index: usize, point: LandmarkPoint) {
        self.0.insert(index, point);
    }

    pub fn get(&self, index: usize) -> Option<LandmarkPoint> {
        self.0.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, LandmarkPoint)> + '_ {
        self.0.iter().map(|(index, point)| (*index, *point))
    }
}

impl FromIterator<(usize, LandmarkPoint)> for Landmarks {
    fn from_iter<I: IntoIterator<Item = (usize, LandmarkPoint)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One frame reported by the landmark source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Landmarks of the tracked face, `None` when no face was found
    #[serde(default, rename = "landmarks")]
    pub face: Option<Landmarks>,
}

impl LandmarkFrame {
    pub fn no_face(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            face: None,
        }
    }

    pub fn with_face(width: u32, height: u32, landmarks: Landmarks) -> Self {
        Self {
            width,
            height,
            face: Some(landmarks),
        }
    }

    pub fn has_face(&self) -> bool {
        self.face.is_some()
    }
}

/// Which eye a measurement belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Eye {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The six landmarks outlining an eye.
///
/// Ordering is corner, upper, upper, corner, lower, lower, so that indices
/// 1/5 and 2/4 face each other across the eyelid gap and 0/3 span the eye.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeShape {
    pub eye: Eye,
    pub indices: [usize; 6],
}

impl EyeShape {
    pub const LEFT: EyeShape = EyeShape::new(Eye::Left, defaults::LEFT_EYE);
    pub const RIGHT: EyeShape = EyeShape::new(Eye::Right, defaults::RIGHT_EYE);

    pub const fn new(eye: Eye, indices: [usize; 6]) -> Self {
        Self { eye, indices }
    }
}

/// Integer pixel position inside a camera frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i64,
    pub y: i64,
}

impl PixelPoint {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Position in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const ORIGIN: ScreenPoint = ScreenPoint { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
