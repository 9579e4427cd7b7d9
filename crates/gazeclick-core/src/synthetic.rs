//! Synthetic faces with exact eye aspect ratios
//!
//! Builds landmark frames whose eyes measure a requested EAR and whose right
//! eye is centered on a requested pixel. Used by the demo source and by tests
//! that need to drive the pipeline without a camera.

use crate::landmarks::{EyeShape, LandmarkFrame, LandmarkPoint, Landmarks, PixelPoint};

#[derive(Debug, Clone)]
pub struct SyntheticFace {
    pub width: u32,
    pub height: u32,
    pub left: EyeShape,
    pub right: EyeShape,
    /// Half the corner-to-corner width of each eye, in pixels
    pub half_width: i64,
    /// Horizontal distance from the right eye center to the left eye center
    pub spacing: i64,
}

impl Default for SyntheticFace {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            left: EyeShape::LEFT,
            right: EyeShape::RIGHT,
            half_width: 50,
            spacing: 120,
        }
    }
}

impl SyntheticFace {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// A zero half width collapses the eye corners onto one column.
    pub fn with_eye_half_width(mut self, half_width: i64) -> Self {
        self.half_width = half_width;
        self
    }

    pub fn center(&self) -> PixelPoint {
        PixelPoint::new(self.width as i64 / 2, self.height as i64 / 2)
    }

    /// A frame with the right eye centered on `gaze` and the left eye
    /// `spacing` pixels to its left.
    ///
    /// EARs are quantized to the eye's pixel grid: with the default half width
    /// the measured value is `ear` rounded to two decimals.
    pub fn frame(&self, left_ear: f64, right_ear: f64, gaze: PixelPoint) -> LandmarkFrame {
        let mut landmarks = Landmarks::new();
        self.place_eye(&mut landmarks, &self.right, gaze, right_ear);
        self.place_eye(
            &mut landmarks,
            &self.left,
            PixelPoint::new(gaze.x - self.spacing, gaze.y),
            left_ear,
        );
        LandmarkFrame::with_face(self.width, self.height, landmarks)
    }

    fn place_eye(&self, landmarks: &mut Landmarks, shape: &EyeShape, center: PixelPoint, ear: f64) {
        let gap = (ear * 2.0 * self.half_width as f64).round() as i64;
        let top = gap / 2;
        let bottom = gap - top;
        let outer = self.half_width;
        let inner = self.half_width * 2 / 5;
        let (cx, cy) = (center.x, center.y);

        let pixels = [
            (cx - outer, cy),
            (cx - inner, cy - top),
            (cx + inner, cy - top),
            (cx + outer, cy),
            (cx + inner, cy + bottom),
            (cx - inner, cy + bottom),
        ];
        for (&index, (x, y)) in shape.indices.iter().zip(pixels) {
            landmarks.insert(index, self.normalize(x, y));
        }
    }

    // Aim for the middle of the pixel so truncation lands on it.
    fn normalize(&self, x: i64, y: i64) -> LandmarkPoint {
        LandmarkPoint::new(
            (x as f64 + 0.5) / self.width as f64,
            (y as f64 + 0.5) / self.height as f64,
        )
    }
}

/// EAR used for an open eye in scripts
pub const SCRIPT_OPEN_EAR: f64 = 0.30;

/// EAR used for a closed eye in scripts
pub const SCRIPT_CLOSED_EAR: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Scripted {
    Face { left_ear: f64, right_ear: f64, gaze: PixelPoint },
    NoFace,
}

/// A frame-by-frame script of eye states and gaze positions.
///
/// ```
/// use gazeclick_core::synthetic::{BlinkScript, SyntheticFace};
///
/// let script = BlinkScript::new(SyntheticFace::default())
///     .open(5)
///     .left_blink(3)
///     .open(2);
/// assert_eq!(script.len(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct BlinkScript {
    face: SyntheticFace,
    gaze: PixelPoint,
    frames: Vec<Scripted>,
}

impl BlinkScript {
    /// Start a script with the gaze on the frame center.
    pub fn new(face: SyntheticFace) -> Self {
        let gaze = face.center();
        Self {
            face,
            gaze,
            frames: Vec::new(),
        }
    }

    pub fn face(&self) -> &SyntheticFace {
        &self.face
    }

    /// Move the gaze for every following step.
    pub fn look_at(mut self, gaze: PixelPoint) -> Self {
        self.gaze = gaze;
        self
    }

    /// Hold both EARs for `frames` frames.
    pub fn hold(mut self, left_ear: f64, right_ear: f64, frames: usize) -> Self {
        let gaze = self.gaze;
        self.frames.extend((0..frames).map(|_| Scripted::Face {
            left_ear,
            right_ear,
            gaze,
        }));
        self
    }

    pub fn open(self, frames: usize) -> Self {
        self.hold(SCRIPT_OPEN_EAR, SCRIPT_OPEN_EAR, frames)
    }

    pub fn left_blink(self, frames: usize) -> Self {
        self.hold(SCRIPT_CLOSED_EAR, SCRIPT_OPEN_EAR, frames)
    }

    pub fn right_blink(self, frames: usize) -> Self {
        self.hold(SCRIPT_OPEN_EAR, SCRIPT_CLOSED_EAR, frames)
    }

    pub fn double_blink(self, frames: usize) -> Self {
        self.hold(SCRIPT_CLOSED_EAR, SCRIPT_CLOSED_EAR, frames)
    }

    pub fn no_face(mut self, frames: usize) -> Self {
        self.frames.extend((0..frames).map(|_| Scripted::NoFace));
        self
    }

    /// Move the gaze linearly to `target` over `frames` open-eyed frames.
    pub fn sweep_to(mut self, target: PixelPoint, frames: usize) -> Self {
        let start = self.gaze;
        for i in 1..=frames {
            let t = i as f64 / frames as f64;
            let gaze = PixelPoint::new(
                start.x + ((target.x - start.x) as f64 * t).round() as i64,
                start.y + ((target.y - start.y) as f64 * t).round() as i64,
            );
            self.frames.push(Scripted::Face {
                left_ear: SCRIPT_OPEN_EAR,
                right_ear: SCRIPT_OPEN_EAR,
                gaze,
            });
        }
        self.gaze = target;
        self
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Render the script into landmark frames.
    pub fn frames(&self) -> impl Iterator<Item = LandmarkFrame> + '_ {
        self.frames.iter().map(|step| match *step {
            Scripted::Face {
                left_ear,
                right_ear,
                gaze,
            } => self.face.frame(left_ear, right_ear, gaze),
            Scripted::NoFace => LandmarkFrame::no_face(self.face.width, self.face.height),
        })
    }
}
