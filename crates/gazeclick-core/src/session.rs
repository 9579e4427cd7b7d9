//! Per-frame pipeline and the session state it mutates
//!
//! One call to [`Pipeline::process_frame`] is one camera frame:
//! eye metrics, blink classification, click dispatch, motion filtering,
//! move dispatch and recording, in that order. All mutable state lives in
//! [`SessionState`], which the caller owns and passes in by reference.

use std::time::Duration;

use tracing::{debug, info};

use crate::actuator::Actuator;
use crate::blink::{BlinkClassifier, BlinkEvent};
use crate::config::AppConfig;
use crate::control::{ControlCommand, ControlState, LoopControl};
use crate::dispatch::ActionDispatcher;
use crate::error::Result;
use crate::landmarks::{Eye, EyeShape, LandmarkFrame, ScreenPoint};
use crate::metrics::{check_frame_size, eye_aspect_ratio, eye_center, MetricsError};
use crate::motion::{CursorState, MotionFilter, MotionSample};
use crate::recorder::SessionRecorder;

/// What happened to a single frame
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// The source reported no face; nothing changed
    NoFace,
    /// Unusable frame size or landmarks; handled like a no-face frame
    Invalid(MetricsError),
    /// The frame went through the pipeline
    Processed(ProcessedFrame),
}

impl FrameOutcome {
    pub fn processed(&self) -> Option<&ProcessedFrame> {
        match self {
            Self::Processed(frame) => Some(frame),
            _ => None,
        }
    }
}

/// Products of a processed frame
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedFrame {
    /// Left and right EAR, `None` if an eye was degenerate
    pub ears: Option<(f64, f64)>,
    pub blink: Option<BlinkEvent>,
    pub sample: MotionSample,
    /// Cursor position sent to the actuator, if the deadzone gate passed
    pub moved: Option<ScreenPoint>,
}

/// Mutable state of one session, owned by the frame loop
#[derive(Debug, Clone)]
pub struct SessionState {
    classifier: BlinkClassifier,
    cursor: CursorState,
    control: ControlState,
    recorder: SessionRecorder,
    dispatcher: ActionDispatcher,
    frames: u64,
    face_frames: u64,
}

impl SessionState {
    pub fn new(config: &AppConfig) -> Self {
        let [x, y] = config.motion.origin;
        Self {
            classifier: BlinkClassifier::new(&config.blink),
            cursor: CursorState::new(x, y),
            control: ControlState::default(),
            recorder: SessionRecorder::new(),
            dispatcher: ActionDispatcher::new(),
            frames: 0,
            face_frames: 0,
        }
    }

    pub fn cursor(&self) -> CursorState {
        self.cursor
    }

    pub fn classifier(&self) -> &BlinkClassifier {
        &self.classifier
    }

    pub fn control(&self) -> ControlState {
        self.control
    }

    pub fn recorder(&self) -> &SessionRecorder {
        &self.recorder
    }

    /// Frames seen, with or without a face
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn face_frames(&self) -> u64 {
        self.face_frames
    }

    pub fn actuator_failures(&self) -> u64 {
        self.dispatcher.failures()
    }

    /// Apply an operator command to the control state machine.
    pub fn apply_control(&mut self, command: ControlCommand) -> LoopControl {
        let (next, flow) = self.control.apply(command);
        if next != self.control {
            match next {
                ControlState::Calibrating => {
                    info!("Calibration requested; no calibration routine is installed, tracking continues unchanged")
                }
                ControlState::Idle => info!("Calibration mode off"),
            }
        }
        self.control = next;
        if flow == LoopControl::Stop {
            info!("Quit requested");
        }
        flow
    }
}

/// Immutable pipeline settings shared by every frame of a session
#[derive(Debug, Clone)]
pub struct Pipeline {
    left: EyeShape,
    right: EyeShape,
    motion: MotionFilter,
    config: AppConfig,
}

impl Pipeline {
    /// Build a pipeline from a validated configuration.
    pub fn new(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            left: EyeShape::new(Eye::Left, config.eyes.left),
            right: EyeShape::new(Eye::Right, config.eyes.right),
            motion: MotionFilter::new(&config.motion, &config.screen),
            config: config.clone(),
        })
    }

    /// Fresh state for a new session
    pub fn new_session(&self) -> SessionState {
        SessionState::new(&self.config)
    }

    pub fn motion(&self) -> &MotionFilter {
        &self.motion
    }

    /// Run one frame through the pipeline.
    ///
    /// `elapsed` is the frame's time since session start and stamps any
    /// blink completed by this frame.
    pub fn process_frame(
        &self,
        state: &mut SessionState,
        frame: &LandmarkFrame,
        elapsed: Duration,
        actuator: &mut dyn Actuator,
    ) -> FrameOutcome {
        state.frames += 1;

        let Some(landmarks) = frame.face.as_ref() else {
            debug!(frame = state.frames, "no face");
            return FrameOutcome::NoFace;
        };
        let (w, h) = (frame.width, frame.height);
        if let Err(e) = check_frame_size(w, h) {
            debug!(frame = state.frames, "skipping frame: {}", e);
            return FrameOutcome::Invalid(e);
        }

        let ears = match (
            eye_aspect_ratio(landmarks, &self.left, w, h),
            eye_aspect_ratio(landmarks, &self.right, w, h),
        ) {
            (Ok(left), Ok(right)) => Some((left, right)),
            (Err(e), _) | (_, Err(e)) if !matches!(e, MetricsError::DegenerateGeometry { .. }) => {
                debug!(frame = state.frames, "skipping frame: {}", e);
                return FrameOutcome::Invalid(e);
            }
            (Err(e), _) | (_, Err(e)) => {
                debug!(frame = state.frames, "skipping blink classification: {}", e);
                None
            }
        };

        let anchor = match eye_center(landmarks, &self.right, w, h) {
            Ok(center) => center,
            Err(e) => return FrameOutcome::Invalid(e),
        };
        state.face_frames += 1;

        let mut blink = None;
        if let Some((left_ear, right_ear)) = ears {
            debug!(frame = state.frames, left_ear, right_ear, "eye aspect ratios");
            if let Some(kind) = state.classifier.update(left_ear, right_ear) {
                let event = BlinkEvent::new(kind, elapsed);
                state.dispatcher.click(actuator, kind);
                state.recorder.record_blink(event);
                blink = Some(event);
            }
        }

        let target = self.motion.map_to_screen(anchor, w, h);
        let outcome = self.motion.step(&mut state.cursor, target);
        if let Some(position) = outcome.moved {
            state.dispatcher.move_to(actuator, position);
        }
        state
            .recorder
            .record_motion(&outcome.sample, outcome.moved.is_some());

        FrameOutcome::Processed(ProcessedFrame {
            ears,
            blink,
            sample: outcome.sample,
            moved: outcome.moved,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::MouseButton;
    use crate::blink::BlinkKind;
    use crate::landmarks::{LandmarkPoint, PixelPoint};
    use crate::synthetic::SyntheticFace;
    use crate::test_utils::{FailingActuator, RecordingActuator};

    const OPEN: f64 = 0.30;
    const CLOSED: f64 = 0.10;

    fn setup() -> (Pipeline, SessionState, SyntheticFace) {
        let pipeline = Pipeline::new(&AppConfig::default()).unwrap();
        let state = pipeline.new_session();
        (pipeline, state, SyntheticFace::default())
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_pipeline_rejects_invalid_config() {
        let mut config = AppConfig::default();
        config.motion.smoothing = 0.0;
        assert!(Pipeline::new(&config).is_err());
    }

    #[test]
    fn test_no_face_frame_changes_nothing() {
        let (pipeline, mut state, face) = setup();
        let mut actuator = RecordingActuator::default();

        let frame = face.frame(CLOSED, OPEN, face.center());
        pipeline.process_frame(&mut state, &frame, ms(0), &mut actuator);
        let counters = state.classifier().counters();
        let cursor = state.cursor();

        let outcome = pipeline.process_frame(
            &mut state,
            &LandmarkFrame::no_face(1280, 720),
            ms(33),
            &mut actuator,
        );

        assert_eq!(outcome, FrameOutcome::NoFace);
        assert_eq!(state.classifier().counters(), counters);
        assert_eq!(state.cursor(), cursor);
        assert_eq!(state.recorder().len(), 1);
        assert_eq!(state.frames(), 2);
        assert_eq!(state.face_frames(), 1);
    }

    #[test]
    fn test_blink_survives_no_face_gap() {
        let (pipeline, mut state, face) = setup();
        let mut actuator = RecordingActuator::default();
        let gaze = face.center();

        pipeline.process_frame(&mut state, &face.frame(CLOSED, CLOSED, gaze), ms(0), &mut actuator);
        pipeline.process_frame(&mut state, &LandmarkFrame::no_face(1280, 720), ms(33), &mut actuator);
        pipeline.process_frame(&mut state, &face.frame(CLOSED, CLOSED, gaze), ms(66), &mut actuator);
        let outcome =
            pipeline.process_frame(&mut state, &face.frame(OPEN, OPEN, gaze), ms(99), &mut actuator);

        let blink = outcome.processed().and_then(|p| p.blink).unwrap();
        assert_eq!(blink.kind, BlinkKind::Double);
        assert_eq!(blink.at, ms(99));
        assert_eq!(actuator.clicks(MouseButton::Left), 1);
    }

    #[test]
    fn test_missing_landmark_is_invalid_frame() {
        let (pipeline, mut state, face) = setup();
        let mut actuator = RecordingActuator::default();

        let mut frame = face.frame(OPEN, OPEN, face.center());
        if let Some(landmarks) = frame.face.as_mut() {
            *landmarks = landmarks.iter().filter(|(i, _)| *i != 385).collect();
        }

        let outcome = pipeline.process_frame(&mut state, &frame, ms(0), &mut actuator);
        assert_eq!(
            outcome,
            FrameOutcome::Invalid(MetricsError::MissingLandmark { index: 385 })
        );
        assert!(state.recorder().is_empty());
        assert!(actuator.commands.is_empty());
    }

    #[test]
    fn test_far_out_landmarks_are_invalid_frame() {
        let (pipeline, mut state, face) = setup();
        let mut actuator = RecordingActuator::default();

        let mut frame = face.frame(OPEN, OPEN, face.center());
        if let Some(landmarks) = frame.face.as_mut() {
            let upper = landmarks.get(160).unwrap();
            let lower = landmarks.get(144).unwrap();
            landmarks.insert(160, LandmarkPoint::new(upper.x, 1e300));
            landmarks.insert(144, LandmarkPoint::new(lower.x, -1e300));
        }

        let outcome = pipeline.process_frame(&mut state, &frame, ms(0), &mut actuator);
        assert_eq!(
            outcome,
            FrameOutcome::Invalid(MetricsError::OutOfRange { index: 160 })
        );
        assert_eq!(state.face_frames(), 0);
        assert!(actuator.commands.is_empty());
    }

    #[test]
    fn test_zero_size_frame_leaves_cursor_alone() {
        let (pipeline, mut state, face) = setup();
        let mut actuator = RecordingActuator::default();
        let gaze = face.center();

        for i in 0..5 {
            pipeline.process_frame(&mut state, &face.frame(OPEN, OPEN, gaze), ms(i * 33), &mut actuator);
        }
        let cursor = state.cursor();
        let commands = actuator.commands.len();
        let recorded = state.recorder().len();

        let mut frame = face.frame(OPEN, OPEN, gaze);
        frame.width = 0;
        frame.height = 0;
        let outcome = pipeline.process_frame(&mut state, &frame, ms(165), &mut actuator);

        assert_eq!(
            outcome,
            FrameOutcome::Invalid(MetricsError::EmptyFrame {
                width: 0,
                height: 0
            })
        );
        assert_eq!(state.cursor(), cursor);
        assert_eq!(actuator.commands.len(), commands);
        assert_eq!(state.recorder().len(), recorded);
        assert_eq!(state.face_frames(), 5);
        assert_eq!(state.frames(), 6);
    }

    #[test]
    fn test_degenerate_eye_skips_blinks_but_moves_cursor() {
        let (pipeline, mut state, face) = setup();
        let mut actuator = RecordingActuator::default();
        let gaze = face.center();

        pipeline.process_frame(&mut state, &face.frame(CLOSED, OPEN, gaze), ms(0), &mut actuator);
        pipeline.process_frame(&mut state, &face.frame(CLOSED, OPEN, gaze), ms(33), &mut actuator);

        // Collapse the left eye's corners onto one pixel column.
        let mut frame = face.frame(OPEN, OPEN, gaze);
        if let Some(landmarks) = frame.face.as_mut() {
            let corner = landmarks.get(33).unwrap();
            landmarks.insert(133, LandmarkPoint::new(corner.x, corner.y));
        }
        let outcome = pipeline.process_frame(&mut state, &frame, ms(66), &mut actuator);

        let processed = outcome.processed().unwrap();
        assert_eq!(processed.ears, None);
        assert_eq!(processed.blink, None);
        assert!(processed.moved.is_some());
        assert_eq!(state.classifier().counters().left, 2);

        let outcome =
            pipeline.process_frame(&mut state, &face.frame(OPEN, OPEN, gaze), ms(99), &mut actuator);
        assert_eq!(
            outcome.processed().and_then(|p| p.blink).map(|b| b.kind),
            Some(BlinkKind::Left)
        );
    }

    #[test]
    fn test_actuator_failure_does_not_roll_back() {
        let (pipeline, mut state, face) = setup();
        let mut actuator = FailingActuator;

        let outcome = pipeline.process_frame(
            &mut state,
            &face.frame(OPEN, OPEN, face.center()),
            ms(0),
            &mut actuator,
        );

        let moved = outcome.processed().and_then(|p| p.moved).unwrap();
        assert_eq!(state.cursor().position(), moved);
        assert_eq!(state.recorder().counters().cursor_valid_moves, 1);
        assert_eq!(state.actuator_failures(), 1);
    }

    #[test]
    fn test_motion_follows_right_eye() {
        let (pipeline, mut state, face) = setup();
        let mut actuator = RecordingActuator::default();

        // Right eye at the window's right edge maps to the screen's right edge.
        let gaze = PixelPoint::new(896, 360);
        let outcome =
            pipeline.process_frame(&mut state, &face.frame(OPEN, OPEN, gaze), ms(0), &mut actuator);
        let sample = outcome.processed().unwrap().sample;
        assert!((sample.raw_x - 1920.0).abs() < 1e-9);
        assert!((sample.raw_y - 540.0).abs() < 1e-9);
    }

    #[test]
    fn test_control_commands() {
        let (_, mut state, _) = setup();
        assert_eq!(
            state.apply_control(ControlCommand::ToggleCalibration),
            LoopControl::Continue
        );
        assert_eq!(state.control(), ControlState::Calibrating);
        assert_eq!(state.apply_control(ControlCommand::Quit), LoopControl::Stop);
    }

    #[test]
    fn test_custom_eye_indices() {
        let mut config = AppConfig::default();
        config.eyes.left = [1, 2, 3, 4, 5, 6];
        let pipeline = Pipeline::new(&config).unwrap();
        let mut state = pipeline.new_session();

        let frame = SyntheticFace::default().frame(OPEN, OPEN, PixelPoint::new(640, 360));
        let outcome = pipeline.process_frame(
            &mut state,
            &frame,
            ms(0),
            &mut RecordingActuator::default(),
        );
        assert_eq!(
            outcome,
            FrameOutcome::Invalid(MetricsError::MissingLandmark { index: 1 })
        );
    }
}
