//! Landmark sources feeding the frame loop
//!
//! A source yields [`TimedFrame`]s until it is exhausted. Face detection
//! itself happens upstream; sources only carry its output.

use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use gazeclick_core::{BlinkScript, LandmarkFrame, Landmarks, PixelPoint, SyntheticFace};
use serde::Deserialize;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

/// A frame plus its capture time relative to the start of the stream, if known
#[derive(Debug, Clone, PartialEq)]
pub struct TimedFrame {
    pub at: Option<Duration>,
    pub frame: LandmarkFrame,
}

#[async_trait]
pub trait LandmarkSource: Send {
    /// Next frame, or `None` once the source is exhausted.
    async fn next_frame(&mut self) -> Result<Option<TimedFrame>>;

    fn name(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct FrameRecord {
    #[serde(default)]
    t: Option<f64>,
    width: u32,
    height: u32,
    #[serde(default)]
    landmarks: Option<Landmarks>,
}

/// Reads one JSON frame per line
pub struct JsonLinesSource<R> {
    lines: Lines<R>,
    line: usize,
    name: String,
}

impl JsonLinesSource<BufReader<File>> {
    pub async fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .await
            .with_context(|| format!("Failed to open landmark file {}", path.display()))?;
        Ok(Self::with_name(
            BufReader::new(file),
            path.display().to_string(),
        ))
    }
}

impl JsonLinesSource<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::with_name(BufReader::new(tokio::io::stdin()), "stdin")
    }
}

impl<R: AsyncBufRead + Unpin + Send> JsonLinesSource<R> {
    pub fn with_name(reader: R, name: impl Into<String>) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            name: name.into(),
        }
    }

    fn parse(&self, text: &str) -> Result<TimedFrame> {
        let record: FrameRecord = serde_json::from_str(text)
            .with_context(|| format!("{}:{}: invalid landmark frame", self.name, self.line))?;

        let at = record
            .t
            .map(Duration::try_from_secs_f64)
            .transpose()
            .with_context(|| format!("{}:{}: invalid timestamp", self.name, self.line))?;

        Ok(TimedFrame {
            at,
            frame: LandmarkFrame {
                width: record.width,
                height: record.height,
                face: record.landmarks,
            },
        })
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> LandmarkSource for JsonLinesSource<R> {
    async fn next_frame(&mut self) -> Result<Option<TimedFrame>> {
        while let Some(text) = self
            .lines
            .next_line()
            .await
            .with_context(|| format!("Failed to read from {}", self.name))?
        {
            self.line += 1;
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            return self.parse(text).map(Some);
        }
        Ok(None)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Plays back pre-rendered frames at a fixed rate
pub struct SyntheticSource {
    frames: VecDeque<LandmarkFrame>,
    interval: Duration,
    index: u32,
}

impl SyntheticSource {
    pub fn from_script(script: &BlinkScript, fps: u32) -> Self {
        Self {
            frames: script.frames().collect(),
            interval: Duration::from_secs(1) / fps.max(1),
            index: 0,
        }
    }

    /// Left wink, right wink, double blink, then a sweep across the gaze window.
    pub fn demo(face: SyntheticFace) -> Self {
        let (w, h) = (face.width as i64, face.height as i64);
        let script = BlinkScript::new(face)
            .open(15)
            .left_blink(4)
            .open(15)
            .right_blink(4)
            .open(15)
            .double_blink(4)
            .open(15)
            .sweep_to(PixelPoint::new(w * 3 / 10, h * 3 / 10), 30)
            .open(15)
            .sweep_to(PixelPoint::new(w * 7 / 10, h * 7 / 10), 45)
            .open(15)
            .sweep_to(PixelPoint::new(w / 2, h / 2), 30)
            .open(30);
        Self::from_script(&script, 30)
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

#[async_trait]
impl LandmarkSource for SyntheticSource {
    async fn next_frame(&mut self) -> Result<Option<TimedFrame>> {
        let Some(frame) = self.frames.pop_front() else {
            return Ok(None);
        };
        let at = self.interval * self.index;
        self.index += 1;
        Ok(Some(TimedFrame {
            at: Some(at),
            frame,
        }))
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn source(text: &'static str) -> JsonLinesSource<BufReader<&'static [u8]>> {
        JsonLinesSource::with_name(BufReader::new(text.as_bytes()), "test")
    }

    #[tokio::test]
    async fn test_json_lines_skips_blank_lines() {
        let mut source = source(
            "{\"t\":0.5,\"width\":640,\"height\":480,\"landmarks\":{\"33\":{\"x\":0.1,\"y\":0.2}}}\n\
             \n\
             {\"width\":640,\"height\":480,\"landmarks\":null}\n",
        );

        let first = source.next_frame().await.unwrap().unwrap();
        assert_eq!(first.at, Some(Duration::from_millis(500)));
        assert_eq!(first.frame.width, 640);
        assert!(first.frame.has_face());

        let second = source.next_frame().await.unwrap().unwrap();
        assert_eq!(second.at, None);
        assert!(!second.frame.has_face());

        assert!(source.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_json_lines_reports_bad_line() {
        let mut source = source("{\"width\":640,\"height\":480}\nnot json\n");
        assert!(source.next_frame().await.unwrap().is_some());

        let err = source.next_frame().await.unwrap_err();
        assert!(err.to_string().contains("test:2"));
    }

    #[tokio::test]
    async fn test_json_lines_rejects_negative_timestamp() {
        let mut source = source("{\"t\":-1.0,\"width\":640,\"height\":480}\n");
        let err = source.next_frame().await.unwrap_err();
        assert!(err.to_string().contains("invalid timestamp"));
    }

    #[tokio::test]
    async fn test_json_lines_opens_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{\"width\":320,\"height\":240}}").unwrap();

        let mut source = JsonLinesSource::open(file.path()).await.unwrap();
        let frame = source.next_frame().await.unwrap().unwrap();
        assert_eq!(frame.frame.height, 240);
        assert!(source.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_synthetic_source_timestamps_frames() {
        let script = BlinkScript::new(SyntheticFace::default()).open(3);
        let mut source = SyntheticSource::from_script(&script, 10);
        assert_eq!(source.remaining(), 3);

        let mut stamps = Vec::new();
        while let Some(frame) = source.next_frame().await.unwrap() {
            stamps.push(frame.at.unwrap());
        }
        assert_eq!(
            stamps,
            vec![
                Duration::ZERO,
                Duration::from_millis(100),
                Duration::from_millis(200)
            ]
        );
    }
}
