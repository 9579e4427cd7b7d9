//! The frame loop
//!
//! Waits on the next source frame, a shutdown signal and (optionally)
//! operator keys.
//! Frame processing itself is synchronous; the loop only awaits between
//! frames.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use gazeclick_core::{
    Actuator, ControlCommand, LandmarkFrame, LoopControl, Pipeline, SessionState,
};
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::controls::KeyCommands;
use crate::source::{LandmarkSource, TimedFrame};

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    EndOfStream,
    Quit,
    Interrupted,
    SourceFailed,
}

#[derive(Debug)]
pub struct SessionOutcome {
    pub state: SessionState,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub end: SessionEnd,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoopOptions {
    /// Sleep until each frame's timestamp before processing it
    pub realtime: bool,
}

async fn next_command(keys: &mut Option<KeyCommands>) -> Option<ControlCommand> {
    match keys {
        Some(keys) => keys.next_command().await,
        None => std::future::pending().await,
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
pub async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Ctrl-C handler unavailable: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Run frames from `source` through `pipeline` until the source ends, the
/// operator quits or `shutdown` resolves.
///
/// In realtime mode a frame waits for its timestamp inside the select, so
/// shutdown and keys stay live during long gaps in the stream.
pub async fn run_session(
    pipeline: &Pipeline,
    source: &mut dyn LandmarkSource,
    actuator: &mut dyn Actuator,
    mut keys: Option<KeyCommands>,
    shutdown: impl Future<Output = ()>,
    options: LoopOptions,
) -> SessionOutcome {
    let mut state = pipeline.new_session();
    let started_at = Utc::now();
    let start = Instant::now();
    let mut last_stamp = Duration::ZERO;

    // Frame read from the source but not yet due, with its session time.
    let mut pending: Option<(LandmarkFrame, Duration)> = None;

    tokio::pin!(shutdown);

    info!("Reading landmarks from {}", source.name());

    let end = loop {
        let due = start + pending.as_ref().map_or(Duration::ZERO, |(_, at)| *at);

        tokio::select! {
            biased;

            _ = &mut shutdown => {
                info!("Interrupted");
                break SessionEnd::Interrupted;
            }

            command = next_command(&mut keys), if keys.is_some() => match command {
                Some(command) => {
                    if state.apply_control(command) == LoopControl::Stop {
                        break SessionEnd::Quit;
                    }
                }
                None => keys = None,
            },

            _ = tokio::time::sleep_until(due), if pending.is_some() => {
                if let Some((frame, elapsed)) = pending.take() {
                    pipeline.process_frame(&mut state, &frame, elapsed, actuator);
                }
            }

            next = source.next_frame(), if pending.is_none() => match next {
                Ok(Some(TimedFrame { at: Some(at), frame })) => {
                    last_stamp = last_stamp.max(at);
                    if options.realtime {
                        pending = Some((frame, at));
                    } else {
                        pipeline.process_frame(&mut state, &frame, at, actuator);
                    }
                }
                Ok(Some(TimedFrame { at: None, frame })) => {
                    pipeline.process_frame(&mut state, &frame, start.elapsed(), actuator);
                }
                Ok(None) => {
                    info!("End of landmark stream");
                    break SessionEnd::EndOfStream;
                }
                Err(e) => {
                    error!("Landmark source failed: {:#}", e);
                    break SessionEnd::SourceFailed;
                }
            },
        }
    };

    drop(keys);

    SessionOutcome {
        state,
        started_at,
        duration: start.elapsed().max(last_stamp),
        end,
    }
}
