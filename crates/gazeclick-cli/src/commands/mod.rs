//! CLI command definitions and the shared session driver.

pub mod config;
pub mod run;
pub mod simulate;

use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use gazeclick_config::AppConfig;
use gazeclick_core::{Actuator, JsonLinesActuator, LoggingActuator, Pipeline, SessionReport};
use tracing::info;

use crate::controls::KeyCommands;
use crate::runner::{self, LoopOptions, SessionEnd};
use crate::source::LandmarkSource;

/// gazeclick - blink to click, look to move
#[derive(Parser, Debug)]
#[command(name = "gazeclick")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file applied over the user and project configs
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Track a JSON Lines landmark stream
    Run(run::RunArgs),
    /// Run the built-in synthetic face demo
    Simulate(simulate::SimulateArgs),
    /// Inspect the effective configuration
    Config(config::ConfigArgs),
}

/// Screen size given as `WIDTHxHEIGHT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl FromStr for ScreenSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
        let width = w.trim().parse().map_err(|_| format!("invalid width '{w}'"))?;
        let height = h.trim().parse().map_err(|_| format!("invalid height '{h}'"))?;
        Ok(Self { width, height })
    }
}

/// Options shared by every command that runs a session
#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Pace frames by their timestamps instead of replaying as fast as possible
    #[arg(long)]
    pub realtime: bool,

    /// Read control keys from the terminal (c: calibration, q: quit)
    #[arg(long)]
    pub keys: bool,

    /// Print actions as JSON lines on stdout instead of logging them
    #[arg(long)]
    pub emit_actions: bool,

    /// Target screen size, e.g. 2560x1440
    #[arg(long, value_name = "WxH")]
    pub screen: Option<ScreenSize>,

    /// Do not write a session report
    #[arg(long)]
    pub no_report: bool,

    /// Directory the session report is written into
    #[arg(long)]
    pub report_dir: Option<PathBuf>,
}

impl SessionArgs {
    /// Command-line flags win over every config layer.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(screen) = self.screen {
            config.screen.width = screen.width;
            config.screen.height = screen.height;
        }
        if self.no_report {
            config.report.enabled = false;
        }
        if let Some(dir) = &self.report_dir {
            config.report.output_dir = dir.clone();
        }
    }
}

pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")
}

/// Run one session from `source`, then summarize and write the report.
pub async fn execute_session(
    mut config: AppConfig,
    args: &SessionArgs,
    source: &mut dyn LandmarkSource,
) -> Result<()> {
    args.apply(&mut config);
    let pipeline = Pipeline::new(&config).context("Invalid configuration")?;

    let mut actuator: Box<dyn Actuator> = if args.emit_actions {
        Box::new(JsonLinesActuator::new(io::stdout()))
    } else {
        Box::new(LoggingActuator)
    };

    let keys = if args.keys {
        Some(KeyCommands::start().context("Failed to enable terminal key input")?)
    } else {
        None
    };

    info!(
        "Screen {}x{}, EAR threshold {}, debounce {} frames, deadzone {}",
        config.screen.width,
        config.screen.height,
        config.blink.ear_threshold,
        config.blink.debounce_frames,
        config.motion.deadzone
    );

    let outcome = runner::run_session(
        &pipeline,
        source,
        actuator.as_mut(),
        keys,
        runner::interrupted(),
        LoopOptions {
            realtime: args.realtime,
        },
    )
    .await;

    let report = SessionReport::from_session(
        &outcome.state,
        outcome.started_at,
        outcome.duration,
        config.report.include_series,
    );
    eprintln!("{report}");

    if config.report.enabled {
        report
            .write_to_dir(&config.report.output_dir)
            .context("Failed to write session report")?;
    }

    if outcome.end == SessionEnd::SourceFailed {
        bail!("Landmark source failed before the end of the stream");
    }
    Ok(())
}
