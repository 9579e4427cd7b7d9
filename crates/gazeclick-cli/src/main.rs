//! gazeclick: hands-free pointer control from facial landmarks.
//!
//! Blinks become clicks and the right eye's position steers the cursor.
//!
//! Usage:
//!   gazeclick simulate                     # scripted demo face
//!   gazeclick run --input frames.jsonl     # replay recorded landmarks
//!   tracker | gazeclick run --keys         # live stream on stdin
//!   gazeclick config show                  # effective configuration

use std::process::ExitCode;

use clap::Parser;

mod commands;
mod controls;
mod logging;
mod runner;
mod source;

use commands::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let log = logging::init(cli.verbose);

    let config = match commands::load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    log.apply_config(&config.logging.level);

    let result = match cli.command {
        Commands::Run(ref args) => commands::run::run(args, config).await,
        Commands::Simulate(ref args) => commands::simulate::run(args, config).await,
        Commands::Config(ref args) => commands::config::run(args, &config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
