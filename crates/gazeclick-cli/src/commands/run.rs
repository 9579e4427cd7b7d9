//! `gazeclick run`: track a recorded or live landmark stream.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use gazeclick_config::AppConfig;

use super::{execute_session, SessionArgs};
use crate::source::JsonLinesSource;

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// JSON Lines landmark file; reads stdin when omitted or "-"
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub session: SessionArgs,
}

pub async fn run(args: &RunArgs, config: AppConfig) -> Result<()> {
    match args.input.as_deref() {
        Some(path) if path != Path::new("-") => {
            let mut source = JsonLinesSource::open(path).await?;
            execute_session(config, &args.session, &mut source).await
        }
        _ => {
            let mut source = JsonLinesSource::stdin();
            execute_session(config, &args.session, &mut source).await
        }
    }
}
