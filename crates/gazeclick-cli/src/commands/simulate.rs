//! `gazeclick simulate`: drive the pipeline with a scripted synthetic face.

use anyhow::{ensure, Result};
use clap::Args;
use gazeclick_config::AppConfig;
use gazeclick_core::SyntheticFace;

use super::{execute_session, SessionArgs};
use crate::source::SyntheticSource;

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Width of the synthetic camera frame
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Height of the synthetic camera frame
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    #[command(flatten)]
    pub session: SessionArgs,
}

pub async fn run(args: &SimulateArgs, config: AppConfig) -> Result<()> {
    ensure!(
        args.width >= 320 && args.height >= 240,
        "synthetic frame must be at least 320x240, got {}x{}",
        args.width,
        args.height
    );

    let mut source = SyntheticSource::demo(SyntheticFace::new(args.width, args.height));
    execute_session(config, &args.session, &mut source).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_demo_writes_report() {
        let dir = TempDir::new().unwrap();
        let args = SimulateArgs {
            width: 1280,
            height: 720,
            session: SessionArgs {
                report_dir: Some(dir.path().to_path_buf()),
                ..SessionArgs::default()
            },
        };

        run(&args, AppConfig::default()).await.unwrap();

        let written: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(written.len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_tiny_frame() {
        let args = SimulateArgs {
            width: 100,
            height: 100,
            session: SessionArgs::default(),
        };
        assert!(run(&args, AppConfig::default()).await.is_err());
    }
}
