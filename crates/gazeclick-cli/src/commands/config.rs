//! `gazeclick config`: inspect configuration.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use gazeclick_config::config::user_config_path;
use gazeclick_config::{AppConfig, PROJECT_CONFIG_FILE};

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file locations, lowest priority first
    Paths,
}

pub fn run(args: &ConfigArgs, config: &AppConfig) -> Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let text = config
                .to_toml_string()
                .context("Failed to render configuration")?;
            print!("{text}");
        }
        ConfigCommand::Paths => {
            match user_config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("(no user config directory on this platform)"),
            }
            println!("{PROJECT_CONFIG_FILE}");
        }
    }
    Ok(())
}
