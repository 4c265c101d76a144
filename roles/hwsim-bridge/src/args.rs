//! ## CLI Arguments Parsing Module
//!
//! Parses the command line and loads the TOML configuration it points at. Window paths and
//! logging given on the command line win over the file.

use clap::Parser;
use ext_config::{Config, File, FileFormat};
use hwsim_bridge::{
    config::BridgeConfig,
    error::{BridgeResult, Error},
};

use std::path::PathBuf;
use tracing::error;

#[derive(Debug, Parser)]
#[command(author, version, about = "hwsim medium bridge", long_about = None)]
pub struct Args {
    #[arg(
        short = 'c',
        long = "config",
        help = "Path to the TOML configuration file",
        default_value = "bridge-config.toml"
    )]
    pub config_path: PathBuf,
    #[arg(long = "window", help = "Window file the driver writes TX-info reports into")]
    pub window_path: Option<PathBuf>,
    #[arg(long = "reply", help = "File replies are appended to")]
    pub reply_path: Option<PathBuf>,
    #[arg(
        short = 'f',
        long = "log-file",
        help = "Path to the log file. If not set, logs will only be written to stdout."
    )]
    pub log_file: Option<PathBuf>,
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Log decoded windows (-v) or every codec step (-vv)"
    )]
    pub verbose: u8,
}

impl Args {
    fn log_level(&self) -> Option<String> {
        match self.verbose {
            0 => None,
            1 => Some("debug".to_string()),
            _ => Some("trace".to_string()),
        }
    }

    /// Applies the command line overrides on top of a loaded configuration.
    pub fn apply(self, mut config: BridgeConfig) -> BridgeConfig {
        config.set_log_level(self.log_level());
        config.set_window_path(self.window_path);
        config.set_reply_path(self.reply_path);
        config.set_log_file(self.log_file);
        config
    }
}

/// Process CLI args and load configuration.
pub fn process_cli_args() -> BridgeResult<BridgeConfig> {
    let args = Args::parse();

    let config_path = args.config_path.to_str().ok_or_else(|| {
        error!("Invalid configuration path.");
        Error::BadCliArgs
    })?;

    let settings = Config::builder()
        .add_source(File::new(config_path, FileFormat::Toml))
        .build()?;

    let config = settings.try_deserialize::<BridgeConfig>()?;
    Ok(args.apply(config))
}
