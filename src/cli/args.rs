//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::config::ShareTarget;
use crate::domain::recording::{Container, Duration};

/// audio-memo - record, play back and share short voice memos
#[derive(Parser, Debug)]
#[command(name = "audio-memo")]
#[command(version)]
#[command(about = "Record, play back and share short voice memos")]
#[command(long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Directory new recordings are written to
    #[arg(long, value_name = "DIR", global = true)]
    pub recordings_dir: Option<String>,

    /// Container for new recordings
    #[arg(long, value_name = "FORMAT", global = true)]
    pub container: Option<ContainerArg>,

    /// Where shared recordings go
    #[arg(long, value_name = "TARGET", global = true)]
    pub share_target: Option<ShareTargetArg>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a memo for a fixed time and print its path
    Record {
        /// Recording duration (e.g., 10s, 1m, 2m30s)
        #[arg(short = 'd', long, value_name = "TIME")]
        duration: Option<String>,

        /// Play the recording back once it is saved
        #[arg(short = 'p', long)]
        play: bool,

        /// Share the recording once it is saved
        #[arg(short = 's', long)]
        share: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Container argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ContainerArg {
    Wav,
    Flac,
}

impl From<ContainerArg> for Container {
    fn from(arg: ContainerArg) -> Self {
        match arg {
            ContainerArg::Wav => Container::Wav,
            ContainerArg::Flac => Container::Flac,
        }
    }
}

/// Share target argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ShareTargetArg {
    Open,
    Clipboard,
    None,
}

impl From<ShareTargetArg> for ShareTarget {
    fn from(arg: ShareTargetArg) -> Self {
        match arg {
            ShareTargetArg::Open => ShareTarget::Open,
            ShareTargetArg::Clipboard => ShareTarget::Clipboard,
            ShareTargetArg::None => ShareTarget::None,
        }
    }
}

/// Parsed options for a timed recording
#[derive(Debug, Clone)]
pub struct RecordOptions {
    pub duration: Duration,
    pub play: bool,
    pub share: bool,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["recordings_dir", "container", "share_target", "duration"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
