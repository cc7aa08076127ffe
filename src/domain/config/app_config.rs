//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::recording::{Container, Duration};

use super::ShareTarget;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub recordings_dir: Option<String>,
    pub container: Option<String>,
    pub share_target: Option<String>,
    pub duration: Option<String>,
}

impl AppConfig {
    /// Create config with default values.
    /// `recordings_dir` is resolved at runtime, see `recordings_dir_or_default`.
    pub fn defaults() -> Self {
        Self {
            recordings_dir: None,
            container: Some(Container::platform_default().to_string()),
            share_target: Some(ShareTarget::default().to_string()),
            duration: Some(Duration::default_duration().to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    pub fn merge(self, other: Self) -> Self {
        Self {
            recordings_dir: other.recordings_dir.or(self.recordings_dir),
            container: other.container.or(self.container),
            share_target: other.share_target.or(self.share_target),
            duration: other.duration.or(self.duration),
        }
    }

    /// Configured recordings directory, or `<local data dir>/audio-memo/recordings`
    pub fn recordings_dir_or_default(&self) -> PathBuf {
        match self.recordings_dir.as_deref().map(str::trim) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => Self::default_recordings_dir(),
        }
    }

    pub fn default_recordings_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("audio-memo")
            .join("recordings")
    }

    /// Get container, or the platform default if not set/invalid
    pub fn container_or_default(&self) -> Container {
        self.container
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get share target, or `open` if not set/invalid
    pub fn share_target_or_default(&self) -> ShareTarget {
        self.share_target
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get timed recording length, or default if not set/invalid
    pub fn duration_or_default(&self) -> Duration {
        self.duration
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}
