//! Recorded assets and the opaque handles issued by an audio device

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::error::EmptyLocatorError;

use super::encoding::AudioMimeType;

/// Opaque identifier of an in-progress capture session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordingHandle(u64);

impl RecordingHandle {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordingHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rec#{}", self.0)
    }
}

/// Opaque identifier of a loaded, playable sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaybackHandle(u64);

impl PlaybackHandle {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PlaybackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "snd#{}", self.0)
    }
}

/// Locator of a completed recording.
/// Immutable once produced; the file itself belongs to the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioAsset {
    path: PathBuf,
    mime_type: AudioMimeType,
}

impl AudioAsset {
    /// Create an asset from a non-empty path
    pub fn new(path: impl Into<PathBuf>, mime_type: AudioMimeType) -> Result<Self, EmptyLocatorError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(EmptyLocatorError);
        }
        Ok(Self { path, mime_type })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mime_type(&self) -> AudioMimeType {
        self.mime_type
    }

    /// `file://` URI of the asset
    pub fn uri(&self) -> String {
        let path = self.path.to_string_lossy();
        if path.starts_with('/') {
            format!("file://{}", path)
        } else {
            format!("file:///{}", path.replace('\\', "/"))
        }
    }

    /// Final path component, for display
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

impl fmt::Display for AudioAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
