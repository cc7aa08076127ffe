//! Observable session state and the controller's error taxonomy

use std::fmt;

use thiserror::Error;

/// Kind of the latest failure surfaced by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    PermissionDenied,
    StartFailed,
    StopFailed,
    NothingToPlay,
    PlayFailed,
    NothingToShare,
    SharingUnavailable,
    ShareFailed,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission-denied",
            Self::StartFailed => "start-failed",
            Self::StopFailed => "stop-failed",
            Self::NothingToPlay => "nothing-to-play",
            Self::PlayFailed => "play-failed",
            Self::NothingToShare => "nothing-to-share",
            Self::SharingUnavailable => "sharing-unavailable",
            Self::ShareFailed => "share-failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failure of a controller operation.
/// Every variant is non-fatal; the session stays usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Microphone permission was denied")]
    PermissionDenied,

    #[error("Failed to start recording: {0}")]
    StartFailed(String),

    #[error("Failed to stop recording: {0}")]
    StopFailed(String),

    #[error("Nothing to play, record something first")]
    NothingToPlay,

    #[error("Playback failed: {0}")]
    PlayFailed(String),

    #[error("Nothing to share, record something first")]
    NothingToShare,

    #[error("Sharing is not available on this system")]
    SharingUnavailable,

    #[error("Sharing failed: {0}")]
    ShareFailed(String),
}

impl SessionError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::PermissionDenied => ErrorKind::PermissionDenied,
            Self::StartFailed(_) => ErrorKind::StartFailed,
            Self::StopFailed(_) => ErrorKind::StopFailed,
            Self::NothingToPlay => ErrorKind::NothingToPlay,
            Self::PlayFailed(_) => ErrorKind::PlayFailed,
            Self::NothingToShare => ErrorKind::NothingToShare,
            Self::SharingUnavailable => ErrorKind::SharingUnavailable,
            Self::ShareFailed(_) => ErrorKind::ShareFailed,
        }
    }
}

/// Coarse phase of the session, derived from the state flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Recording,
    /// Idle with a recorded asset available
    Ready,
    Playing,
}

impl SessionPhase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Ready => "ready",
            Self::Playing => "playing",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of the session as seen by callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionState {
    pub is_recording: bool,
    pub is_playing: bool,
    pub has_asset: bool,
    pub last_error: Option<ErrorKind>,
}

impl SessionState {
    pub const fn phase(&self) -> SessionPhase {
        if self.is_recording {
            SessionPhase::Recording
        } else if self.is_playing {
            SessionPhase::Playing
        } else if self.has_asset {
            SessionPhase::Ready
        } else {
            SessionPhase::Idle
        }
    }
}
