//! Recording session state machine

use thiserror::Error;

use crate::domain::recording::{AudioAsset, PlaybackHandle, RecordingHandle};

use super::state::{SessionError, SessionPhase, SessionState};

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while {phase}")]
pub struct InvalidStateTransition {
    pub phase: SessionPhase,
    pub action: String,
}

/// Recording session entity.
/// Owns the handles and the current asset; performs no I/O.
///
/// State machine:
///   IDLE/READY -> RECORDING (begin_recording)
///   RECORDING -> IDLE/READY (take_recording, then complete_recording on success)
///   READY -> PLAYING (attach_playback + mark_playing)
///   PLAYING -> READY (mark_stopped, complete_playback)
#[derive(Debug, Default)]
pub struct RecordingSession {
    recording: Option<RecordingHandle>,
    asset: Option<AudioAsset>,
    playback: Option<PlaybackHandle>,
    playing: bool,
    last_error: Option<SessionError>,
}

impl RecordingSession {
    /// Create an idle session with no asset
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            is_recording: self.is_recording(),
            is_playing: self.is_playing(),
            has_asset: self.asset.is_some(),
            last_error: self.last_error.as_ref().map(SessionError::kind),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.state().phase()
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn asset(&self) -> Option<&AudioAsset> {
        self.asset.as_ref()
    }

    pub fn recording_handle(&self) -> Option<RecordingHandle> {
        self.recording
    }

    pub fn playback_handle(&self) -> Option<PlaybackHandle> {
        self.playback
    }

    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    /// Adopt a freshly started capture
    pub fn begin_recording(&mut self, handle: RecordingHandle) -> Result<(), InvalidStateTransition> {
        if self.recording.is_some() || self.playing {
            return Err(self.invalid("start recording"));
        }
        self.recording = Some(handle);
        Ok(())
    }

    /// Discard the capture handle; the session is no longer recording
    pub fn take_recording(&mut self) -> Option<RecordingHandle> {
        self.recording.take()
    }

    /// Store the asset of a finished capture, superseding any previous one
    pub fn complete_recording(&mut self, asset: AudioAsset) {
        self.asset = Some(asset);
    }

    /// Adopt a loaded sound. Any previous sound must have been released.
    pub fn attach_playback(&mut self, handle: PlaybackHandle) -> Result<(), InvalidStateTransition> {
        if self.recording.is_some() || self.playback.is_some() || self.asset.is_none() {
            return Err(self.invalid("load playback"));
        }
        self.playback = Some(handle);
        Ok(())
    }

    /// Release the loaded sound, if any; the session is no longer playing
    pub fn take_playback(&mut self) -> Option<PlaybackHandle> {
        self.playing = false;
        self.playback.take()
    }

    pub fn mark_playing(&mut self, handle: PlaybackHandle) -> Result<(), InvalidStateTransition> {
        if self.playback != Some(handle) {
            return Err(self.invalid("play an unloaded sound"));
        }
        self.playing = true;
        Ok(())
    }

    pub fn mark_stopped(&mut self) {
        self.playing = false;
    }

    /// Natural end of playback for `handle`.
    /// Returns false when the handle is stale or already stopped.
    pub fn complete_playback(&mut self, handle: PlaybackHandle) -> bool {
        if self.playing && self.playback == Some(handle) {
            self.playing = false;
            true
        } else {
            false
        }
    }

    /// Record the outcome of an operation; each attempt overwrites the previous error
    pub fn record_outcome(&mut self, outcome: &Result<(), SessionError>) {
        self.last_error = outcome.as_ref().err().cloned();
    }

    fn invalid(&self, action: &str) -> InvalidStateTransition {
        InvalidStateTransition {
            phase: self.phase(),
            action: action.to_string(),
        }
    }
}
