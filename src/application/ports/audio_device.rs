//! Audio device port interface

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::{AudioAsset, EncodingConfig, PlaybackHandle, RecordingHandle};

/// Audio device errors
#[derive(Debug, Clone, Error)]
pub enum DeviceError {
    #[error("No audio input device available")]
    NoInputDevice,

    #[error("Audio routing is not configured for recording")]
    RoutingDisabled,

    #[error("Device busy: {0}")]
    Busy(String),

    #[error("Unknown handle: {0}")]
    UnknownHandle(String),

    #[error("Failed to open recording: {0}")]
    OpenFailed(String),

    #[error("Audio capture failed: {0}")]
    CaptureFailed(String),

    #[error("No audio data captured")]
    NoAudioCaptured,

    #[error("Failed to encode audio: {0}")]
    EncodeFailed(String),

    #[error("Failed to write audio file: {0}")]
    WriteFailed(String),

    #[error("Failed to load sound: {0}")]
    LoadFailed(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    #[error("Volume must be between 0.0 and 1.0, got {0}")]
    InvalidVolume(f32),
}

/// Outcome of a microphone permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

impl Permission {
    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Audio routing the device is configured for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingMode {
    pub recording_enabled: bool,
    pub allow_silent_mode_playback: bool,
}

impl RoutingMode {
    /// Routing while a capture is open
    pub const RECORDING: Self = Self {
        recording_enabled: true,
        allow_silent_mode_playback: true,
    };

    /// Default, playback-only routing
    pub const DEFAULT: Self = Self {
        recording_enabled: false,
        allow_silent_mode_playback: true,
    };
}

impl Default for RoutingMode {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Callback fired once when a sound reaches its natural end
pub type PlaybackCallback = Arc<dyn Fn() + Send + Sync>;

/// Port for microphone capture and sound playback
#[async_trait]
pub trait AudioDevice: Send + Sync {
    /// Ask for permission to use the microphone
    async fn request_permission(&self) -> Permission;

    /// Configure audio routing for recording or plain playback
    async fn set_routing_mode(&self, mode: RoutingMode) -> Result<(), DeviceError>;

    /// Open a capture session with the given encoding
    async fn open_recording(&self, config: &EncodingConfig) -> Result<RecordingHandle, DeviceError>;

    /// Begin capturing into an open session
    async fn start_capture(&self, handle: RecordingHandle) -> Result<(), DeviceError>;

    /// Finalize the capture and release the handle.
    ///
    /// # Returns
    /// The locator of the written recording
    async fn stop_capture(&self, handle: RecordingHandle) -> Result<AudioAsset, DeviceError>;

    /// Load an asset for playback.
    ///
    /// # Arguments
    /// * `asset` - The recording to load
    /// * `on_complete` - Fired once when playback ends naturally, never on `stop`/`unload`
    async fn load_sound(
        &self,
        asset: &AudioAsset,
        on_complete: PlaybackCallback,
    ) -> Result<PlaybackHandle, DeviceError>;

    /// Set output volume in `[0, 1]`
    async fn set_volume(&self, handle: PlaybackHandle, level: f32) -> Result<(), DeviceError>;

    async fn play(&self, handle: PlaybackHandle) -> Result<(), DeviceError>;

    async fn stop(&self, handle: PlaybackHandle) -> Result<(), DeviceError>;

    /// Release a loaded sound, stopping it first if needed
    async fn unload(&self, handle: PlaybackHandle) -> Result<(), DeviceError>;
}

/// Blanket implementation for shared audio devices
#[async_trait]
impl<T: AudioDevice + ?Sized> AudioDevice for Arc<T> {
    async fn request_permission(&self) -> Permission {
        self.as_ref().request_permission().await
    }

    async fn set_routing_mode(&self, mode: RoutingMode) -> Result<(), DeviceError> {
        self.as_ref().set_routing_mode(mode).await
    }

    async fn open_recording(&self, config: &EncodingConfig) -> Result<RecordingHandle, DeviceError> {
        self.as_ref().open_recording(config).await
    }

    async fn start_capture(&self, handle: RecordingHandle) -> Result<(), DeviceError> {
        self.as_ref().start_capture(handle).await
    }

    async fn stop_capture(&self, handle: RecordingHandle) -> Result<AudioAsset, DeviceError> {
        self.as_ref().stop_capture(handle).await
    }

    async fn load_sound(
        &self,
        asset: &AudioAsset,
        on_complete: PlaybackCallback,
    ) -> Result<PlaybackHandle, DeviceError> {
        self.as_ref().load_sound(asset, on_complete).await
    }

    async fn set_volume(&self, handle: PlaybackHandle, level: f32) -> Result<(), DeviceError> {
        self.as_ref().set_volume(handle, level).await
    }

    async fn play(&self, handle: PlaybackHandle) -> Result<(), DeviceError> {
        self.as_ref().play(handle).await
    }

    async fn stop(&self, handle: PlaybackHandle) -> Result<(), DeviceError> {
        self.as_ref().stop(handle).await
    }

    async fn unload(&self, handle: PlaybackHandle) -> Result<(), DeviceError> {
        self.as_ref().unload(handle).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routing_presets() {
        assert!(RoutingMode::RECORDING.recording_enabled);
        assert!(!RoutingMode::DEFAULT.recording_enabled);
        assert_eq!(RoutingMode::default(), RoutingMode::DEFAULT);
    }

    #[test]
    fn permission_granted() {
        assert!(Permission::Granted.is_granted());
        assert!(!Permission::Denied.is_granted());
    }

    #[test]
    fn invalid_volume_message() {
        let msg = DeviceError::InvalidVolume(1.5).to_string();
        assert!(msg.contains("1.5"));
    }
}
