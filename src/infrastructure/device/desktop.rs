//! Desktop audio device: cpal capture, rodio playback
//!
//! Blocking hardware and file work runs on tokio's blocking pool.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use super::capture::{self, ActiveCapture};
use super::encoder;
use super::playback::{check_volume, LoadedSound};
use crate::application::ports::{AudioDevice, DeviceError, PlaybackCallback, Permission, RoutingMode};
use crate::domain::recording::{AudioAsset, EncodingConfig, PlaybackHandle, RecordingHandle};

/// The single capture a device may have open
struct CaptureSlot {
    handle: RecordingHandle,
    path: PathBuf,
    config: EncodingConfig,
    active: Option<ActiveCapture>,
}

#[derive(Default)]
struct DeviceState {
    routing: RoutingMode,
    capture: Option<CaptureSlot>,
    sounds: HashMap<PlaybackHandle, LoadedSound>,
}

struct Inner {
    recordings_dir: PathBuf,
    state: Mutex<DeviceState>,
    next_id: AtomicU64,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Audio device backed by the host's default input and output
#[derive(Clone)]
pub struct DesktopAudioDevice {
    inner: Arc<Inner>,
}

impl DesktopAudioDevice {
    /// Create a device writing recordings into `recordings_dir`
    pub fn new(recordings_dir: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                recordings_dir: recordings_dir.into(),
                state: Mutex::new(DeviceState::default()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    pub fn recordings_dir(&self) -> &std::path::Path {
        &self.inner.recordings_dir
    }

    /// Run blocking work against the device state on the blocking pool
    async fn blocking<T, F>(&self, on_join_error: fn(String) -> DeviceError, f: F) -> Result<T, DeviceError>
    where
        F: FnOnce(&Inner) -> Result<T, DeviceError> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || f(&inner))
            .await
            .map_err(|e| on_join_error(format!("Task join error: {}", e)))?
    }
}

#[async_trait]
impl AudioDevice for DesktopAudioDevice {
    async fn request_permission(&self) -> Permission {
        let found = tokio::task::spawn_blocking(capture::has_input_device)
            .await
            .unwrap_or(false);
        if found {
            Permission::Granted
        } else {
            debug!("no default input device, permission denied");
            Permission::Denied
        }
    }

    async fn set_routing_mode(&self, mode: RoutingMode) -> Result<(), DeviceError> {
        self.inner.lock().routing = mode;
        debug!(recording_enabled = mode.recording_enabled, "routing mode set");
        Ok(())
    }

    async fn open_recording(&self, config: &EncodingConfig) -> Result<RecordingHandle, DeviceError> {
        let config = *config;
        self.blocking(DeviceError::OpenFailed, move |inner| {
            {
                let state = inner.lock();
                if !state.routing.recording_enabled {
                    return Err(DeviceError::RoutingDisabled);
                }
                if let Some(slot) = &state.capture {
                    return Err(DeviceError::Busy(format!("{} is still open", slot.handle)));
                }
            }

            if !capture::has_input_device() {
                return Err(DeviceError::NoInputDevice);
            }

            std::fs::create_dir_all(&inner.recordings_dir).map_err(|e| {
                DeviceError::OpenFailed(format!("{}: {}", inner.recordings_dir.display(), e))
            })?;
            let path = inner.recordings_dir.join(format!(
                "recording-{}.{}",
                Uuid::new_v4(),
                config.extension()
            ));

            let mut state = inner.lock();
            if let Some(slot) = &state.capture {
                return Err(DeviceError::Busy(format!("{} is still open", slot.handle)));
            }
            let handle = RecordingHandle::new(inner.next_id());
            state.capture = Some(CaptureSlot {
                handle,
                path: path.clone(),
                config,
                active: None,
            });

            debug!(%handle, path = %path.display(), "recording opened");
            Ok(handle)
        })
        .await
    }

    async fn start_capture(&self, handle: RecordingHandle) -> Result<(), DeviceError> {
        self.blocking(DeviceError::CaptureFailed, move |inner| {
            let config = {
                let state = inner.lock();
                match &state.capture {
                    Some(slot) if slot.handle == handle => {
                        if slot.active.is_some() {
                            return Err(DeviceError::Busy(format!("{} is already capturing", handle)));
                        }
                        slot.config
                    }
                    _ => return Err(DeviceError::UnknownHandle(handle.to_string())),
                }
            };

            let active = ActiveCapture::start(&config)?;

            let mut state = inner.lock();
            match state.capture.as_mut() {
                Some(slot) if slot.handle == handle => {
                    slot.active = Some(active);
                    Ok(())
                }
                // Released while the stream was starting
                _ => {
                    drop(state);
                    active.finish();
                    Err(DeviceError::UnknownHandle(handle.to_string()))
                }
            }
        })
        .await
    }

    async fn stop_capture(&self, handle: RecordingHandle) -> Result<AudioAsset, DeviceError> {
        self.blocking(DeviceError::CaptureFailed, move |inner| {
            let slot = {
                let mut state = inner.lock();
                match state.capture.take() {
                    Some(slot) if slot.handle == handle => slot,
                    other => {
                        state.capture = other;
                        return Err(DeviceError::UnknownHandle(handle.to_string()));
                    }
                }
            };

            let captured = slot
                .active
                .map(ActiveCapture::finish)
                .ok_or(DeviceError::NoAudioCaptured)?;
            if captured.samples.is_empty() {
                return Err(DeviceError::NoAudioCaptured);
            }

            let source = captured.format;
            let samples = captured.conform(&slot.config)?;
            if samples.is_empty() {
                return Err(DeviceError::NoAudioCaptured);
            }

            let bytes = encoder::encode(&samples, &slot.config)
                .map_err(|e| DeviceError::EncodeFailed(e.to_string()))?;
            std::fs::write(&slot.path, &bytes)
                .map_err(|e| DeviceError::WriteFailed(format!("{}: {}", slot.path.display(), e)))?;

            info!(
                %handle,
                path = %slot.path.display(),
                device_rate = source.sample_rate,
                device_channels = source.channels,
                bytes = bytes.len(),
                "recording written"
            );

            AudioAsset::new(slot.path, slot.config.mime_type())
                .map_err(|e| DeviceError::WriteFailed(e.to_string()))
        })
        .await
    }

    async fn load_sound(
        &self,
        asset: &AudioAsset,
        on_complete: PlaybackCallback,
    ) -> Result<PlaybackHandle, DeviceError> {
        let asset = asset.clone();
        self.blocking(DeviceError::LoadFailed, move |inner| {
            let sound = LoadedSound::load(&asset, on_complete)?;
            let handle = PlaybackHandle::new(inner.next_id());
            inner.lock().sounds.insert(handle, sound);

            debug!(%handle, asset = %asset, "sound loaded");
            Ok(handle)
        })
        .await
    }

    async fn set_volume(&self, handle: PlaybackHandle, level: f32) -> Result<(), DeviceError> {
        let level = check_volume(level)?;
        self.inner
            .lock()
            .sounds
            .get_mut(&handle)
            .ok_or_else(|| DeviceError::UnknownHandle(handle.to_string()))?
            .set_volume(level)
    }

    async fn play(&self, handle: PlaybackHandle) -> Result<(), DeviceError> {
        self.blocking(DeviceError::PlaybackFailed, move |inner| {
            inner
                .lock()
                .sounds
                .get_mut(&handle)
                .ok_or_else(|| DeviceError::UnknownHandle(handle.to_string()))?
                .play()
        })
        .await
    }

    async fn stop(&self, handle: PlaybackHandle) -> Result<(), DeviceError> {
        self.blocking(DeviceError::PlaybackFailed, move |inner| {
            inner
                .lock()
                .sounds
                .get_mut(&handle)
                .ok_or_else(|| DeviceError::UnknownHandle(handle.to_string()))?
                .halt();
            Ok(())
        })
        .await
    }

    async fn unload(&self, handle: PlaybackHandle) -> Result<(), DeviceError> {
        self.blocking(DeviceError::PlaybackFailed, move |inner| {
            let sound = inner
                .lock()
                .sounds
                .remove(&handle)
                .ok_or_else(|| DeviceError::UnknownHandle(handle.to_string()))?;
            // Dropping halts the output thread
            drop(sound);
            debug!(%handle, "sound released");
            Ok(())
        })
        .await
    }
}
