//! Recording session use case
//!
//! Drives the recorder/player lifecycle over the audio device and share ports.
//! Every operation surfaces its failure both as the returned `Result` and as the
//! session's latest error; nothing here panics on a device or share failure.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, Weak};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::recording::{AudioAsset, EncodingConfig, PlaybackHandle, RecordingHandle};
use crate::domain::session::{RecordingSession, SessionError, SessionState};

use super::ports::{AudioDevice, PlaybackCallback, RoutingMode, ShareService};

/// Output volume used for playback
pub const MAX_VOLUME: f32 = 1.0;

/// In-flight marker for one lifecycle (recording or playback)
struct Lane {
    busy: AtomicBool,
}

impl Lane {
    const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    fn try_enter(&self) -> Option<LaneGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LaneGuard(&self.busy))
    }
}

struct LaneGuard<'a>(&'a AtomicBool);

impl Drop for LaneGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Session entity plus its observers, shared with completion callbacks
struct Shared {
    session: Mutex<RecordingSession>,
    state_tx: watch::Sender<SessionState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, RecordingSession> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Mutate the session and publish the resulting state
    fn update<R>(&self, f: impl FnOnce(&mut RecordingSession) -> R) -> R {
        let (result, state) = {
            let mut session = self.lock();
            let result = f(&mut session);
            (result, session.state())
        };
        self.state_tx.send_replace(state);
        result
    }
}

/// Controller for recording, playing back and sharing a single memo
pub struct RecordingSessionController<D, S>
where
    D: AudioDevice,
    S: ShareService,
{
    device: D,
    share: S,
    encoding: EncodingConfig,
    shared: Arc<Shared>,
    recording_lane: Lane,
    playback_lane: Lane,
}

impl<D, S> RecordingSessionController<D, S>
where
    D: AudioDevice,
    S: ShareService,
{
    /// Create a controller in the idle state
    pub fn new(device: D, share: S, encoding: EncodingConfig) -> Self {
        let (state_tx, _) = watch::channel(SessionState::default());
        Self {
            device,
            share,
            encoding,
            shared: Arc::new(Shared {
                session: Mutex::new(RecordingSession::new()),
                state_tx,
            }),
            recording_lane: Lane::new(),
            playback_lane: Lane::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.shared.lock().state()
    }

    /// Receive every state change, including natural end of playback
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.state_tx.subscribe()
    }

    /// The most recent recording, if any
    pub fn asset(&self) -> Option<AudioAsset> {
        self.shared.lock().asset().cloned()
    }

    pub fn last_error(&self) -> Option<SessionError> {
        self.shared.lock().last_error().cloned()
    }

    pub fn encoding(&self) -> &EncodingConfig {
        &self.encoding
    }

    /// Start capturing from the microphone.
    /// No-op while a recording is active or either lifecycle is in flight.
    pub async fn start_recording(&self) -> Result<(), SessionError> {
        let Some(_recording) = self.recording_lane.try_enter() else {
            return ignore_busy("start recording");
        };
        let Some(_playback) = self.playback_lane.try_enter() else {
            return ignore_busy("start recording");
        };
        if self.shared.lock().is_recording() {
            debug!("start ignored, already recording");
            return Ok(());
        }

        let outcome = self.try_start_recording().await;
        self.finish("start recording", outcome)
    }

    async fn try_start_recording(&self) -> Result<(), SessionError> {
        if !self.device.request_permission().await.is_granted() {
            return Err(SessionError::PermissionDenied);
        }

        // Recording and playback never overlap
        self.release_playback().await;

        self.device
            .set_routing_mode(RoutingMode::RECORDING)
            .await
            .map_err(|e| SessionError::StartFailed(e.to_string()))?;

        let handle = match self.device.open_recording(&self.encoding).await {
            Ok(handle) => handle,
            Err(e) => {
                self.restore_routing().await;
                return Err(SessionError::StartFailed(e.to_string()));
            }
        };

        if let Err(e) = self.device.start_capture(handle).await {
            self.abandon_capture(handle).await;
            return Err(SessionError::StartFailed(e.to_string()));
        }

        if let Err(e) = self.shared.update(|s| s.begin_recording(handle)) {
            self.abandon_capture(handle).await;
            return Err(SessionError::StartFailed(e.to_string()));
        }

        info!(%handle, sample_rate = self.encoding.sample_rate, container = %self.encoding.container, "recording started");
        Ok(())
    }

    /// Finalize the active recording and keep its asset.
    /// No-op when nothing is recording.
    pub async fn stop_recording(&self) -> Result<(), SessionError> {
        let Some(_recording) = self.recording_lane.try_enter() else {
            return ignore_busy("stop recording");
        };
        let Some(handle) = self.shared.update(RecordingSession::take_recording) else {
            debug!("stop ignored, not recording");
            return Ok(());
        };

        let outcome = match self.device.stop_capture(handle).await {
            Ok(asset) => {
                info!(%handle, asset = %asset, "recording saved");
                self.shared.update(|s| s.complete_recording(asset));
                Ok(())
            }
            Err(e) => Err(SessionError::StopFailed(e.to_string())),
        };
        self.restore_routing().await;

        self.finish("stop recording", outcome)
    }

    /// Play the current asset from the start, replacing any loaded sound
    pub async fn play_recording(&self) -> Result<(), SessionError> {
        let Some(_playback) = self.playback_lane.try_enter() else {
            return ignore_busy("play recording");
        };
        let Some(_recording) = self.recording_lane.try_enter() else {
            return ignore_busy("play recording");
        };

        let outcome = self.try_play_recording().await;
        self.finish("play recording", outcome)
    }

    async fn try_play_recording(&self) -> Result<(), SessionError> {
        let asset = {
            let session = self.shared.lock();
            if session.is_recording() {
                return Err(SessionError::PlayFailed("recording in progress".to_string()));
            }
            session.asset().cloned().ok_or(SessionError::NothingToPlay)?
        };

        self.release_playback().await;

        let bound = Arc::new(OnceLock::new());
        let on_complete = completion_callback(Arc::downgrade(&self.shared), Arc::clone(&bound));
        let handle = self
            .device
            .load_sound(&asset, on_complete)
            .await
            .map_err(|e| SessionError::PlayFailed(e.to_string()))?;
        let _ = bound.set(handle);

        if let Err(e) = self.shared.update(|s| s.attach_playback(handle)) {
            self.unload_quietly(handle).await;
            return Err(SessionError::PlayFailed(e.to_string()));
        }

        self.device
            .set_volume(handle, MAX_VOLUME)
            .await
            .map_err(|e| SessionError::PlayFailed(e.to_string()))?;

        // Marked before play so an immediate completion is not lost
        self.shared
            .update(|s| s.mark_playing(handle))
            .map_err(|e| SessionError::PlayFailed(e.to_string()))?;

        if let Err(e) = self.device.play(handle).await {
            self.shared.update(RecordingSession::mark_stopped);
            return Err(SessionError::PlayFailed(e.to_string()));
        }

        info!(%handle, asset = %asset, "playback started");
        Ok(())
    }

    /// Stop the playing sound. The sound stays loaded.
    /// No-op when nothing is playing.
    pub async fn stop_playback(&self) -> Result<(), SessionError> {
        let Some(_playback) = self.playback_lane.try_enter() else {
            return ignore_busy("stop playback");
        };
        let handle = {
            let session = self.shared.lock();
            match (session.is_playing(), session.playback_handle()) {
                (true, Some(handle)) => handle,
                _ => {
                    debug!("stop ignored, not playing");
                    return Ok(());
                }
            }
        };

        if let Err(e) = self.device.stop(handle).await {
            warn!(%handle, error = %e, "stop failed, releasing sound");
            self.release_playback().await;
        }
        self.shared.update(RecordingSession::mark_stopped);
        info!(%handle, "playback stopped");

        self.finish("stop playback", Ok(()))
    }

    /// Hand the current asset to the share service
    pub async fn share_recording(&self) -> Result<(), SessionError> {
        let outcome = self.try_share_recording().await;
        self.finish("share recording", outcome)
    }

    async fn try_share_recording(&self) -> Result<(), SessionError> {
        let asset = self
            .shared
            .lock()
            .asset()
            .cloned()
            .ok_or(SessionError::NothingToShare)?;

        if !self.share.is_available().await {
            return Err(SessionError::SharingUnavailable);
        }

        self.share
            .share(&asset, asset.mime_type().as_str())
            .await
            .map_err(|e| SessionError::ShareFailed(e.to_string()))?;

        info!(asset = %asset, "recording shared");
        Ok(())
    }

    /// Release every handle: finish an active recording (keeping its asset),
    /// restore default routing, stop and unload playback. Never fails.
    pub async fn shutdown(&self) {
        if let Some(_recording) = self.recording_lane.try_enter() {
            if let Some(handle) = self.shared.update(RecordingSession::take_recording) {
                match self.device.stop_capture(handle).await {
                    Ok(asset) => {
                        info!(%handle, asset = %asset, "recording saved on shutdown");
                        self.shared.update(|s| s.complete_recording(asset));
                    }
                    Err(e) => warn!(%handle, error = %e, "recording lost on shutdown"),
                }
                self.restore_routing().await;
            }
        }

        if let Some(_playback) = self.playback_lane.try_enter() {
            self.release_playback().await;
        }

        debug!("session shut down");
    }

    fn finish(&self, action: &str, outcome: Result<(), SessionError>) -> Result<(), SessionError> {
        if let Err(e) = &outcome {
            info!(action, kind = %e.kind(), error = %e, "operation failed");
        }
        self.shared.update(|s| s.record_outcome(&outcome));
        outcome
    }

    /// Unload the current sound, if any
    async fn release_playback(&self) {
        if let Some(handle) = self.shared.update(RecordingSession::take_playback) {
            self.unload_quietly(handle).await;
        }
    }

    async fn unload_quietly(&self, handle: PlaybackHandle) {
        match self.device.unload(handle).await {
            Ok(()) => debug!(%handle, "sound unloaded"),
            Err(e) => warn!(%handle, error = %e, "failed to unload sound"),
        }
    }

    /// Best-effort release of a capture that never became active
    async fn abandon_capture(&self, handle: RecordingHandle) {
        if let Err(e) = self.device.stop_capture(handle).await {
            debug!(%handle, error = %e, "discarded capture");
        }
        self.restore_routing().await;
    }

    async fn restore_routing(&self) {
        if let Err(e) = self.device.set_routing_mode(RoutingMode::DEFAULT).await {
            warn!(error = %e, "failed to restore default audio routing");
        }
    }
}

fn ignore_busy(action: &str) -> Result<(), SessionError> {
    debug!(action, "ignored, lifecycle busy");
    Ok(())
}

/// Completion callback bound to the handle stored in `bound` once loading returns
fn completion_callback(
    shared: Weak<Shared>,
    bound: Arc<OnceLock<PlaybackHandle>>,
) -> PlaybackCallback {
    Arc::new(move || {
        let (Some(shared), Some(&handle)) = (shared.upgrade(), bound.get()) else {
            return;
        };
        if shared.update(|s| s.complete_playback(handle)) {
            info!(%handle, "playback finished");
        }
    })
}
