//! Session controller scenarios through the public API, with hand-written port fakes

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use audio_memo::application::ports::{
    AudioDevice, DeviceError, Permission, PlaybackCallback, RoutingMode, ShareError, ShareService,
};
use audio_memo::application::RecordingSessionController;
use audio_memo::domain::recording::{
    AudioAsset, Container, EncodingConfig, PlaybackHandle, RecordingHandle,
};
use audio_memo::domain::session::{ErrorKind, SessionError, SessionPhase};

/// In-memory device that "writes" assets into a fake directory
#[derive(Default)]
struct MemoryDevice {
    deny_permission: AtomicBool,
    fail_open: AtomicBool,
    next_id: AtomicU64,
    open_captures: AtomicUsize,
    loaded_sounds: AtomicUsize,
    routing: Mutex<Option<RoutingMode>>,
    opened_with: Mutex<Vec<EncodingConfig>>,
    callbacks: Mutex<Vec<(PlaybackHandle, PlaybackCallback)>>,
}

impl MemoryDevice {
    fn id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Let the most recently loaded sound reach its end
    fn drain_last_sound(&self) {
        let callback = self
            .callbacks
            .lock()
            .unwrap()
            .last()
            .map(|(_, cb)| Arc::clone(cb))
            .expect("a sound should be loaded");
        callback();
    }

    fn routing(&self) -> Option<RoutingMode> {
        *self.routing.lock().unwrap()
    }
}

#[async_trait]
impl AudioDevice for MemoryDevice {
    async fn request_permission(&self) -> Permission {
        if self.deny_permission.load(Ordering::SeqCst) {
            Permission::Denied
        } else {
            Permission::Granted
        }
    }

    async fn set_routing_mode(&self, mode: RoutingMode) -> Result<(), DeviceError> {
        *self.routing.lock().unwrap() = Some(mode);
        Ok(())
    }

    async fn open_recording(&self, config: &EncodingConfig) -> Result<RecordingHandle, DeviceError> {
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(DeviceError::OpenFailed("input device unplugged".into()));
        }
        if self.open_captures.fetch_add(1, Ordering::SeqCst) > 0 {
            return Err(DeviceError::Busy("capture already open".into()));
        }
        self.opened_with.lock().unwrap().push(*config);
        Ok(RecordingHandle::new(self.id()))
    }

    async fn start_capture(&self, _handle: RecordingHandle) -> Result<(), DeviceError> {
        Ok(())
    }

    async fn stop_capture(&self, handle: RecordingHandle) -> Result<AudioAsset, DeviceError> {
        self.open_captures.fetch_sub(1, Ordering::SeqCst);
        let config = *self.opened_with.lock().unwrap().last().unwrap();
        Ok(AudioAsset::new(
            format!("/memos/recording-{}.{}", handle.id(), config.extension()),
            config.mime_type(),
        )
        .unwrap())
    }

    async fn load_sound(
        &self,
        _asset: &AudioAsset,
        on_complete: PlaybackCallback,
    ) -> Result<PlaybackHandle, DeviceError> {
        // Decoding takes a moment on a real device
        tokio::task::yield_now().await;
        self.loaded_sounds.fetch_add(1, Ordering::SeqCst);
        let handle = PlaybackHandle::new(self.id());
        self.callbacks.lock().unwrap().push((handle, on_complete));
        Ok(handle)
    }

    async fn set_volume(&self, _handle: PlaybackHandle, level: f32) -> Result<(), DeviceError> {
        if !(0.0..=1.0).contains(&level) {
            return Err(DeviceError::InvalidVolume(level));
        }
        Ok(())
    }

    async fn play(&self, _handle: PlaybackHandle) -> Result<(), DeviceError> {
        Ok(())
    }

    async fn stop(&self, _handle: PlaybackHandle) -> Result<(), DeviceError> {
        Ok(())
    }

    async fn unload(&self, _handle: PlaybackHandle) -> Result<(), DeviceError> {
        self.loaded_sounds.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
struct RecordingShare {
    shared: Mutex<Vec<(AudioAsset, String)>>,
}

#[async_trait]
impl ShareService for RecordingShare {
    async fn is_available(&self) -> bool {
        true
    }

    async fn share(&self, asset: &AudioAsset, mime_hint: &str) -> Result<(), ShareError> {
        self.shared
            .lock()
            .unwrap()
            .push((asset.clone(), mime_hint.to_string()));
        Ok(())
    }
}

type Controller = RecordingSessionController<Arc<MemoryDevice>, Arc<RecordingShare>>;

fn setup(container: Container) -> (Arc<MemoryDevice>, Arc<RecordingShare>, Controller) {
    let device = Arc::new(MemoryDevice::default());
    let share = Arc::new(RecordingShare::default());
    let controller = RecordingSessionController::new(
        Arc::clone(&device),
        Arc::clone(&share),
        EncodingConfig::high_quality().with_container(container),
    );
    (device, share, controller)
}

#[tokio::test]
async fn record_play_share_cycle() {
    let (device, share, controller) = setup(Container::Flac);

    controller.start_recording().await.unwrap();
    assert_eq!(controller.state().phase(), SessionPhase::Recording);
    assert_eq!(device.routing(), Some(RoutingMode::RECORDING));

    controller.stop_recording().await.unwrap();
    assert_eq!(controller.state().phase(), SessionPhase::Ready);
    assert_eq!(device.routing(), Some(RoutingMode::DEFAULT));

    let opened = device.opened_with.lock().unwrap()[0];
    assert_eq!(opened.sample_rate, 48_000);
    assert_eq!(opened.channels, 2);
    assert_eq!(opened.bit_depth, 32);
    assert_eq!(opened.bit_rate, 128_000);

    controller.play_recording().await.unwrap();
    assert_eq!(controller.state().phase(), SessionPhase::Playing);
    device.drain_last_sound();
    assert_eq!(controller.state().phase(), SessionPhase::Ready);

    controller.share_recording().await.unwrap();
    let shared = share.shared.lock().unwrap();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].1, "audio/flac");
    assert!(shared[0].0.path().to_string_lossy().ends_with(".flac"));

    let state = controller.state();
    assert!(!state.is_playing);
    assert!(state.has_asset);
    assert_eq!(state.last_error, None);
}

#[tokio::test]
async fn watchers_see_natural_completion() {
    let (device, _share, controller) = setup(Container::Wav);
    controller.start_recording().await.unwrap();
    controller.stop_recording().await.unwrap();
    controller.play_recording().await.unwrap();

    let mut updates = controller.subscribe();
    assert!(updates.borrow_and_update().is_playing);

    device.drain_last_sound();

    updates.changed().await.unwrap();
    assert_eq!(updates.borrow().phase(), SessionPhase::Ready);
}

#[tokio::test]
async fn permission_can_be_granted_later() {
    let (device, _share, controller) = setup(Container::Wav);
    device.deny_permission.store(true, Ordering::SeqCst);

    let err = controller.start_recording().await.unwrap_err();
    assert_eq!(err, SessionError::PermissionDenied);
    assert_eq!(controller.state().last_error, Some(ErrorKind::PermissionDenied));

    device.deny_permission.store(false, Ordering::SeqCst);
    controller.start_recording().await.unwrap();
    assert!(controller.state().is_recording);
    assert_eq!(controller.state().last_error, None);
}

#[tokio::test]
async fn start_failure_carries_device_message() {
    let (device, _share, controller) = setup(Container::Wav);
    device.fail_open.store(true, Ordering::SeqCst);

    let err = controller.start_recording().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StartFailed);
    assert!(err.to_string().contains("input device unplugged"));
    assert_eq!(controller.last_error(), Some(err));
    assert_eq!(device.routing(), Some(RoutingMode::DEFAULT));
}

#[tokio::test]
async fn recording_again_supersedes_previous_asset() {
    let (device, _share, controller) = setup(Container::Wav);

    controller.start_recording().await.unwrap();
    controller.stop_recording().await.unwrap();
    let first = controller.asset().unwrap();

    controller.play_recording().await.unwrap();
    controller.start_recording().await.unwrap();
    assert!(!controller.state().is_playing);
    assert_eq!(device.loaded_sounds.load(Ordering::SeqCst), 0);

    controller.stop_recording().await.unwrap();
    assert_ne!(controller.asset().unwrap(), first);
}

#[tokio::test]
async fn concurrent_stop_during_play_is_ignored() {
    let (_device, _share, controller) = setup(Container::Wav);
    controller.start_recording().await.unwrap();
    controller.stop_recording().await.unwrap();

    let (play, stop) = tokio::join!(controller.play_recording(), controller.stop_playback());
    assert!(play.is_ok());
    assert!(stop.is_ok());
    assert!(controller.state().is_playing);
}

#[tokio::test]
async fn shutdown_while_recording_keeps_asset() {
    let (device, _share, controller) = setup(Container::Wav);
    controller.start_recording().await.unwrap();

    controller.shutdown().await;

    assert!(!controller.state().is_recording);
    assert!(controller.asset().is_some());
    assert_eq!(device.open_captures.load(Ordering::SeqCst), 0);
    assert_eq!(device.routing(), Some(RoutingMode::DEFAULT));
}

#[tokio::test]
async fn completion_after_shutdown_is_ignored() {
    let (device, _share, controller) = setup(Container::Wav);
    controller.start_recording().await.unwrap();
    controller.stop_recording().await.unwrap();
    controller.play_recording().await.unwrap();

    controller.shutdown().await;
    assert_eq!(device.loaded_sounds.load(Ordering::SeqCst), 0);

    device.drain_last_sound();
    assert_eq!(controller.state().phase(), SessionPhase::Ready);
}

#[tokio::test]
async fn completion_after_controller_dropped_is_harmless() {
    let (device, _share, controller) = setup(Container::Wav);
    controller.start_recording().await.unwrap();
    controller.stop_recording().await.unwrap();
    controller.play_recording().await.unwrap();

    drop(controller);
    device.drain_last_sound();
}
