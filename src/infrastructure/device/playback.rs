//! Sound playback using rodio
//!
//! Each `play` runs on its own output thread holding the `OutputStream`,
//! which must stay on the thread that created it.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink};
use tracing::{debug, warn};

use crate::application::ports::{DeviceError, PlaybackCallback};
use crate::domain::recording::AudioAsset;

/// How often the output thread checks whether the sink has drained
const DRAIN_POLL: Duration = Duration::from_millis(20);

/// Validate a volume level
pub fn check_volume(level: f32) -> Result<f32, DeviceError> {
    if level.is_finite() && (0.0..=1.0).contains(&level) {
        Ok(level)
    } else {
        Err(DeviceError::InvalidVolume(level))
    }
}

struct ActivePlayback {
    sink: Arc<Sink>,
    stopped: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

/// A decoded-on-demand sound ready to play
pub struct LoadedSound {
    path: PathBuf,
    on_complete: PlaybackCallback,
    volume: f32,
    active: Option<ActivePlayback>,
}

impl LoadedSound {
    /// Check the asset decodes and keep it for playback
    pub fn load(asset: &AudioAsset, on_complete: PlaybackCallback) -> Result<Self, DeviceError> {
        open_decoder(asset.path())?;
        Ok(Self {
            path: asset.path().to_path_buf(),
            on_complete,
            volume: 1.0,
            active: None,
        })
    }

    pub fn set_volume(&mut self, level: f32) -> Result<(), DeviceError> {
        self.volume = check_volume(level)?;
        if let Some(active) = &self.active {
            active.sink.set_volume(self.volume);
        }
        Ok(())
    }

    pub fn is_playing(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| !a.thread.is_finished())
    }

    /// Play from the start, halting any earlier run of this sound.
    /// Blocks until the output stream is running or has failed.
    pub fn play(&mut self) -> Result<(), DeviceError> {
        self.halt();

        let (ready_tx, ready_rx) = mpsc::channel();
        let stopped = Arc::new(AtomicBool::new(false));
        let path = self.path.clone();
        let volume = self.volume;
        let on_complete = Arc::clone(&self.on_complete);
        let thread_stopped = Arc::clone(&stopped);

        let thread = std::thread::Builder::new()
            .name("audio-playback".into())
            .spawn(move || {
                let (_stream, sink) = match start_output(&path, volume) {
                    Ok(output) => output,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let sink = Arc::new(sink);
                let _ = ready_tx.send(Ok(Arc::clone(&sink)));

                while !thread_stopped.load(Ordering::SeqCst) && !sink.empty() {
                    std::thread::sleep(DRAIN_POLL);
                }

                if !thread_stopped.load(Ordering::SeqCst) {
                    debug!(path = %path.display(), "sound drained");
                    on_complete();
                }
            })
            .map_err(|e| DeviceError::PlaybackFailed(format!("Failed to spawn playback thread: {}", e)))?;

        let sink = ready_rx
            .recv()
            .map_err(|_| DeviceError::PlaybackFailed("Playback thread exited".into()))??;

        self.active = Some(ActivePlayback {
            sink,
            stopped,
            thread,
        });
        Ok(())
    }

    /// Stop without firing the completion callback
    pub fn halt(&mut self) {
        if let Some(active) = self.active.take() {
            active.stopped.store(true, Ordering::SeqCst);
            active.sink.stop();
            if active.thread.join().is_err() {
                warn!(path = %self.path.display(), "playback thread panicked");
            }
        }
    }
}

impl Drop for LoadedSound {
    fn drop(&mut self) {
        self.halt();
    }
}

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, DeviceError> {
    let file = File::open(path)
        .map_err(|e| DeviceError::LoadFailed(format!("{}: {}", path.display(), e)))?;
    Decoder::new(BufReader::new(file))
        .map_err(|e| DeviceError::LoadFailed(format!("{}: {}", path.display(), e)))
}

fn start_output(path: &Path, volume: f32) -> Result<(OutputStream, Sink), DeviceError> {
    let source = open_decoder(path)?;

    let (stream, stream_handle) = OutputStream::try_default()
        .map_err(|e| DeviceError::PlaybackFailed(e.to_string()))?;
    let sink =
        Sink::try_new(&stream_handle).map_err(|e| DeviceError::PlaybackFailed(e.to_string()))?;

    sink.set_volume(volume);
    sink.append(source);
    Ok((stream, sink))
}
