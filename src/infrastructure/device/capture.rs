//! Microphone capture using cpal
//!
//! The cpal stream is not `Send`, so it lives on a dedicated thread for the
//! whole capture. Samples are buffered as interleaved f32 at the device's
//! native rate and converted once the capture is finished.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SampleRate, SizedSample, StreamConfig};
use rubato::{FftFixedIn, Resampler};
use tracing::{debug, error, warn};

use crate::application::ports::DeviceError;
use crate::domain::recording::EncodingConfig;

/// Frames fed to the resampler per chunk
const RESAMPLE_CHUNK: usize = 1024;

/// Native format the device is actually delivering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

/// Interleaved samples of a finished capture
#[derive(Debug)]
pub struct CapturedAudio {
    pub samples: Vec<f32>,
    pub format: CaptureFormat,
}

impl CapturedAudio {
    /// Convert to the requested channel count and sample rate
    pub fn conform(self, config: &EncodingConfig) -> Result<Vec<f32>, DeviceError> {
        let remixed = remix(&self.samples, self.format.channels, config.channels);
        resample(
            &remixed,
            config.channels,
            self.format.sample_rate,
            config.sample_rate,
        )
    }
}

/// A running input stream on its own thread
pub struct ActiveCapture {
    stop_tx: mpsc::Sender<()>,
    thread: JoinHandle<()>,
    buffer: Arc<Mutex<Vec<f32>>>,
    format: CaptureFormat,
}

impl ActiveCapture {
    /// Open the default input device and start streaming.
    /// Blocks until the stream is running or has failed to start.
    pub fn start(requested: &EncodingConfig) -> Result<Self, DeviceError> {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let (ready_tx, ready_rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let requested = *requested;
        let stream_buffer = Arc::clone(&buffer);
        let thread = std::thread::Builder::new()
            .name("audio-capture".into())
            .spawn(move || {
                let stream = match open_stream(&requested, stream_buffer) {
                    Ok((stream, format)) => {
                        let _ = ready_tx.send(Ok(format));
                        stream
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                // Runs until stop is requested or the owner goes away
                let _ = stop_rx.recv();
                drop(stream);
            })
            .map_err(|e| DeviceError::CaptureFailed(format!("Failed to spawn capture thread: {}", e)))?;

        let format = ready_rx
            .recv()
            .map_err(|_| DeviceError::CaptureFailed("Capture thread exited".into()))??;

        debug!(
            sample_rate = format.sample_rate,
            channels = format.channels,
            "input stream running"
        );

        Ok(Self {
            stop_tx,
            thread,
            buffer,
            format,
        })
    }

    /// Stop the stream and collect everything captured
    pub fn finish(self) -> CapturedAudio {
        let _ = self.stop_tx.send(());
        if self.thread.join().is_err() {
            warn!("capture thread panicked");
        }

        let samples = std::mem::take(&mut *self.buffer.lock().unwrap_or_else(|e| e.into_inner()));
        CapturedAudio {
            samples,
            format: self.format,
        }
    }
}

/// Whether the host has a default input device
pub fn has_input_device() -> bool {
    cpal::default_host().default_input_device().is_some()
}

fn open_stream(
    requested: &EncodingConfig,
    buffer: Arc<Mutex<Vec<f32>>>,
) -> Result<(cpal::Stream, CaptureFormat), DeviceError> {
    let device = cpal::default_host()
        .default_input_device()
        .ok_or(DeviceError::NoInputDevice)?;
    let (config, sample_format) = input_config(&device, requested)?;

    let stream = match sample_format {
        SampleFormat::F32 => build_stream::<f32>(&device, &config, buffer),
        SampleFormat::I16 => build_stream::<i16>(&device, &config, buffer),
        SampleFormat::U16 => build_stream::<u16>(&device, &config, buffer),
        other => {
            return Err(DeviceError::OpenFailed(format!(
                "Unsupported sample format: {:?}",
                other
            )))
        }
    }
    .map_err(|e| DeviceError::OpenFailed(e.to_string()))?;

    stream
        .play()
        .map_err(|e| DeviceError::CaptureFailed(e.to_string()))?;

    let format = CaptureFormat {
        sample_rate: config.sample_rate.0,
        channels: config.channels,
    };
    Ok((stream, format))
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    buffer: Arc<Mutex<Vec<f32>>>,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            let mut buffer = buffer.lock().unwrap_or_else(|e| e.into_inner());
            buffer.extend(data.iter().map(|&s| f32::from_sample(s)));
        },
        |err| error!(error = %err, "audio input stream error"),
        None,
    )
}

/// Pick the supported input configuration closest to the requested one.
/// Ranges containing the requested rate win, then the closest channel count.
fn input_config(
    device: &cpal::Device,
    requested: &EncodingConfig,
) -> Result<(StreamConfig, SampleFormat), DeviceError> {
    let target_rate = requested.sample_rate;
    let supported = device
        .supported_input_configs()
        .map_err(|e| DeviceError::OpenFailed(format!("Failed to get configs: {}", e)))?;

    let best = supported
        .filter(|c| {
            matches!(
                c.sample_format(),
                SampleFormat::F32 | SampleFormat::I16 | SampleFormat::U16
            )
        })
        .min_by_key(|c| {
            let includes_rate =
                c.min_sample_rate().0 <= target_rate && c.max_sample_rate().0 >= target_rate;
            let channel_distance = c.channels().abs_diff(requested.channels);
            // F32 first, it needs no conversion
            let format_rank = match c.sample_format() {
                SampleFormat::F32 => 0,
                SampleFormat::I16 => 1,
                _ => 2,
            };
            (!includes_rate, channel_distance, format_rank)
        })
        .ok_or_else(|| DeviceError::OpenFailed("No suitable input config found".into()))?;

    let rate = target_rate.clamp(best.min_sample_rate().0, best.max_sample_rate().0);
    let sample_format = best.sample_format();
    let config = best.with_sample_rate(SampleRate(rate)).config();

    Ok((config, sample_format))
}

/// Convert interleaved frames between channel counts.
/// Missing channels repeat the last source channel; extra channels are dropped.
pub fn remix(samples: &[f32], from: u16, to: u16) -> Vec<f32> {
    if from == to || from == 0 {
        return samples.to_vec();
    }

    let (from, to) = (from as usize, to as usize);
    let mut out = Vec::with_capacity(samples.len() / from * to);
    for frame in samples.chunks_exact(from) {
        out.extend((0..to).map(|c| frame[c.min(from - 1)]));
    }
    out
}

/// Resample interleaved audio with rubato, compensating for the filter delay
pub fn resample(
    samples: &[f32],
    channels: u16,
    from_rate: u32,
    to_rate: u32,
) -> Result<Vec<f32>, DeviceError> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let channels = channels as usize;
    let frames = samples.len() / channels;
    let expected = (frames as f64 * to_rate as f64 / from_rate as f64).ceil() as usize;

    let planar: Vec<Vec<f32>> = (0..channels)
        .map(|c| samples.iter().skip(c).step_by(channels).copied().collect())
        .collect();

    let mut resampler = FftFixedIn::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        RESAMPLE_CHUNK,
        2,
        channels,
    )
    .map_err(|e| DeviceError::EncodeFailed(format!("Resampler init failed: {}", e)))?;

    let delay = resampler.output_delay();
    let needed = expected + delay;
    let mut output: Vec<Vec<f32>> = vec![Vec::with_capacity(needed); channels];
    let mut pos = 0;

    // Past the end of the input, zero chunks flush the filter
    while output[0].len() < needed {
        let frames_next = resampler.input_frames_next();
        let chunk: Vec<Vec<f32>> = planar
            .iter()
            .map(|channel| {
                let start = pos.min(frames);
                let end = (pos + frames_next).min(frames);
                let mut part = channel[start..end].to_vec();
                part.resize(frames_next, 0.0);
                part
            })
            .collect();
        pos += frames_next;

        let resampled = resampler
            .process(&chunk, None)
            .map_err(|e| DeviceError::EncodeFailed(format!("Resampling failed: {}", e)))?;
        for (out, part) in output.iter_mut().zip(resampled) {
            out.extend(part);
        }
    }

    let mut interleaved = Vec::with_capacity(expected * channels);
    for i in delay..needed {
        interleaved.extend(output.iter().map(|channel| channel[i]));
    }
    Ok(interleaved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remix_same_channels_is_identity() {
        let samples = vec![0.1, 0.2, 0.3, 0.4];
        assert_eq!(remix(&samples, 2, 2), samples);
    }

    #[test]
    fn remix_mono_to_stereo_duplicates() {
        let mono = vec![0.1, 0.5];
        assert_eq!(remix(&mono, 1, 2), vec![0.1, 0.1, 0.5, 0.5]);
    }

    #[test]
    fn remix_drops_extra_channels() {
        let quad = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        assert_eq!(remix(&quad, 4, 2), vec![1.0, 2.0, 5.0, 6.0]);
    }

    #[test]
    fn remix_ignores_partial_frame() {
        let stereo = vec![1.0, 2.0, 3.0];
        assert_eq!(remix(&stereo, 2, 1), vec![1.0]);
    }

    #[test]
    fn resample_same_rate_is_identity() {
        let samples = vec![0.25; 480];
        assert_eq!(resample(&samples, 2, 48_000, 48_000).unwrap(), samples);
    }

    #[test]
    fn resample_up_produces_expected_length() {
        // 100ms of stereo at 44.1kHz
        let samples = vec![0.0; 4410 * 2];
        let out = resample(&samples, 2, 44_100, 48_000).unwrap();
        assert_eq!(out.len(), 4800 * 2);
    }

    #[test]
    fn resample_down_preserves_level() {
        // 1s of constant signal, mono
        let samples = vec![0.5; 16_000];
        let out = resample(&samples, 1, 16_000, 8_000).unwrap();
        assert_eq!(out.len(), 8_000);

        let middle = out[4_000];
        assert!((middle - 0.5).abs() < 0.05, "got {}", middle);
    }

    #[test]
    fn conform_remixes_then_resamples() {
        let captured = CapturedAudio {
            samples: vec![0.0; 4410],
            format: CaptureFormat {
                sample_rate: 44_100,
                channels: 1,
            },
        };
        let out = captured.conform(&EncodingConfig::high_quality()).unwrap();
        assert_eq!(out.len(), 4800 * 2);
    }

    #[test]
    #[ignore = "Requires audio hardware"]
    fn captures_from_default_device() {
        let capture = ActiveCapture::start(&EncodingConfig::high_quality()).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(300));
        let audio = capture.finish();
        assert!(!audio.samples.is_empty());
    }
}
