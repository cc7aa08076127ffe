//! Audio device infrastructure
//!
//! Captures with cpal, resamples with rubato, writes WAV (hound) or
//! FLAC (flacenc), and plays back with rodio.

mod capture;
mod desktop;
mod encoder;
mod playback;

pub use desktop::DesktopAudioDevice;
pub use encoder::{encode, EncodingError};
