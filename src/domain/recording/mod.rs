//! Recording domain module

mod asset;
mod duration;
mod encoding;

pub use asset::{AudioAsset, PlaybackHandle, RecordingHandle};
pub use duration::{Duration, DEFAULT_DURATION_SECS};
pub use encoding::{AudioMimeType, Container, EncodingConfig};
