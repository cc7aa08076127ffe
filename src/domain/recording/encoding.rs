//! Encoding configuration for new recordings

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::InvalidContainerError;

/// MIME types of the containers we produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioMimeType {
    Wav,
    Flac,
}

impl AudioMimeType {
    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Flac => "audio/flac",
        }
    }
}

impl fmt::Display for AudioMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// File container a recording is written into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    /// RIFF/WAVE with 32-bit IEEE float samples
    Wav,
    /// Lossless FLAC with 16-bit integer samples
    Flac,
}

impl Container {
    /// All supported containers
    pub const ALL: [Container; 2] = [Container::Wav, Container::Flac];

    /// Container used when configuration does not pick one
    #[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
    pub const fn platform_default() -> Self {
        Self::Wav
    }

    /// Container used when configuration does not pick one
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    pub const fn platform_default() -> Self {
        Self::Flac
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Flac => "flac",
        }
    }

    /// File extension without the leading dot
    pub const fn extension(&self) -> &'static str {
        self.as_str()
    }

    pub const fn mime_type(&self) -> AudioMimeType {
        match self {
            Self::Wav => AudioMimeType::Wav,
            Self::Flac => AudioMimeType::Flac,
        }
    }

    /// Bits per sample actually stored in the file
    pub const fn stored_bits(&self) -> u16 {
        match self {
            Self::Wav => 32,
            Self::Flac => 16,
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::platform_default()
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Container {
    type Err = InvalidContainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wav" | "wave" => Ok(Self::Wav),
            "flac" => Ok(Self::Flac),
            _ => Err(InvalidContainerError {
                input: s.to_string(),
            }),
        }
    }
}

/// Parameters a recording is opened with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingConfig {
    pub sample_rate: u32,
    pub channels: u16,
    pub bit_depth: u16,
    pub bit_rate: u32,
    pub container: Container,
}

impl EncodingConfig {
    pub const HIGH_QUALITY_SAMPLE_RATE: u32 = 48_000;
    pub const HIGH_QUALITY_CHANNELS: u16 = 2;
    pub const HIGH_QUALITY_BIT_DEPTH: u16 = 32;
    pub const HIGH_QUALITY_BIT_RATE: u32 = 128_000;

    /// Stereo 48 kHz, 32-bit, 128 kbps class, platform container
    pub const fn high_quality() -> Self {
        Self {
            sample_rate: Self::HIGH_QUALITY_SAMPLE_RATE,
            channels: Self::HIGH_QUALITY_CHANNELS,
            bit_depth: Self::HIGH_QUALITY_BIT_DEPTH,
            bit_rate: Self::HIGH_QUALITY_BIT_RATE,
            container: Container::platform_default(),
        }
    }

    pub fn with_container(mut self, container: Container) -> Self {
        self.container = container;
        self
    }

    pub const fn extension(&self) -> &'static str {
        self.container.extension()
    }

    pub const fn mime_type(&self) -> AudioMimeType {
        self.container.mime_type()
    }
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self::high_quality()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_quality_settings() {
        let config = EncodingConfig::high_quality();
        assert_eq!(config.sample_rate, 48_000);
        assert_eq!(config.channels, 2);
        assert_eq!(config.bit_depth, 32);
        assert_eq!(config.bit_rate, 128_000);
        assert_eq!(config.container, Container::platform_default());
    }

    #[test]
    fn with_container_overrides_extension_and_mime() {
        let config = EncodingConfig::high_quality().with_container(Container::Flac);
        assert_eq!(config.extension(), "flac");
        assert_eq!(config.mime_type(), AudioMimeType::Flac);
        assert_eq!(config.sample_rate, 48_000);
    }

    #[test]
    fn container_parse() {
        assert_eq!("wav".parse::<Container>().unwrap(), Container::Wav);
        assert_eq!(" FLAC ".parse::<Container>().unwrap(), Container::Flac);
        assert!("mp3".parse::<Container>().is_err());
    }

    #[test]
    fn container_mime_types() {
        assert_eq!(Container::Wav.mime_type().as_str(), "audio/wav");
        assert_eq!(Container::Flac.mime_type().as_str(), "audio/flac");
    }

    #[test]
    fn container_stored_bits() {
        assert_eq!(Container::Wav.stored_bits(), 32);
        assert_eq!(Container::Flac.stored_bits(), 16);
    }
}
