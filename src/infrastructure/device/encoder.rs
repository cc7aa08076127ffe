//! Container encoders for finished recordings
//!
//! - WAV: 32-bit IEEE float via hound
//! - FLAC: lossless 16-bit integer via flacenc

use std::io::Cursor;

use flacenc::bitsink::ByteSink;
use flacenc::component::BitRepr;
use flacenc::config;
use flacenc::error::Verify;
use flacenc::source::MemSource;

use crate::domain::recording::{Container, EncodingConfig};

/// Encode interleaved f32 samples into the configured container
pub fn encode(samples: &[f32], config: &EncodingConfig) -> Result<Vec<u8>, EncodingError> {
    match config.container {
        Container::Wav => encode_wav(samples, config.channels, config.sample_rate),
        Container::Flac => encode_flac(samples, config.channels, config.sample_rate),
    }
}

fn encode_wav(samples: &[f32], channels: u16, sample_rate: u32) -> Result<Vec<u8>, EncodingError> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: Container::Wav.stored_bits(),
        sample_format: hound::SampleFormat::Float,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec)
        .map_err(|e| EncodingError::Wav(e.to_string()))?;
    for &sample in samples {
        writer
            .write_sample(sample)
            .map_err(|e| EncodingError::Wav(e.to_string()))?;
    }
    writer
        .finalize()
        .map_err(|e| EncodingError::Wav(e.to_string()))?;

    Ok(cursor.into_inner())
}

fn encode_flac(samples: &[f32], channels: u16, sample_rate: u32) -> Result<Vec<u8>, EncodingError> {
    // flacenc takes integer samples in an i32 carrier
    let samples_i32: Vec<i32> = samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i32)
        .collect();

    let config = config::Encoder::default()
        .into_verified()
        .map_err(|(_, e)| EncodingError::FlacConfig(format!("{:?}", e)))?;

    let source = MemSource::from_samples(
        &samples_i32,
        channels as usize,
        Container::Flac.stored_bits() as usize,
        sample_rate as usize,
    );

    let flac_stream = flacenc::encode_with_fixed_block_size(&config, source, config.block_size)
        .map_err(|e| EncodingError::Flac(format!("{:?}", e)))?;

    let mut sink = ByteSink::new();
    flac_stream
        .write(&mut sink)
        .map_err(|e| EncodingError::Flac(e.to_string()))?;

    Ok(sink.into_inner())
}

/// Encoding errors
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("WAV encoding failed: {0}")]
    Wav(String),

    #[error("FLAC config error: {0}")]
    FlacConfig(String),

    #[error("FLAC encoding failed: {0}")]
    Flac(String),
}
