//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod recording;
pub mod session;

// Re-export common types
pub use config::{AppConfig, ShareTarget};
pub use error::*;
pub use recording::{
    AudioAsset, AudioMimeType, Container, Duration, EncodingConfig, PlaybackHandle,
    RecordingHandle,
};
pub use session::{
    ErrorKind, InvalidStateTransition, RecordingSession, SessionError, SessionPhase,
    SessionState,
};
