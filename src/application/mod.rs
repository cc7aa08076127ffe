//! Application layer - Use cases and port interfaces
//!
//! Contains the session controller and trait definitions
//! for external system interactions.

pub mod ports;
pub mod session;

pub use session::{RecordingSessionController, MAX_VOLUME};
