//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod audio_device;
pub mod config;
pub mod share;

// Re-export common types
pub use audio_device::{AudioDevice, DeviceError, PlaybackCallback, Permission, RoutingMode};
pub use config::ConfigStore;
pub use share::{ShareError, ShareService};
