//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the sound hardware, the desktop and the filesystem.

pub mod config;
pub mod device;
pub mod share;

// Re-export adapters
pub use config::XdgConfigStore;
pub use device::DesktopAudioDevice;
pub use share::{create_share_service, ClipboardShare, OpenShare, UnavailableShare};
