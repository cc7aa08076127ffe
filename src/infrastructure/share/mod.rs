//! Share infrastructure module
//!
//! Hands finished recordings to the desktop: the default application via
//! the `open` crate, or the clipboard via arboard.

mod clipboard;
mod open;
mod unavailable;

pub use clipboard::ClipboardShare;
pub use open::OpenShare;
pub use unavailable::UnavailableShare;

use crate::application::ports::ShareService;
use crate::domain::config::ShareTarget;

/// Create the share adapter for the configured target
pub fn create_share_service(target: ShareTarget) -> Box<dyn ShareService> {
    match target {
        ShareTarget::Open => Box::new(OpenShare::new()),
        ShareTarget::Clipboard => Box::new(ClipboardShare::new()),
        ShareTarget::None => Box::new(UnavailableShare),
    }
}
