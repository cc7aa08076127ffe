//! Share by opening the recording with the desktop's default handler

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::{ShareError, ShareService};
use crate::domain::recording::AudioAsset;

/// Opens recordings with whatever application the desktop associates with them
pub struct OpenShare;

impl OpenShare {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OpenShare {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ShareService for OpenShare {
    async fn is_available(&self) -> bool {
        true
    }

    async fn share(&self, asset: &AudioAsset, mime_hint: &str) -> Result<(), ShareError> {
        let path = asset.path().to_path_buf();
        debug!(path = %path.display(), mime = mime_hint, "opening with default handler");

        // `open` may wait on the launcher process
        tokio::task::spawn_blocking(move || {
            open::that(&path).map_err(|e| ShareError::LaunchFailed(format!("{}: {}", path.display(), e)))
        })
        .await
        .map_err(|e| ShareError::LaunchFailed(format!("Task join error: {}", e)))?
    }
}
