//! Share service port interface

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::AudioAsset;

/// Share errors
#[derive(Debug, Clone, Error)]
pub enum ShareError {
    #[error("Sharing is not available")]
    Unavailable,

    #[error("Failed to open file: {0}")]
    LaunchFailed(String),

    #[error("Clipboard unavailable: {0}")]
    ClipboardUnavailable(String),

    #[error("Failed to copy to clipboard: {0}")]
    CopyFailed(String),
}

/// Port for handing a recording off to another application
#[async_trait]
pub trait ShareService: Send + Sync {
    /// Check whether sharing can be attempted at all
    async fn is_available(&self) -> bool;

    /// Share an asset.
    ///
    /// # Arguments
    /// * `asset` - The recording to share
    /// * `mime_hint` - MIME type of the recording
    async fn share(&self, asset: &AudioAsset, mime_hint: &str) -> Result<(), ShareError>;
}

/// Blanket implementation for boxed share services
#[async_trait]
impl ShareService for Box<dyn ShareService> {
    async fn is_available(&self) -> bool {
        self.as_ref().is_available().await
    }

    async fn share(&self, asset: &AudioAsset, mime_hint: &str) -> Result<(), ShareError> {
        self.as_ref().share(asset, mime_hint).await
    }
}

/// Blanket implementation for shared share services
#[async_trait]
impl<T: ShareService + ?Sized> ShareService for Arc<T> {
    async fn is_available(&self) -> bool {
        self.as_ref().is_available().await
    }

    async fn share(&self, asset: &AudioAsset, mime_hint: &str) -> Result<(), ShareError> {
        self.as_ref().share(asset, mime_hint).await
    }
}
