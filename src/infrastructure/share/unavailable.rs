//! Share adapter for when sharing is switched off

use async_trait::async_trait;

use crate::application::ports::{ShareError, ShareService};
use crate::domain::recording::AudioAsset;

/// Never available; every share attempt is refused
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableShare;

#[async_trait]
impl ShareService for UnavailableShare {
    async fn is_available(&self) -> bool {
        false
    }

    async fn share(&self, _asset: &AudioAsset, _mime_hint: &str) -> Result<(), ShareError> {
        Err(ShareError::Unavailable)
    }
}
