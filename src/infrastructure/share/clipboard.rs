//! Share by copying the recording's file URI to the clipboard

use async_trait::async_trait;

use crate::application::ports::{ShareError, ShareService};
use crate::domain::recording::AudioAsset;

/// Cross-platform clipboard share using arboard
pub struct ClipboardShare;

impl ClipboardShare {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ClipboardShare {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ShareService for ClipboardShare {
    async fn is_available(&self) -> bool {
        tokio::task::spawn_blocking(|| arboard::Clipboard::new().is_ok())
            .await
            .unwrap_or(false)
    }

    async fn share(&self, asset: &AudioAsset, _mime_hint: &str) -> Result<(), ShareError> {
        let uri = asset.uri();

        // arboard operations are blocking, so run in spawn_blocking
        tokio::task::spawn_blocking(move || {
            let mut clipboard = arboard::Clipboard::new()
                .map_err(|e| ShareError::ClipboardUnavailable(e.to_string()))?;

            clipboard
                .set_text(uri)
                .map_err(|e| ShareError::CopyFailed(e.to_string()))
        })
        .await
        .map_err(|e| ShareError::CopyFailed(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recording::AudioMimeType;

    #[tokio::test]
    #[ignore = "Requires a desktop session"]
    async fn copies_file_uri() {
        let asset = AudioAsset::new("/tmp/memo/recording-1.wav", AudioMimeType::Wav).unwrap();
        ClipboardShare::new().share(&asset, "audio/wav").await.unwrap();

        let text = arboard::Clipboard::new().unwrap().get_text().unwrap();
        assert_eq!(text, "file:///tmp/memo/recording-1.wav");
    }
}
