use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

pub mod ffmpeg;

use crate::media::LocalMediaFile;
use crate::Result;

/// Trait for post-processing a downloaded media file
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MediaProcessor: Send + Sync {
    /// Demux the audio track into a sibling MP3 file
    async fn extract_audio(&self, file: &LocalMediaFile) -> Result<LocalMediaFile>;

    /// Crop the file to the given time range, writing a `_cropped` sibling
    async fn trim(
        &self,
        file: &LocalMediaFile,
        start_time: f64,
        end_time: f64,
    ) -> Result<LocalMediaFile>;
}
