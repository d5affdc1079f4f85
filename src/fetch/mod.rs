use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod youtube;

use crate::media::LocalMediaFile;
use crate::Result;

/// Video metadata as reported by `yt-dlp --dump-json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub id: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub formats: Vec<StreamFormat>,
}

/// One downloadable format from the yt-dlp format list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamFormat {
    pub format_id: String,
    pub ext: String,
    #[serde(default)]
    pub url: Option<String>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
    pub height: Option<u32>,
    pub tbr: Option<f32>,
    #[serde(default)]
    pub filesize: Option<u64>,
}

impl StreamFormat {
    /// A progressive format carries both a video and an audio track
    pub fn is_progressive(&self) -> bool {
        codec_present(&self.vcodec) && codec_present(&self.acodec)
    }
}

fn codec_present(codec: &Option<String>) -> bool {
    codec.as_deref().map(|c| c != "none").unwrap_or(false)
}

/// Pick the best progressive format: highest resolution, then total bitrate
pub fn select_progressive(formats: &[StreamFormat]) -> Option<&StreamFormat> {
    formats
        .iter()
        .filter(|f| f.is_progressive() && f.url.is_some())
        .max_by(|a, b| {
            let key_a = (a.height.unwrap_or(0), a.tbr.unwrap_or(0.0));
            let key_b = (b.height.unwrap_or(0), b.tbr.unwrap_or(0.0));
            key_a
                .partial_cmp(&key_b)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Trait for fetching remote media into a local directory
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Download the best progressive stream for `url` into `destination_dir`
    async fn fetch(&self, url: &str, destination_dir: &Path) -> Result<LocalMediaFile>;
}
