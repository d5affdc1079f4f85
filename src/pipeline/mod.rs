use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::{Config, RetryConfig};
use crate::fetch::youtube::YoutubeFetcher;
use crate::fetch::MediaSource;
use crate::media::LocalMediaFile;
use crate::process::ffmpeg::FfmpegProcessor;
use crate::process::MediaProcessor;
use crate::{ClipperError, Result};

/// One CLI invocation's worth of work, immutable after parsing
#[derive(Debug, Clone)]
pub struct MediaJob {
    pub urls: Vec<String>,
    pub destination_dir: PathBuf,
    pub audio_only: bool,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
}

/// Sequences fetch, audio extraction, and trimming for each requested URL
pub struct DownloadPipeline {
    source: Box<dyn MediaSource>,
    processor: Box<dyn MediaProcessor>,
    retry: RetryConfig,
}

impl DownloadPipeline {
    /// Create a pipeline backed by yt-dlp and ffmpeg
    pub fn new(config: &Config, quiet: bool) -> Self {
        Self {
            source: Box::new(YoutubeFetcher::new(config, quiet)),
            processor: Box::new(FfmpegProcessor::new(config)),
            retry: config.fetch.retry.clone(),
        }
    }

    /// Create a pipeline from explicit stage implementations
    pub fn with_parts(
        source: Box<dyn MediaSource>,
        processor: Box<dyn MediaProcessor>,
        retry: RetryConfig,
    ) -> Self {
        Self {
            source,
            processor,
            retry,
        }
    }

    /// Process every URL in the job, returning the last produced file
    ///
    /// Stages run strictly in sequence per URL: fetch, then audio extraction
    /// when `audio_only` is set, then trimming when `start_time` is set. When
    /// a URL reaches the trim step the batch stops there and the cropped file
    /// is returned; remaining URLs are never fetched.
    pub async fn run(&self, job: &MediaJob) -> Result<LocalMediaFile> {
        let mut last: Option<LocalMediaFile> = None;

        for url in &job.urls {
            tracing::info!("Downloading: {}", url);
            let mut current = self
                .fetch_with_retry(url, &job.destination_dir)
                .await?;

            if job.audio_only {
                current = self.processor.extract_audio(&current).await?;
            }

            if let Some(start_time) = job.start_time {
                let end_time = job.end_time.ok_or_else(|| {
                    ClipperError::InvalidRange(
                        "end_time is required when start_time is set".to_string(),
                    )
                })?;
                return self.processor.trim(&current, start_time, end_time).await;
            }

            last = Some(current);
        }

        last.ok_or_else(|| anyhow::anyhow!("No URLs to process"))
    }

    /// Retry the fetch stage per the configured policy (unbounded by default)
    async fn fetch_with_retry(&self, url: &str, destination_dir: &Path) -> Result<LocalMediaFile> {
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            match self.source.fetch(url, destination_dir).await {
                Ok(file) => return Ok(file),
                Err(e) => {
                    tracing::warn!("Fetch attempt {} failed for {}: {:#}", attempts, url, e);

                    if let Some(max) = self.retry.max_attempts {
                        if attempts >= max {
                            return Err(ClipperError::Fetch(format!(
                                "Giving up on {} after {} attempts",
                                url, attempts
                            ))
                            .into());
                        }
                    }

                    if self.retry.backoff_secs > 0 {
                        sleep(Duration::from_secs(self.retry.backoff_secs)).await;
                    }
                }
            }
        }
    }
}
