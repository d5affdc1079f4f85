use async_trait::async_trait;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use super::{select_progressive, MediaSource, StreamFormat, VideoMetadata};
use crate::config::Config;
use crate::media::LocalMediaFile;
use crate::utils;
use crate::{ClipperError, Result};

/// Fetcher that resolves stream metadata with yt-dlp and downloads over HTTP
pub struct YoutubeFetcher {
    yt_dlp_path: String,
    quiet: bool,
}

impl YoutubeFetcher {
    pub fn new(config: &Config, quiet: bool) -> Self {
        Self {
            yt_dlp_path: config.fetch.yt_dlp_path.clone(),
            quiet,
        }
    }

    /// Check if yt-dlp is available
    pub async fn check_availability(&self) -> Result<bool> {
        let output = Command::new(&self.yt_dlp_path)
            .arg("--version")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        Ok(matches!(output, Ok(out) if out.status.success()))
    }

    /// Resolve video metadata using yt-dlp
    async fn resolve_metadata(&self, url: &str) -> Result<VideoMetadata> {
        tracing::debug!("Resolving stream metadata for: {}", url);

        let output = Command::new(&self.yt_dlp_path)
            .args([
                "--dump-json",
                "--no-playlist",
                url,
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            return Err(ClipperError::Fetch(format!("yt-dlp failed: {}", error)).into());
        }

        let json_str = String::from_utf8(output.stdout)?;
        let metadata: VideoMetadata = serde_json::from_str(&json_str)?;

        Ok(metadata)
    }

    /// Derive the output filename from the title, falling back to the URL path
    fn output_filename(metadata: &VideoMetadata, format: &StreamFormat, url: &str) -> String {
        let base = metadata
            .title
            .as_deref()
            .map(utils::sanitize_filename)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| filename_from_url(url));

        format!("{}.{}", base, format.ext)
    }

    /// Stream the format URL to the destination path with progress reporting
    async fn download_stream(&self, stream_url: &str, output_path: &Path, size_hint: Option<u64>) -> Result<()> {
        let response = reqwest::get(stream_url).await?;

        if !response.status().is_success() {
            return Err(
                ClipperError::Fetch(format!("Download failed: HTTP {}", response.status())).into(),
            );
        }

        let total_size = response.content_length().or(size_hint).unwrap_or(0);
        let progress = if self.quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total_size)
        };
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
                .unwrap(),
        );
        progress.set_message("Downloading video...");

        let mut file = fs_err::File::create(output_path)?;
        let mut downloaded = 0u64;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)?;
            downloaded += chunk.len() as u64;
            progress.set_position(downloaded);
        }

        progress.finish_with_message("Download complete");

        Ok(())
    }
}

#[async_trait]
impl MediaSource for YoutubeFetcher {
    async fn fetch(&self, url: &str, destination_dir: &Path) -> Result<LocalMediaFile> {
        let url = utils::validate_and_normalize_url(url)?;

        if !self.check_availability().await? {
            return Err(ClipperError::Fetch(
                "yt-dlp is not available. Please install it: https://github.com/yt-dlp/yt-dlp"
                    .to_string(),
            )
            .into());
        }

        let metadata = self.resolve_metadata(&url).await?;

        let format = select_progressive(&metadata.formats).ok_or_else(|| {
            ClipperError::Fetch(format!("No progressive (audio+video) stream for: {}", url))
        })?;
        let stream_url = format.url.clone().ok_or_else(|| {
            ClipperError::Fetch(format!("Selected format {} has no URL", format.format_id))
        })?;

        tracing::info!(
            "Selected progressive format {} ({}p, .{})",
            format.format_id,
            format.height.unwrap_or(0),
            format.ext
        );

        fs_err::create_dir_all(destination_dir)?;

        let mut output_path = destination_dir.join(Self::output_filename(&metadata, format, &url));
        if output_path.exists() {
            let stem = output_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("video")
                .to_string();
            output_path =
                destination_dir.join(utils::generate_unique_filename(&stem, &format.ext));
            tracing::debug!("Target exists, writing to {}", output_path.display());
        }

        self.download_stream(&stream_url, &output_path, format.filesize)
            .await?;

        if let Some(duration) = metadata.duration {
            tracing::info!(
                "Fetched {} ({}) from {}",
                output_path.display(),
                utils::format_duration(duration),
                utils::extract_domain(&url).unwrap_or_else(|| "unknown host".to_string())
            );
        }

        Ok(LocalMediaFile::video(output_path))
    }
}

/// Fallback base name from the last URL path segment
fn filename_from_url(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|segments| segments.last().map(|s| s.to_string()))
        })
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let name = match segment.rfind('.') {
                Some(dot) => segment[..dot].to_string(),
                None => segment,
            };
            let decoded = urlencoding::decode(&name)
                .map(|d| d.into_owned())
                .unwrap_or(name);
            utils::sanitize_filename(&decoded)
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "video".to_string())
}
