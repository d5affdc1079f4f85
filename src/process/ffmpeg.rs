use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

use super::MediaProcessor;
use crate::config::Config;
use crate::media::{LocalMediaFile, MediaKind};
use crate::utils;
use crate::{ClipperError, Result};

/// Probed stream information for a local media file
#[derive(Debug, Clone)]
pub struct MediaProbe {
    pub duration: Option<f64>,
    pub has_audio: bool,
}

/// Audio extraction and trimming backed by the ffmpeg/ffprobe executables
pub struct FfmpegProcessor {
    ffmpeg_path: String,
    ffprobe_path: String,
    audio_bitrate: String,
}

impl FfmpegProcessor {
    pub fn new(config: &Config) -> Self {
        Self {
            ffmpeg_path: config.tools.ffmpeg_path.clone(),
            ffprobe_path: config.tools.ffprobe_path.clone(),
            audio_bitrate: config.app.audio_bitrate.clone(),
        }
    }

    /// Probe duration and stream layout using ffprobe
    pub async fn probe(&self, path: &Path) -> Result<MediaProbe> {
        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v", "quiet",
                "-print_format", "json",
                "-show_format",
                "-show_streams",
                &path.to_string_lossy(),
            ])
            .output()
            .await?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            return Err(ClipperError::Decode(format!(
                "Failed to analyze {} with ffprobe: {}",
                path.display(),
                error
            ))
            .into());
        }

        let info: serde_json::Value = serde_json::from_slice(&output.stdout)?;

        let duration = info["format"]["duration"]
            .as_str()
            .and_then(|d| d.parse::<f64>().ok());

        let empty_vec = vec![];
        let streams = info["streams"].as_array().unwrap_or(&empty_vec);
        let has_audio = streams
            .iter()
            .any(|stream| stream["codec_type"].as_str() == Some("audio"));

        Ok(MediaProbe { duration, has_audio })
    }

    /// Run ffmpeg, surfacing stderr on failure
    async fn run_ffmpeg(&self, args: &[&str]) -> Result<()> {
        tracing::debug!("Running {} {}", self.ffmpeg_path, args.join(" "));

        let output = Command::new(&self.ffmpeg_path).args(args).output().await?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            return Err(ClipperError::Decode(format!("ffmpeg failed: {}", error)).into());
        }

        Ok(())
    }
}

#[async_trait]
impl MediaProcessor for FfmpegProcessor {
    async fn extract_audio(&self, file: &LocalMediaFile) -> Result<LocalMediaFile> {
        if file.kind != MediaKind::Video {
            return Err(ClipperError::Decode(format!(
                "Audio extraction needs a video input, got {}: {}",
                file.kind,
                file.path.display()
            ))
            .into());
        }

        utils::check_file_accessible(&file.path)?;

        let probe = self.probe(&file.path).await?;
        if !probe.has_audio {
            return Err(ClipperError::Decode(format!(
                "File does not contain any audio streams: {}",
                file.path.display()
            ))
            .into());
        }

        let output_path = file.sibling_with_extension("mp3");
        tracing::info!(
            "Extracting audio: {} -> {}",
            file.path.display(),
            output_path.display()
        );

        self.run_ffmpeg(&[
            "-i", &file.path.to_string_lossy(),
            "-vn",
            "-acodec", "libmp3lame",
            "-ab", &self.audio_bitrate,
            "-ar", "44100",
            "-y",
            &output_path.to_string_lossy(),
        ])
        .await?;

        Ok(LocalMediaFile::audio(output_path))
    }

    async fn trim(
        &self,
        file: &LocalMediaFile,
        start_time: f64,
        end_time: f64,
    ) -> Result<LocalMediaFile> {
        // Pure contract checks run before any subprocess is spawned.
        if !(start_time >= 0.0 && start_time < end_time) {
            return Err(ClipperError::InvalidRange(format!(
                "Need 0 <= start < end, got start={} end={}",
                start_time, end_time
            ))
            .into());
        }

        let extension = file.extension().unwrap_or_default();
        match (file.kind, extension.as_str()) {
            (MediaKind::Video, "mp4") | (MediaKind::Audio, "mp3") => {}
            _ => {
                return Err(ClipperError::UnsupportedFormat(format!(
                    "Cannot trim {} file with extension .{}",
                    file.kind, extension
                ))
                .into());
            }
        }

        utils::check_file_accessible(&file.path)?;

        let probe = self.probe(&file.path).await?;
        if let Some(duration) = probe.duration {
            if end_time > duration {
                return Err(ClipperError::InvalidRange(format!(
                    "Range {}..{} exceeds media duration {}",
                    start_time,
                    end_time,
                    utils::format_duration(duration)
                ))
                .into());
            }
        }

        let output_path = file.cropped_sibling();
        // Millisecond precision on the cut points
        let start = format!("{:.3}", start_time);
        let end = format!("{:.3}", end_time);

        tracing::info!(
            "Trimming {} ({}s..{}s) -> {}",
            file.path.display(),
            start,
            end,
            output_path.display()
        );

        match file.kind {
            MediaKind::Video => {
                self.run_ffmpeg(&[
                    "-i", &file.path.to_string_lossy(),
                    "-ss", &start,
                    "-to", &end,
                    "-c:v", "libx264",
                    "-c:a", "aac",
                    "-y",
                    &output_path.to_string_lossy(),
                ])
                .await?;
            }
            MediaKind::Audio => {
                self.run_ffmpeg(&[
                    "-i", &file.path.to_string_lossy(),
                    "-ss", &start,
                    "-to", &end,
                    "-acodec", "libmp3lame",
                    "-ab", &self.audio_bitrate,
                    "-y",
                    &output_path.to_string_lossy(),
                ])
                .await?;
            }
        }

        Ok(LocalMediaFile {
            path: output_path,
            kind: file.kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn processor() -> FfmpegProcessor {
        FfmpegProcessor::new(&Config::default())
    }

    fn invalid_range(err: &anyhow::Error) -> bool {
        matches!(
            err.downcast_ref::<ClipperError>(),
            Some(ClipperError::InvalidRange(_))
        )
    }

    fn unsupported(err: &anyhow::Error) -> bool {
        matches!(
            err.downcast_ref::<ClipperError>(),
            Some(ClipperError::UnsupportedFormat(_))
        )
    }

    #[tokio::test]
    async fn test_trim_rejects_negative_start() {
        let file = LocalMediaFile::video("/nonexistent/clip.mp4");
        let err = processor().trim(&file, -1.0, 5.0).await.unwrap_err();
        assert!(invalid_range(&err));
    }

    #[tokio::test]
    async fn test_trim_rejects_inverted_range() {
        let file = LocalMediaFile::video("/nonexistent/clip.mp4");
        let err = processor().trim(&file, 5.0, 5.0).await.unwrap_err();
        assert!(invalid_range(&err));

        let err = processor().trim(&file, 8.0, 2.0).await.unwrap_err();
        assert!(invalid_range(&err));
    }

    #[tokio::test]
    async fn test_trim_rejects_nan_bounds() {
        let file = LocalMediaFile::video("/nonexistent/clip.mp4");
        let err = processor().trim(&file, f64::NAN, 5.0).await.unwrap_err();
        assert!(invalid_range(&err));
    }

    #[tokio::test]
    async fn test_trim_rejects_unknown_extension() {
        let file = LocalMediaFile::video("/nonexistent/clip.mkv");
        let err = processor().trim(&file, 1.0, 2.0).await.unwrap_err();
        assert!(unsupported(&err));
    }

    #[tokio::test]
    async fn test_trim_rejects_kind_extension_mismatch() {
        // An audio handle pointing at an mp4 is outside the allow-list
        let file = LocalMediaFile::audio("/nonexistent/clip.mp4");
        let err = processor().trim(&file, 1.0, 2.0).await.unwrap_err();
        assert!(unsupported(&err));
    }

    #[tokio::test]
    async fn test_trim_requires_existing_file() {
        let file = LocalMediaFile::video("/nonexistent/clip.mp4");
        let err = processor().trim(&file, 1.0, 2.0).await.unwrap_err();
        assert!(!invalid_range(&err) && !unsupported(&err));
    }

    #[tokio::test]
    async fn test_extract_audio_rejects_audio_input() {
        let file = LocalMediaFile::audio("/nonexistent/track.mp3");
        let err = processor().extract_audio(&file).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ClipperError>(),
            Some(ClipperError::Decode(_))
        ));
    }
}
