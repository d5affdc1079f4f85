use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,

    /// Stream fetching settings
    pub fetch: FetchConfig,

    /// External tool paths
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Download directory (platform downloads folder if unset)
    pub download_dir: Option<PathBuf>,

    /// Bitrate used when extracting audio tracks
    pub audio_bitrate: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Path to the yt-dlp executable
    pub yt_dlp_path: String,

    /// Retry behavior for failed fetches
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum fetch attempts per URL (unlimited if unset)
    pub max_attempts: Option<u32>,

    /// Seconds to wait between attempts
    pub backoff_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Path to the ffmpeg executable
    pub ffmpeg_path: String,

    /// Path to the ffprobe executable
    pub ffprobe_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig {
                download_dir: None,
                audio_bitrate: "192k".to_string(),
            },
            fetch: FetchConfig {
                yt_dlp_path: "yt-dlp".to_string(),
                retry: RetryConfig {
                    max_attempts: None,
                    backoff_secs: 0,
                },
            },
            tools: ToolsConfig {
                ffmpeg_path: "ffmpeg".to_string(),
                ffprobe_path: "ffprobe".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs_err::read_to_string(&config_path)
                .context("Failed to read config file")?;

            let config: Config = serde_yaml::from_str(&content)
                .context("Failed to parse config file")?;

            Ok(config)
        } else {
            let config = Self::default();
            config.save().await?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("tube-clipper").join("config.yaml"))
    }

    /// Resolve the destination directory for a job
    ///
    /// Precedence: CLI override, then config file, then the platform downloads
    /// folder. Resolved once at startup and passed into the job.
    pub fn resolve_download_dir(&self, cli_override: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = cli_override {
            return Ok(dir);
        }

        if let Some(dir) = &self.app.download_dir {
            return Ok(dir.clone());
        }

        dirs::download_dir().context("Could not determine the platform downloads folder")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_retry_is_unbounded() {
        let config = Config::default();
        assert_eq!(config.fetch.retry.max_attempts, None);
        assert_eq!(config.fetch.retry.backoff_secs, 0);
    }

    #[test]
    fn test_resolve_download_dir_prefers_cli() {
        let mut config = Config::default();
        config.app.download_dir = Some(PathBuf::from("/from/config"));

        let resolved = config
            .resolve_download_dir(Some(PathBuf::from("/from/cli")))
            .unwrap();
        assert_eq!(resolved, PathBuf::from("/from/cli"));
    }

    #[test]
    fn test_resolve_download_dir_falls_back_to_config() {
        let mut config = Config::default();
        config.app.download_dir = Some(PathBuf::from("/from/config"));

        let resolved = config.resolve_download_dir(None).unwrap();
        assert_eq!(resolved, PathBuf::from("/from/config"));
    }

    #[test]
    fn test_config_round_trips_through_yaml() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.fetch.yt_dlp_path, "yt-dlp");
        assert_eq!(parsed.app.audio_bitrate, "192k");
    }
}
