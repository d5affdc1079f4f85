use anyhow::{Context, Result};
use std::path::Path;
use tokio::process::Command;
use url::Url;

/// Parse a video URL, rejecting anything that is not http(s)
pub fn validate_and_normalize_url(url: &str) -> Result<String> {
    let parsed: Url = url
        .parse()
        .map_err(|_| anyhow::anyhow!("Not a valid video URL: {}", url))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed.to_string()),
        other => anyhow::bail!("Unsupported URL scheme '{}', only http/https works here", other),
    }
}

/// Render a duration in seconds as a short human-readable string
pub fn format_duration(seconds: f64) -> String {
    let whole = seconds.max(0.0) as u64;
    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;

    match (hours, minutes) {
        (0, 0) => format!("{}s", secs),
        (0, m) => format!("{}m {}s", m, secs),
        (h, m) => format!("{}h {}m {}s", h, m, secs),
    }
}

/// Replace characters that are unsafe in a download filename
///
/// Video titles routinely contain `:`, `/`, `?` and friends; anything outside
/// a conservative set becomes an underscore.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    cleaned.trim().to_string()
}

/// Ensure a media file exists on disk and is a readable regular file
pub fn check_file_accessible(path: &Path) -> Result<()> {
    let metadata = fs_err::metadata(path)
        .with_context(|| format!("Cannot access media file {}", path.display()))?;

    if !metadata.is_file() {
        anyhow::bail!("Not a regular file: {}", path.display());
    }

    Ok(())
}

/// Generate a unique filename with timestamp
pub fn generate_unique_filename(base_name: &str, extension: &str) -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let random_suffix = uuid::Uuid::new_v4().to_string()[..8].to_string();

    format!(
        "{}_{}_{}.{}",
        sanitize_filename(base_name),
        timestamp,
        random_suffix,
        extension
    )
}

/// Host name of a URL, trimmed for log output
pub fn extract_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// Check if the current environment has required tools
pub async fn check_dependencies() -> Vec<String> {
    let mut missing = Vec::new();

    // Check for yt-dlp
    if !check_command_available("yt-dlp").await {
        missing.push("yt-dlp - required for resolving video streams".to_string());
    }

    // Check for ffmpeg
    if !check_command_available("ffmpeg").await {
        missing.push("ffmpeg - required for audio extraction and trimming".to_string());
    }

    // Check for ffprobe
    if !check_command_available("ffprobe").await {
        missing.push("ffprobe - required for media duration probing".to_string());
    }

    missing
}

/// Check if a command is available in PATH
async fn check_command_available(program: &str) -> bool {
    let result = Command::new(program).arg("--version").output().await;
    matches!(result, Ok(output) if output.status.success())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(30.0), "30s");
        assert_eq!(format_duration(90.0), "1m 30s");
        assert_eq!(format_duration(3661.0), "1h 1m 1s");
        assert_eq!(format_duration(-5.0), "0s");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Hello World!"), "Hello World_");
        assert_eq!(sanitize_filename("test/file?name"), "test_file_name");
        assert_eq!(sanitize_filename("  spaced  "), "spaced");
        assert_eq!(sanitize_filename("My Clip: Part 2"), "My Clip_ Part 2");
    }

    #[test]
    fn test_check_file_accessible() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"data").unwrap();

        assert!(check_file_accessible(&path).is_ok());
        assert!(check_file_accessible(&dir.path().join("missing.mp4")).is_err());
        assert!(check_file_accessible(dir.path()).is_err());
    }

    #[test]
    fn test_generate_unique_filename() {
        let name = generate_unique_filename("My Clip", "mp4");
        assert!(name.starts_with("My Clip_"));
        assert!(name.ends_with(".mp4"));
    }

    #[test]
    fn test_extract_domain() {
        assert_eq!(
            extract_domain("https://www.youtube.com/watch?v=123"),
            Some("youtube.com".to_string())
        );
        assert_eq!(
            extract_domain("https://example.com/video1.mp4"),
            Some("example.com".to_string())
        );
        assert_eq!(extract_domain("invalid-url"), None);
    }

    #[test]
    fn test_validate_and_normalize_url() {
        assert!(validate_and_normalize_url("https://example.com").is_ok());
        assert!(validate_and_normalize_url("http://example.com").is_ok());
        assert!(validate_and_normalize_url("ftp://example.com").is_err());
        assert!(validate_and_normalize_url("not-a-url").is_err());
    }
}
