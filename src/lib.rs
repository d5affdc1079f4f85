//! Tube Clipper - A Rust CLI tool for downloading and post-processing videos
//!
//! This library provides functionality to download progressive video streams by URL,
//! extract their audio tracks, and trim the result to a time range using ffmpeg.

pub mod cli;
pub mod config;
pub mod fetch;
pub mod media;
pub mod pipeline;
pub mod process;
pub mod utils;

pub use cli::Cli;
pub use config::Config;
pub use fetch::{MediaSource, StreamFormat, VideoMetadata};
pub use media::{LocalMediaFile, MediaKind};
pub use pipeline::{DownloadPipeline, MediaJob};
pub use process::MediaProcessor;

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to the clipper
#[derive(thiserror::Error, Debug)]
pub enum ClipperError {
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Audio decode failed: {0}")]
    Decode(String),

    #[error("Unsupported media format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid crop range: {0}")]
    InvalidRange(String),
}
