use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "tubeclip",
    about = "Tube Clipper - Download videos, extract audio tracks, and trim clips",
    version,
    long_about = "A CLI tool that downloads progressive video streams by URL, optionally extracts \
their audio track to MP3, and optionally trims the result to a time range using ffmpeg."
)]
pub struct Cli {
    /// List of video URLs to download
    #[arg(short, long = "urls", value_name = "URL", num_args = 1.., required = true)]
    pub urls: Vec<String>,

    /// Output folder (defaults to the configured download directory, else the platform downloads folder)
    #[arg(short, long = "out_path", value_name = "DIR")]
    pub out_path: Option<PathBuf>,

    /// Keep only the audio track, extracted to MP3
    #[arg(short, long = "audio_only")]
    pub audio_only: bool,

    /// Crop start time, in seconds from the beginning
    #[arg(short, long = "start_time", value_name = "SECS")]
    pub start_time: Option<f64>,

    /// Crop end time, in seconds from the beginning
    #[arg(short, long = "end_time", value_name = "SECS")]
    pub end_time: Option<f64>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long)]
    pub quiet: bool,
}
