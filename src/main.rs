use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tube_clipper::cli::Cli;
use tube_clipper::config::Config;
use tube_clipper::pipeline::{DownloadPipeline, MediaJob};
use tube_clipper::utils;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "tube_clipper=debug"
    } else {
        "tube_clipper=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Check for required external dependencies (non-fatal)
    let missing_deps = utils::check_dependencies().await;
    if !missing_deps.is_empty() {
        eprintln!("⚠️  Dependency check warnings:");
        for dep in missing_deps {
            eprintln!("   • {}", dep);
        }
        eprintln!("   (Continuing anyway - tools may be available)");
    }

    let config = Config::load().await?;

    let job = MediaJob {
        urls: cli.urls,
        destination_dir: config.resolve_download_dir(cli.out_path)?,
        audio_only: cli.audio_only,
        start_time: cli.start_time,
        end_time: cli.end_time,
    };

    let pipeline = DownloadPipeline::new(&config, cli.quiet);
    let result = pipeline.run(&job).await?;

    println!("Saved {} to: {}", result.kind, result.path.display());

    Ok(())
}
