//! Background Removal CLI Tool
//!
//! Command-line interface that submits images to a remove.bg compatible
//! service and writes the processed payloads back to disk (or stdout).

use super::config::CliConfigBuilder;
use crate::{
    services::ImageIOService,
    session::{RemovalSession, SessionState},
    tracing_config::init_cli_tracing,
};
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Background removal CLI tool
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "cutout")]
pub struct Cli {
    /// Input image files (use "-" for stdin)
    #[arg(value_name = "INPUT", required = true)]
    pub input: Vec<String>,

    /// Output file (single input) or existing directory (multiple inputs).
    /// Use "-" for stdout. [default: <input>_cutout.<ext>, extension taken
    /// from the returned payload's format]
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Service API key [falls back to CUTOUT_API_KEY, then the config file]
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Service endpoint URL [default: https://api.remove.bg/v1.0/removebg]
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds [default: none, requests run to completion]
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Enable verbose logging (-v: INFO, -vv: DEBUG, -vvv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_cli_tracing(cli.verbose).context("Failed to initialize tracing")?;

    CliConfigBuilder::validate_cli(&cli).context("Invalid CLI arguments")?;
    let config = CliConfigBuilder::from_cli(&cli)?;

    info!("Endpoint: {}", config.endpoint);
    info!("Input(s): {}", cli.input.join(", "));

    let mut session =
        RemovalSession::with_client(config).context("Failed to create service client")?;

    let start_time = Instant::now();
    let mut failed = 0usize;

    for input in &cli.input {
        if !process_input(&cli, &mut session, input).await? {
            failed += 1;
        }
        session.reset();
    }

    let total_time = start_time.elapsed();
    let processed = cli.input.len() - failed;
    info!(
        "Processed {} image(s) in {:.2}s ({} failed)",
        processed,
        total_time.as_secs_f64(),
        failed
    );

    if failed > 0 {
        anyhow::bail!("{} of {} image(s) failed", failed, cli.input.len());
    }
    Ok(())
}

/// Run the select → remove → save workflow for one input
///
/// Returns `Ok(true)` when the image was processed and written, `Ok(false)`
/// when the service attempt failed (terminal for this input only), and
/// `Err` for local I/O problems.
async fn process_input(cli: &Cli, session: &mut RemovalSession, input: &str) -> Result<bool> {
    let request_id = Uuid::new_v4();
    info!(request_id = %request_id, input = %input, "Submitting image");

    let image = ImageIOService::read_input(input)
        .await
        .with_context(|| format!("Failed to read input '{}'", input))?;
    session.select_image_loaded(image);

    let spinner = create_spinner(input);
    let state = session.remove_background().await;
    spinner.finish_and_clear();

    match state {
        SessionState::Done => {
            let processed = session
                .processed()
                .context("Session reported success without a processed image")?;

            let output_path = ImageIOService::derive_output_path(
                input,
                cli.output.as_deref(),
                processed.extension(),
            );
            ImageIOService::write_output(&output_path, processed)
                .with_context(|| format!("Failed to write output '{}'", output_path.display()))?;

            let (width, height) = processed.dimensions();
            info!(
                request_id = %request_id,
                "{} -> {} ({}x{}, {} bytes)",
                input,
                output_path.display(),
                width,
                height,
                processed.len()
            );
            println!("{} -> {}", input, output_path.display());
            Ok(true)
        },
        SessionState::Failed => {
            // The structured cause was already logged by the session
            let message = session.error().unwrap_or("Failed to process image.");
            error!(request_id = %request_id, input = %input, "{}", message);
            eprintln!("{}: {}", input, message);
            Ok(false)
        },
        other => {
            warn!(request_id = %request_id, state = ?other, "Unexpected session state");
            Ok(false)
        },
    }
}

/// Spinner shown while a request is in flight (drawn on stderr)
fn create_spinner(input: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Removing background from {}", input));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
