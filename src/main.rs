//! Command-line entry point for the gas-meter reader.
//!
//! ```text
//! gas-meter-reader [--last <reading>] <image.jpg> [<image.jpg> ...]
//! ```
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Build the [`GeminiClient`] and the [`ReadingExtractor`].
//! 4. Install a Ctrl-C handler that cancels the in-flight run.
//! 5. Read each image in order with one shared [`Session`], printing every
//!    result as a JSON line on stdout.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

use gas_meter_reader::{
    config::{AppConfig, API_KEY_ENV},
    gateway::GeminiClient,
    pipeline::{ReadingExtractor, Session},
};

#[derive(Parser, Debug)]
#[command(name = "gas-meter-reader")]
#[command(about = "Read analog gas-meter photographs with a multimodal model")]
#[command(version)]
struct Args {
    /// Previous confirmed reading, used as the hint for unreadable digits
    #[arg(long, value_name = "READING")]
    last: Option<String>,

    /// JPEG photographs of the meter, read in order
    #[arg(required = true, value_name = "IMAGE")]
    images: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    if config.gateway.resolved_api_key().is_none() {
        log::warn!("No API key configured; set {API_KEY_ENV} or gateway.api_key");
    }

    // 3. Gateway + extractor
    let client = Arc::new(GeminiClient::from_config(&config.gateway));
    let extractor = ReadingExtractor::new(client.clone(), client, &config);
    log::info!("Reading {} image(s) with {}", args.images.len(), config.gateway.model);

    // 4. Ctrl-C cancels the current run
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::info!("Interrupt received; cancelling");
                cancel.cancel();
            }
        });
    }

    // 5. Sequential runs sharing one session
    let mut session = match args.last {
        Some(reading) => Session::with_last_reading(reading),
        None => Session::new(),
    };
    let mut failures = 0usize;

    for path in &args.images {
        if cancel.is_cancelled() {
            break;
        }

        let image = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;

        match extractor.extract(image, &mut session, &cancel).await {
            Ok(result) => println!("{}", serde_json::to_string(&result)?),
            Err(e) => {
                log::error!("{}: {e}", path.display());
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} image(s) failed", args.images.len());
    }
    Ok(())
}
