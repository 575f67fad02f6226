//! UrlSense CLI binary.
//!
//! Serves a trained suspicious-URL classifier over HTTP.
//!
//! # Commands
//!
//! - `serve` - Start the HTTP inference server
//! - `classify` - Classify a single URL without starting the server

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use urlsense::inference::{Classifier, NgramLinearModel};
use urlsense::server::{self, AppState, ServerConfig};

#[derive(Parser)]
#[command(name = "urlsense")]
#[command(version = urlsense::VERSION)]
#[command(about = "UrlSense - suspicious URL classification service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP inference server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 5001)]
        port: u16,

        /// Host to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Model artifact path (default: suspicious_url_model.safetensors
        /// next to the executable)
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Disable permissive CORS
        #[arg(long)]
        no_cors: bool,

        /// Verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Classify a single URL without starting the server
    Classify {
        /// URL to classify
        url: String,

        /// Model artifact path
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            host,
            model,
            no_cors,
            verbose,
        } => cmd_serve(port, &host, model, no_cors, verbose),
        Commands::Classify { url, model, json } => cmd_classify(&url, model, json),
    }
}

fn cmd_serve(
    port: u16,
    host: &str,
    model: Option<PathBuf>,
    no_cors: bool,
    verbose: bool,
) -> anyhow::Result<()> {
    // Initialize logging
    let log_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    // Build config
    let mut config = ServerConfig::default().with_port(port).with_host(host)?;

    if let Some(path) = model {
        config = config.with_model(path);
    }
    if no_cors {
        config = config.without_cors();
    }

    // Load the model before accepting any traffic; a failure here aborts
    // startup with a non-zero exit.
    let state = AppState::new(config.clone()).context("failed to load model artifact")?;

    tracing::info!("Starting UrlSense server on {}", config.addr);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(Arc::new(state)))?;

    Ok(())
}

fn cmd_classify(url: &str, model: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let path = model.unwrap_or_else(ServerConfig::default_model_path);
    let model = NgramLinearModel::load(&path)
        .with_context(|| format!("failed to load model from {}", path.display()))?;

    let url = url.trim();
    anyhow::ensure!(!url.is_empty(), "empty URL");

    let prediction = model
        .predict(&[url])?
        .pop()
        .context("model returned no prediction")?;
    let probs = model
        .predict_proba(&[url])?
        .pop()
        .context("model returned no probabilities")?;

    let confidence = probs.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    if json {
        let probabilities: serde_json::Map<String, serde_json::Value> = model
            .classes()
            .iter()
            .zip(&probs)
            .map(|(label, &p)| (label.clone(), serde_json::json!(round4(p))))
            .collect();
        let out = serde_json::json!({
            "url": url,
            "prediction": prediction,
            "confidence": round4(confidence),
            "probabilities": probabilities,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("URL:        {url}");
        println!(
            "Prediction: {prediction} ({:.1}% confidence)",
            f64::from(confidence) * 100.0
        );
        println!();
        for (label, &p) in model.classes().iter().zip(&probs) {
            println!("  {label:<12} {p:.4}");
        }
    }

    Ok(())
}

fn round4(p: f32) -> f64 {
    (f64::from(p) * 10_000.0).round() / 10_000.0
}
