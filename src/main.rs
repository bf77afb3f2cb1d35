use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use talus_core::config::AppConfig;
use talus_lib::app::runtime::{self, RuntimeOptions};
use talus_lib::{App, Prefs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Mine-slope rockfall monitoring runtime", long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Preference store path
    #[arg(short, long, default_value = "prefs.toml")]
    prefs: PathBuf,

    /// Base URL of the sensor ingestion server
    #[arg(long, default_value = "http://127.0.0.1:8091")]
    sensor_url: String,

    /// Site to geocode and score at startup
    #[arg(long)]
    site: Option<String>,

    /// Stop after this many seconds (runs until Ctrl+C when omitted)
    #[arg(long)]
    duration: Option<u64>,

    /// Directory of camera frames for the vision loop
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Detection model identifier for the vision loop
    #[arg(long)]
    model: Option<String>,

    /// API key for the detection endpoint (falls back to TALUS_API_KEY)
    #[arg(long)]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "talus=info,talus_core=info,talus_net=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config(&args.config)?;
    tracing::info!(fingerprint = %config.fingerprint(), "Configuration loaded");
    let prefs = Prefs::load(&args.prefs);
    let app = App::new(config, prefs);

    let api_key = args.api_key.or_else(|| std::env::var("TALUS_API_KEY").ok());
    runtime::run(
        app,
        RuntimeOptions {
            sensor_url: args.sensor_url,
            site_query: args.site,
            duration: args.duration.map(Duration::from_secs),
            prefs_path: args.prefs,
            frames_dir: args.frames,
            model_id: args.model,
            api_key,
        },
    )
    .await
}

/// A missing config file means defaults; a present but invalid one is an
/// error the operator should see.
fn load_config(path: &PathBuf) -> Result<AppConfig> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        AppConfig::from_toml(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    } else {
        tracing::info!("No config file at {}; using defaults", path.display());
        Ok(AppConfig::default())
    }
}
