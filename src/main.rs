use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use vibe_navigator::{config::Config, tui, utils};

/// Score a research idea or abstract against current trends
#[derive(Debug, Parser)]
#[command(name = "vibe-navigator", version, about)]
struct Cli {
    /// Gemini model identifier
    #[arg(long)]
    model: Option<String>,

    /// Override the Gemini API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Directory for log files
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_dir = cli.log_dir.clone().unwrap_or_else(utils::default_log_dir);
    let _guard = utils::init_logger(&log_dir)?;

    // Load configuration
    let mut config = Config::from_env()?;
    if let Some(model) = cli.model {
        config = config.with_model(model);
    }
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }
    info!(log_dir = %log_dir.display(), "Configuration loaded: {:?}", config.llm);

    tui::run(config).await
}
