//! Storyarc HTTP server binary.

use clap::Parser;
use storyarc::{LoggingConfig, StoryConfig, init_logging, server};
use tracing::info;

/// Serve the four-act story pipeline over HTTP.
#[derive(Debug, Parser)]
#[command(name = "storyarc", version, about)]
struct Cli {
    /// Bind host (overrides configuration)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides configuration)
    #[arg(long)]
    port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::default().with_json_logs(cli.json_logs);
    if cli.verbose {
        logging = logging.with_log_level("debug");
    }
    init_logging(&logging)?;

    let config = StoryConfig::load()?;
    let host = cli.host.unwrap_or_else(|| config.server().host().clone());
    let port = cli.port.unwrap_or(*config.server().port());
    info!(provider = %config.provider(), model = %config.model().model_id(), "Starting storyarc");

    let controller = config.build_controller()?;
    server::serve(controller, &format!("{}:{}", host, port)).await?;
    Ok(())
}
