mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use parlay_builder::config::Config;

use crate::commands::{App, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parlay_builder=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    debug!("Running {:?}", cli.command);

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded (API: {})", config.api_base_url);

    let mut app = App::new(config)?;
    app.run(cli.command).await
}
