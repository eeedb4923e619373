//! mediatree CLI entrypoint

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mediatree::cli::{log_filter, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = log_filter(cli.quiet);

    // Initialize tracing; stdout is reserved for listings
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    cli.execute().await
}
