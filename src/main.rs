//! Command-line interface for social-post-stream
//!
//! # Usage Examples
//!
//! ```bash
//! # Bounded run: 25 posts back to back, then flush and exit
//! send-social-media-posts social-posts --count 25
//!
//! # Continuous run with a faster pace and reproducible data
//! send-social-media-posts social-posts --continuous \
//!   --min-delay 200ms --max-delay 2s --seed 42
//!
//! # Verbose delivery logging
//! RUST_LOG=debug send-social-media-posts social-posts
//! ```

use clap::Parser;
use social_post_stream::{shutdown, Cli, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize logging, defaulting to info when RUST_LOG is unset
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::try_from(cli)?;

    tracing::info!(
        "Publishing to '{}' via {}",
        config.topic.name,
        config.producer.brokers
    );

    let cancel = shutdown::install_ctrl_c_handler();
    social_post_stream::run(config, cancel).await?;

    Ok(())
}
