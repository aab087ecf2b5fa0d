use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use feedscout::app::AppContext;
use feedscout::cli::{commands, Cli, Commands};
use feedscout::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if cli.headful {
        config.scraper.headless = false;
    }

    let ctx = AppContext::new(config)?;

    let result = match cli.command {
        Commands::Find { url } => commands::find_feed(&ctx, &url).await,
        Commands::Meta { url, json } => commands::show_metadata(&ctx, &url, json).await,
        Commands::Image { url } => commands::show_image(&ctx, &url).await,
        Commands::Scrape {
            url,
            selector,
            extraction,
        } => commands::scrape(&ctx, &url, &selector, &extraction.to_extraction()).await,
    };

    // Release the browser process whether or not the command succeeded
    ctx.cleanup().await;

    result?;
    Ok(())
}
