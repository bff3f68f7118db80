use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tessera::app::AppContext;
use tessera::cli::{commands, Cli, Commands};
use tessera::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let ctx = AppContext::new(&config)?;

    match cli.command {
        Commands::Fetch => {
            commands::fetch(&ctx).await?;
        }
        Commands::Cached => {
            commands::cached(&ctx).await?;
        }
        Commands::Image { url, output } => {
            commands::image(&ctx, &url, output.as_deref()).await?;
        }
        Commands::ClearCache => {
            commands::clear_cache(&ctx).await?;
        }
    }

    Ok(())
}
