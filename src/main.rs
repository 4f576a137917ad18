use anyhow::Result;
use tracing_subscriber::EnvFilter;

use readme_stats::app;
use readme_stats::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "readme_stats=debug"
    } else {
        "readme_stats=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    let config = cli.into_config()?;
    app::run(&config).await?;
    Ok(())
}
