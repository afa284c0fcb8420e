//! Appster CLI entry point.

use anyhow::Result;
use appster::cli::{commands, Cli, Commands};
use appster::config::Settings;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load_from(cli.config.as_ref())?;

    // -v flags win over the configured level; RUST_LOG wins over both.
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("appster={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Init => {
            commands::run_init(&settings, cli.config.as_deref())?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, cli.config.as_deref()).await?;
        }

        Commands::Ask { question } => {
            commands::run_ask(&question, settings).await?;
        }

        Commands::Chat => {
            ensure_data_dir(&settings)?;
            commands::run_chat(settings).await?;
        }

        Commands::Search { query, limit } => {
            commands::run_search(&query, limit, settings).await?;
        }

        Commands::History { clear } => {
            ensure_data_dir(&settings)?;
            commands::run_history(clear, &settings)?;
        }

        Commands::Index { dir, output } => {
            commands::run_index(dir, output, settings).await?;
        }

        Commands::Serve { host, port } => {
            ensure_data_dir(&settings)?;
            commands::run_serve(&host, port, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, settings, cli.config)?;
        }
    }

    Ok(())
}

/// The memory file lives in the data directory.
fn ensure_data_dir(settings: &Settings) -> Result<()> {
    if let Some(parent) = settings.memory_path().parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
