//! Init command - first-run setup.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::path::Path;

/// Run the init command. `config_path` overrides the default config location.
pub fn run_init(settings: &Settings, config_path: Option<&Path>) -> anyhow::Result<()> {
    Output::header("Appster Setup");
    println!();

    println!("{}", style("Step 1: Data directory").bold().cyan());
    let data_dir = settings.data_dir();
    if data_dir.exists() {
        Output::info(&format!("Data directory exists: {}", data_dir.display()));
    } else {
        std::fs::create_dir_all(&data_dir)?;
        Output::success(&format!("Created data directory: {}", data_dir.display()));
    }
    println!();

    println!("{}", style("Step 2: Configuration file").bold().cyan());
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(Settings::default_config_path);
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else {
        settings.save_to(&config_path)?;
        Output::success(&format!("Created config file: {}", config_path.display()));
    }
    println!();

    println!("{}", style("Setup Complete!").bold().green());
    println!();
    println!("Next steps:");
    println!(
        "  {} Pull the models",
        style(format!(
            "ollama pull {} && ollama pull {}",
            settings.embedding.model, settings.generation.model
        ))
        .cyan()
    );
    println!("  {} Build the index", style("appster index --dir <transcripts>").cyan());
    println!("  {} Check everything", style("appster doctor").cyan());
    println!("  {} Start chatting", style("appster chat").cyan());

    Ok(())
}
