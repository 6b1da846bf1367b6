use anyhow::{Context, Result};
use clap::Parser;

use anim_cli::{commands, logging, Cli, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli).context("Failed to load configuration")?;

    logging::init(&config).context("Failed to initialize logging")?;
    logging::log_config(&config);

    let output = commands::run(&cli.command, &config)?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
