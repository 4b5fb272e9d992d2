//! Config command - show the effective configuration.

use anyhow::Result;
use titleport_store::Config;

use super::load_config;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the config command.
pub fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let path = cli.config.clone().unwrap_or_else(Config::default_path);

    // Fails on zero budgets.
    config.to_settings()?;

    match cli.format {
        OutputFormat::Text => {
            println!("{}", TextFormatter::new(!cli.no_color).format_config(&config, &path));
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&config)?);
        }
    }
    Ok(())
}
