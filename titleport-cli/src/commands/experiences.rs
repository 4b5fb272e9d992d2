//! Experience commands - active experiences and Copilot status.

use anyhow::Result;
use clap::Args;

use super::{build_service, call, require_token};
use crate::output::{CopilotOutput, JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the experience commands.
#[derive(Args, Default)]
pub struct ExperienceArgs {
    /// Wait for a refreshing service cache and fetch again.
    #[arg(long)]
    pub ensure_up_to_date: bool,
}

/// Runs the experiences command.
pub async fn run_experiences(args: &ExperienceArgs, cli: &Cli) -> Result<()> {
    let token = require_token(cli)?;
    let service = build_service(cli)?;
    let set = call(&service, cli, || {
        service.get_active_experiences(token, args.ensure_up_to_date)
    })
    .await?;

    match cli.format {
        OutputFormat::Text => {
            println!("{}", TextFormatter::new(!cli.no_color).format_experiences(&set));
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&set)?);
        }
    }
    Ok(())
}

/// Runs the copilot-status command.
///
/// Never fails on service errors: an unknown status is printed as such.
pub async fn run_copilot_status(args: &ExperienceArgs, cli: &Cli) -> Result<()> {
    let token = require_token(cli)?;
    let service = build_service(cli)?;
    let allowed = service
        .get_copilot_status(token, args.ensure_up_to_date)
        .await;

    match cli.format {
        OutputFormat::Text => {
            println!("{}", TextFormatter::new(!cli.no_color).format_copilot(allowed));
        }
        OutputFormat::Json => {
            let output = CopilotOutput {
                copilot_allowed: allowed,
            };
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }
    Ok(())
}
