//! Catalog commands - service URL, launch info, ids and unacquire.

use anyhow::Result;
use clap::Args;
use serde_json::json;

use super::{build_service, call, require_token};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the launch-info command.
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct LaunchInfoArgs {
    /// Look up by manifest id.
    #[arg(long)]
    pub manifest_id: Option<String>,

    /// Look up by title id.
    #[arg(long)]
    pub title_id: Option<String>,
}

/// Runs the service-url command.
pub async fn run_service_url(cli: &Cli) -> Result<()> {
    let token = require_token(cli)?;
    let service = build_service(cli)?;
    let url = call(&service, cli, || service.title_service_url(token)).await?;

    match cli.format {
        OutputFormat::Text => println!("{url}"),
        OutputFormat::Json => {
            let output = json!({ "titlesServiceUrl": url.as_str() });
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }
    Ok(())
}

/// Runs the launch-info command.
pub async fn run_launch_info(args: &LaunchInfoArgs, cli: &Cli) -> Result<()> {
    let token = require_token(cli)?;
    let service = build_service(cli)?;

    let info = match (&args.manifest_id, &args.title_id) {
        (Some(manifest_id), _) => {
            call(&service, cli, || service.get_launch_info_by_manifest_id(token, manifest_id)).await?
        }
        (None, Some(title_id)) => {
            call(&service, cli, || service.get_launch_info_by_title_id(token, title_id)).await?
        }
        (None, None) => anyhow::bail!("Pass --manifest-id or --title-id"),
    };

    match cli.format {
        OutputFormat::Text => {
            println!("{}", TextFormatter::new(!cli.no_color).format_launch_info(&info)?);
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&info)?);
        }
    }
    Ok(())
}

/// Runs the title-id command.
pub async fn run_title_id(manifest_id: &str, cli: &Cli) -> Result<()> {
    let token = require_token(cli)?;
    let service = build_service(cli)?;
    let title_id = call(&service, cli, || service.retrieve_title_id(token, manifest_id)).await?;
    print_id(cli, "titleId", title_id.as_deref())
}

/// Runs the app-id command.
pub async fn run_app_id(manifest_id: &str, cli: &Cli) -> Result<()> {
    let token = require_token(cli)?;
    let service = build_service(cli)?;
    let app_id = call(&service, cli, || service.retrieve_app_id(token, manifest_id)).await?;
    print_id(cli, "appId", app_id.as_deref())
}

/// Runs the unacquire command.
pub async fn run_unacquire(title_id: &str, cli: &Cli) -> Result<()> {
    let token = require_token(cli)?;
    let service = build_service(cli)?;
    call(&service, cli, || service.unacquire(token, title_id)).await?;

    match cli.format {
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", TextFormatter::new(!cli.no_color).format_unacquired(title_id));
            }
        }
        OutputFormat::Json => {
            let output = json!({ "titleId": title_id, "unacquired": true });
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }
    Ok(())
}

fn print_id(cli: &Cli, label: &str, id: Option<&str>) -> Result<()> {
    match cli.format {
        OutputFormat::Text => println!("{}", TextFormatter::new(!cli.no_color).format_id(label, id)),
        OutputFormat::Json => {
            let output = json!({ label: id });
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }
    Ok(())
}
