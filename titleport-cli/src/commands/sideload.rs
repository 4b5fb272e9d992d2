//! Sideload command - upload a package and wait for its title.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::{build_service, call, require_token};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the sideload command.
#[derive(Args)]
pub struct SideloadArgs {
    /// Package to upload.
    pub path: PathBuf,

    /// Treat the file as an XML add-in manifest instead of a zip package.
    #[arg(long)]
    pub xml: bool,
}

/// Runs the sideload command.
pub async fn run(args: &SideloadArgs, cli: &Cli) -> Result<()> {
    let token = require_token(cli)?;
    let service = build_service(cli)?;

    let record = if args.xml {
        call(&service, cli, || service.sideload_xml_manifest(token, &args.path)).await?
    } else {
        call(&service, cli, || service.sideload_package(token, &args.path)).await?
    };

    match cli.format {
        OutputFormat::Text => {
            println!("{}", TextFormatter::new(!cli.no_color).format_title(&record));
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&record)?);
        }
    }

    Ok(())
}
