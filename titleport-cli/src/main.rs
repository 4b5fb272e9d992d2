// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Titleport CLI - sideload packages and query the title catalog.
//!
//! # Examples
//!
//! ```bash
//! # Resolve the title service URL
//! titleport --token "$TOKEN" service-url
//!
//! # Sideload a zip package, retrying transient failures
//! titleport --retry sideload appPackage.zip
//!
//! # Sideload an XML add-in manifest
//! titleport sideload manifest.xml --xml
//!
//! # Look up the title acquired for a manifest
//! titleport title-id 00000000-0000-0000-0000-000000000000
//!
//! # JSON output
//! titleport --format json --pretty copilot-status --ensure-up-to-date
//! ```

mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use titleport_catalog::CatalogError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{catalog, config, experiences, sideload};

// ============================================================================
// CLI Definition
// ============================================================================

/// Titleport CLI - title service client.
#[derive(Parser)]
#[command(name = "titleport")]
#[command(about = "Sideload packages and query the title catalog")]
#[command(long_about = r#"
Titleport talks to the title catalog service.

Every command except `config` needs a bearer token for the service scope,
passed with --token or the TITLEPORT_TOKEN environment variable.

Examples:
  titleport sideload appPackage.zip        # Upload and acquire a zip package
  titleport sideload manifest.xml --xml    # Upload an XML add-in manifest
  titleport launch-info --title-id T       # Launch info for a title
  titleport unacquire T                    # Remove a title
  titleport copilot-status                 # Is Copilot enabled?
"#)]
#[command(version)]
#[command(author = "Titleport Contributors")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Bearer token for the title service.
    #[arg(long, env = "TITLEPORT_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Configuration file (defaults to the user config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Retry failed calls under the configured retry policy.
    #[arg(long, global = true)]
    pub retry: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the title service URL.
    ServiceUrl,

    /// Upload a package and wait until it is acquired.
    #[command(visible_alias = "s")]
    Sideload(sideload::SideloadArgs),

    /// Show launch info for a manifest id or title id.
    LaunchInfo(catalog::LaunchInfoArgs),

    /// Show the title id acquired for a manifest id.
    TitleId {
        /// Manifest id.
        manifest_id: String,
    },

    /// Show the app id acquired for a manifest id.
    AppId {
        /// Manifest id.
        manifest_id: String,
    },

    /// Remove an acquired title.
    Unacquire {
        /// Title id.
        title_id: String,
    },

    /// Show the experiences active for the user.
    Experiences(experiences::ExperienceArgs),

    /// Show whether Copilot is enabled for the user.
    CopilotStatus(experiences::ExperienceArgs),

    /// Show the effective configuration.
    Config,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// The app is not extended to this host.
    NotProvisioned = 2,
}

impl ExitCode {
    fn for_error(error: &anyhow::Error) -> Self {
        match error.downcast_ref::<CatalogError>() {
            Some(e) if e.is_not_provisioned() => ExitCode::NotProvisioned,
            _ => ExitCode::Error,
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("titleport=debug,info")
    } else {
        EnvFilter::new("titleport=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::ServiceUrl => catalog::run_service_url(&cli).await,
        Commands::Sideload(args) => sideload::run(args, &cli).await,
        Commands::LaunchInfo(args) => catalog::run_launch_info(args, &cli).await,
        Commands::TitleId { manifest_id } => catalog::run_title_id(manifest_id, &cli).await,
        Commands::AppId { manifest_id } => catalog::run_app_id(manifest_id, &cli).await,
        Commands::Unacquire { title_id } => catalog::run_unacquire(title_id, &cli).await,
        Commands::Experiences(args) => experiences::run_experiences(args, &cli).await,
        Commands::CopilotStatus(args) => experiences::run_copilot_status(args, &cli).await,
        Commands::Config => config::run(&cli),
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("{}", output::format_error(&e, &cli));
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    Ok(())
}
