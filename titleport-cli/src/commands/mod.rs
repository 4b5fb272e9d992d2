//! CLI command implementations.

pub mod catalog;
pub mod config;
pub mod experiences;
pub mod sideload;

use std::future::Future;

use anyhow::{Context, Result};
use titleport_catalog::{CatalogError, PackageService};
use titleport_fetch::FetchContext;
use titleport_store::Config;
use tracing::debug;

use crate::Cli;

/// Loads the configuration named on the command line, or the default one,
/// with environment overrides applied.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load()?,
    };
    config.apply_env_overrides();
    Ok(config)
}

/// Builds the service client from the effective configuration.
pub fn build_service(cli: &Cli) -> Result<PackageService> {
    let settings = load_config(cli)?.to_settings()?;
    debug!(endpoint = %settings.endpoint, retry = cli.retry, "Building service client");
    let ctx = FetchContext::with_settings(settings)?;
    Ok(PackageService::new(ctx))
}

/// Returns the bearer token or fails with a hint.
pub fn require_token(cli: &Cli) -> Result<&str> {
    cli.token
        .as_deref()
        .filter(|t| !t.is_empty())
        .context("No token given; pass --token or set TITLEPORT_TOKEN")
}

/// Runs `operation`, under the retry policy when `--retry` is set.
pub async fn call<T, F, Fut>(service: &PackageService, cli: &Cli, mut operation: F) -> Result<T, CatalogError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CatalogError>>,
{
    if cli.retry {
        service.with_retry(operation).await
    } else {
        operation().await
    }
}
