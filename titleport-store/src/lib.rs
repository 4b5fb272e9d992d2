// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Titleport Store
//!
//! Configuration for the Titleport title service client.
//!
//! ## Usage
//!
//! ```ignore
//! use titleport_store::Config;
//!
//! let mut config = Config::load()?;
//! config.apply_env_overrides();
//! let ctx = titleport_fetch::FetchContext::with_settings(config.to_settings()?)?;
//! ```

pub mod config;
pub mod error;

pub use config::{Config, PollingConfig, RetryConfig, ServiceConfig};
pub use error::StoreError;
