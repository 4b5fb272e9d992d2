// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

//! # Titleport Catalog
//!
//! Client for the title service: sideloading, acquisition polling and
//! catalog queries.
//!
//! ## Components
//!
//! | Component | Responsibility |
//! |-----------|----------------|
//! | [`ServiceEndpointResolver`] | Discovers the service URL from the configured endpoint |
//! | [`PackageUploader`] | Uploads XML manifests and zip packages, starts acquisitions |
//! | [`AcquisitionPoller`] | Polls an acquisition until the title exists |
//! | [`CatalogQueryClient`] | Launch info, unacquire, active experiences |
//! | [`PackageService`] | Facade over all of the above |
//!
//! Every failure is converted by [`trace::normalize`] into a [`CatalogError`]
//! carrying the service tracing id when a response was received.
//!
//! ## Usage
//!
//! ```ignore
//! use titleport_catalog::PackageService;
//! use titleport_fetch::FetchContext;
//!
//! let service = PackageService::new(FetchContext::new()?);
//! let record = service.sideload_package(&token, Path::new("app.zip")).await?;
//! println!("{} / {}", record.title_id, record.app_id);
//! ```

pub mod endpoint;
pub mod error;
pub mod poller;
pub mod query;
pub mod service;
pub mod trace;
pub mod upload;
pub mod validate;

mod request;

pub use endpoint::ServiceEndpointResolver;
pub use error::{CatalogError, ERROR_SOURCE, HttpFault, PackageValidationError};
pub use poller::{AcquisitionPoller, PollStatus};
pub use query::{CatalogQueryClient, TELEMETRY_COMPONENT};
pub use service::PackageService;
pub use trace::{CallSite, normalize};
pub use validate::check_zip_bytes;
