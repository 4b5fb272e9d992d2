// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Titleport Core
//!
//! Core types, models, and traits for the Titleport title service client.
//!
//! This crate provides the foundational abstractions used across all other
//! Titleport crates:
//!
//! - Domain models (title records, upload responses, launch info)
//! - Error types
//! - The telemetry sink trait
//!
//! ## Key Types
//!
//! ### Upload Types
//! - [`TitleRecord`] - `{titleId, appId}` of an acquired title
//! - [`UploadResponse`] - Immediate, deferred or unexpected upload answer
//! - [`JobToken`] - Status or operation id of an asynchronous job
//!
//! ### Catalog Types
//! - [`LaunchInfo`] - Launch info document with acquisition projections
//! - [`ElementType`] - Supported launch element types
//! - [`ActiveExperienceSet`] - Active experiences and cache staleness hint
//!
//! ### Telemetry
//! - [`TelemetryEvent`] - Event emitted to a [`TelemetrySink`]

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Upload types
    JobToken,
    TitleRecord,
    UploadResponse,
    // Catalog types
    ActiveExperienceSet,
    COPILOT_EXPERIENCE,
    ElementType,
    LaunchInfo,
    MANIFEST_LOOKUP_ELEMENT_TYPES,
    TITLE_LOOKUP_ELEMENT_TYPES,
    // Telemetry
    TelemetryEvent,
    events,
    properties,
};

// Re-export traits
pub use traits::{NullTelemetry, TelemetrySink};
