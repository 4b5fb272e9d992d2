//! Domain models for Titleport.
//!
//! This module contains the data structures exchanged with the title
//! catalog service. Everything here is request-scoped: values are built
//! from a single response and never mutated afterwards.
//!
//! ## Submodules
//!
//! - [`title`] - Upload results (TitleRecord, UploadResponse, JobToken)
//! - [`launch`] - Launch info documents and supported element types
//! - [`experience`] - Active experience sets
//! - [`telemetry`] - Telemetry events emitted by the client

mod experience;
mod launch;
mod telemetry;
mod title;

// Re-export everything at the models level
pub use experience::{ActiveExperienceSet, COPILOT_EXPERIENCE};
pub use launch::{
    ElementType, LaunchInfo, MANIFEST_LOOKUP_ELEMENT_TYPES, TITLE_LOOKUP_ELEMENT_TYPES,
};
pub use telemetry::{TelemetryEvent, events, properties};
pub use title::{JobToken, TitleRecord, UploadResponse};
#[cfg(test)]
mod serde_tests;
