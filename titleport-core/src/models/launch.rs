//! Launch info documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ============================================================================
// Element Types
// ============================================================================

/// Element types a launch info lookup can ask the catalog for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    /// Extensions (need client details, only requested by title id).
    Extensions,
    /// Office add-ins.
    OfficeAddIns,
    /// Exchange add-ins.
    ExchangeAddIns,
    /// First party pages.
    FirstPartyPages,
    /// Dynamics.
    Dynamics,
    /// AAD.
    #[serde(rename = "AAD")]
    Aad,
    /// Line of business apps.
    LineOfBusiness,
    /// Static tabs.
    StaticTabs,
    /// Compose extensions.
    ComposeExtensions,
    /// Bots.
    Bots,
    /// Graph connectors.
    GraphConnector,
    /// Configurable tabs.
    ConfigurableTabs,
    /// Activities.
    Activities,
    /// Meeting extension definitions.
    MeetingExtensionDefinition,
    /// `OpenAI` plugins.
    #[serde(rename = "OpenAIPlugins")]
    OpenAiPlugins,
    /// GPTs.
    Gpts,
    /// Declarative copilots.
    DeclarativeCopilots,
    /// Plugins.
    Plugins,
}

impl ElementType {
    /// Returns the wire name of this element type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extensions => "Extensions",
            Self::OfficeAddIns => "OfficeAddIns",
            Self::ExchangeAddIns => "ExchangeAddIns",
            Self::FirstPartyPages => "FirstPartyPages",
            Self::Dynamics => "Dynamics",
            Self::Aad => "AAD",
            Self::LineOfBusiness => "LineOfBusiness",
            Self::StaticTabs => "StaticTabs",
            Self::ComposeExtensions => "ComposeExtensions",
            Self::Bots => "Bots",
            Self::GraphConnector => "GraphConnector",
            Self::ConfigurableTabs => "ConfigurableTabs",
            Self::Activities => "Activities",
            Self::MeetingExtensionDefinition => "MeetingExtensionDefinition",
            Self::OpenAiPlugins => "OpenAIPlugins",
            Self::Gpts => "Gpts",
            Self::DeclarativeCopilots => "DeclarativeCopilots",
            Self::Plugins => "Plugins",
        }
    }

    /// Joins element types into the comma-separated query form.
    pub fn join(types: &[ElementType]) -> String {
        types
            .iter()
            .map(ElementType::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element types requested by a manifest id lookup.
///
/// `Extensions` is left out: it needs client details the lookup does not send.
pub const MANIFEST_LOOKUP_ELEMENT_TYPES: &[ElementType] = &[
    ElementType::OfficeAddIns,
    ElementType::ExchangeAddIns,
    ElementType::FirstPartyPages,
    ElementType::Dynamics,
    ElementType::Aad,
    ElementType::LineOfBusiness,
    ElementType::StaticTabs,
    ElementType::ComposeExtensions,
    ElementType::Bots,
    ElementType::GraphConnector,
    ElementType::ConfigurableTabs,
    ElementType::Activities,
    ElementType::MeetingExtensionDefinition,
    ElementType::OpenAiPlugins,
    ElementType::Gpts,
    ElementType::DeclarativeCopilots,
    ElementType::Plugins,
];

/// Element types requested by a title id lookup.
pub const TITLE_LOOKUP_ELEMENT_TYPES: &[ElementType] = &[
    ElementType::Extensions,
    ElementType::OfficeAddIns,
    ElementType::ExchangeAddIns,
    ElementType::FirstPartyPages,
    ElementType::Dynamics,
    ElementType::Aad,
    ElementType::LineOfBusiness,
    ElementType::StaticTabs,
    ElementType::ComposeExtensions,
    ElementType::Bots,
    ElementType::GraphConnector,
    ElementType::ConfigurableTabs,
    ElementType::Activities,
    ElementType::MeetingExtensionDefinition,
    ElementType::OpenAiPlugins,
    ElementType::Gpts,
    ElementType::DeclarativeCopilots,
    ElementType::Plugins,
];

// ============================================================================
// Launch Info
// ============================================================================

/// Launch info document returned by the catalog.
///
/// The document is kept as raw JSON; only the acquisition ids are projected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaunchInfo(Value);

impl LaunchInfo {
    /// Wraps a raw launch info document.
    pub fn new(document: Value) -> Self {
        Self(document)
    }

    /// Returns the acquired title id.
    ///
    /// The catalog reports `acquisition.titleId` either as a plain string or
    /// as an object with an `id` field.
    pub fn title_id(&self) -> Option<&str> {
        let title_id = self.0.get("acquisition")?.get("titleId")?;
        title_id
            .get("id")
            .and_then(Value::as_str)
            .or_else(|| title_id.as_str())
    }

    /// Returns the acquired app id.
    pub fn app_id(&self) -> Option<&str> {
        self.0.get("acquisition")?.get("appId")?.as_str()
    }

    /// Returns the raw document.
    pub fn document(&self) -> &Value {
        &self.0
    }
}
