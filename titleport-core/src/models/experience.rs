//! Active experience sets.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::time::Duration;

/// Experience name that marks Copilot as enabled for the user.
pub const COPILOT_EXPERIENCE: &str = "CopilotTeams";

/// Below this `nextInterval` (seconds) the service cache is still refreshing.
const REFRESHING_INTERVAL_SECS: f64 = 10.0;

/// Experiences currently active for the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveExperienceSet {
    /// Active experience names, absent when the service omitted them.
    #[serde(default)]
    pub active_experiences: Option<BTreeSet<String>>,

    /// Advisory seconds until the service refreshes its cache.
    #[serde(default)]
    pub next_interval: Option<f64>,
}

impl ActiveExperienceSet {
    /// Reads a `uitypes` response body.
    ///
    /// A field of the wrong type reads as absent, as does every field of a
    /// body that is not an object. Non-string list entries are skipped.
    pub fn from_body(body: &Value) -> Self {
        let active_experiences = body
            .get("activeExperiences")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            });
        let next_interval = body.get("nextInterval").and_then(Value::as_f64);

        Self {
            active_experiences,
            next_interval,
        }
    }

    /// Returns whether `experience` is active, or `None` when the set is absent.
    pub fn contains(&self, experience: &str) -> Option<bool> {
        self.active_experiences
            .as_ref()
            .map(|set| set.contains(experience))
    }

    /// Returns whether Copilot is enabled, or `None` when the set is absent.
    pub fn copilot_allowed(&self) -> Option<bool> {
        self.contains(COPILOT_EXPERIENCE)
    }

    /// Returns how long to wait for the cache refresh, if one is in flight.
    ///
    /// A short positive `nextInterval` (under ten seconds) means the service is
    /// refreshing; anything else is treated as up to date.
    pub fn refresh_delay(&self) -> Option<Duration> {
        match self.next_interval {
            Some(secs) if secs > 0.0 && secs < REFRESHING_INTERVAL_SECS => {
                Some(Duration::from_secs_f64(secs))
            }
            _ => None,
        }
    }
}
