//! Text output formatting with colors.

use std::path::Path;

use anyhow::Result;
use titleport_catalog::CatalogError;
use titleport_core::{ActiveExperienceSet, COPILOT_EXPERIENCE, LaunchInfo, TitleRecord};
use titleport_store::Config;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats an acquired title.
    pub fn format_title(&self, record: &TitleRecord) -> String {
        format!(
            "{}\nTitle ID: {}\nApp ID:   {}",
            self.green("Sideloading done"),
            self.cyan(&record.title_id),
            self.cyan(&record.app_id)
        )
    }

    /// Formats launch info: acquisition ids, then the raw document.
    pub fn format_launch_info(&self, info: &LaunchInfo) -> Result<String> {
        let mut lines = vec![
            format!("Title ID: {}", self.optional(info.title_id())),
            format!("App ID:   {}", self.optional(info.app_id())),
            String::new(),
        ];
        lines.push(serde_json::to_string_pretty(info.document())?);
        Ok(lines.join("\n"))
    }

    /// Formats a single id lookup.
    pub fn format_id(&self, label: &str, id: Option<&str>) -> String {
        format!("{}: {}", self.bold(label), self.optional(id))
    }

    /// Formats the result of an unacquire.
    pub fn format_unacquired(&self, title_id: &str) -> String {
        format!("{} {}", self.green("Unacquired"), self.cyan(title_id))
    }

    /// Formats the active experience set.
    pub fn format_experiences(&self, set: &ActiveExperienceSet) -> String {
        let mut lines = Vec::new();

        match &set.active_experiences {
            Some(experiences) if experiences.is_empty() => {
                lines.push(self.dim("No active experiences"));
            }
            Some(experiences) => {
                lines.push(self.bold("Active experiences"));
                for experience in experiences {
                    let marker = if experience == COPILOT_EXPERIENCE {
                        self.green("•")
                    } else {
                        "•".to_string()
                    };
                    lines.push(format!("  {marker} {experience}"));
                }
            }
            None => lines.push(self.yellow("Active experiences unknown")),
        }

        if let Some(interval) = set.next_interval {
            lines.push(self.dim(&format!("Next refresh in {interval}s")));
        }

        lines.join("\n")
    }

    /// Formats the Copilot status.
    pub fn format_copilot(&self, allowed: Option<bool>) -> String {
        let status = match allowed {
            Some(true) => self.green("enabled"),
            Some(false) => self.red("disabled"),
            None => self.yellow("unknown"),
        };
        format!("Copilot: {status}")
    }

    /// Formats the effective configuration.
    pub fn format_config(&self, config: &Config, path: &Path) -> String {
        [
            self.bold("Titleport Configuration"),
            "─".repeat(40),
            format!("File:          {}", self.dim(&path.display().to_string())),
            format!("Endpoint:      {}", config.service.endpoint),
            format!("Scope:         {}", config.service.scope),
            format!(
                "Polling:       every {}s, at most {} checks",
                config.polling.interval_secs, config.polling.max_polls
            ),
            format!(
                "Retry:         {} attempts, {}ms apart",
                config.retry.max_attempts, config.retry.delay_ms
            ),
            format!("Timeout:       {}s", config.timeout_secs),
        ]
        .join("\n")
    }

    /// Formats an error, with its tracing id when the service sent one.
    pub fn format_error(&self, error: &anyhow::Error) -> String {
        let mut message = format!("{}: {}", self.red("Error"), error);
        if let Some(tracing_id) = error
            .downcast_ref::<CatalogError>()
            .and_then(CatalogError::tracing_id)
        {
            message.push_str(&format!("\n{}", self.dim(&format!("Tracing ID: {tracing_id}"))));
        }
        message
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn optional(&self, value: Option<&str>) -> String {
        match value {
            Some(v) => self.cyan(v),
            None => self.dim("(none)"),
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}
