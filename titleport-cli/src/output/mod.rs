//! Output formatting for CLI.

mod json;
mod text;

pub use json::{CopilotOutput, JsonFormatter};
pub use text::TextFormatter;

use crate::{Cli, OutputFormat};

/// Formats a command failure for stderr.
pub fn format_error(error: &anyhow::Error, cli: &Cli) -> String {
    match cli.format {
        OutputFormat::Text => TextFormatter::new(!cli.no_color).format_error(error),
        OutputFormat::Json => JsonFormatter::new(cli.pretty).format_error(error),
    }
}
