//! Global CLI options shared across all commands

use crate::cli::Cli;
use crate::output::OutputFormat;

/// Global flags, captured once in `main.rs` after parsing.
///
/// Precedence is CLI flag > environment variable > config file > default.
/// This struct holds the first two layers; `CommandContext` folds in the
/// config file.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Output format, when given on the command line or environment
    pub format: Option<OutputFormat>,

    /// Custom config file path (defaults to ~/.proptalk/config.yaml)
    pub config: Option<String>,

    /// Backend base URL override
    pub api_url: Option<String>,
}

impl GlobalOptions {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            api_url: cli.api_url.clone(),
        }
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    pub fn api_url_ref(&self) -> Option<&str> {
        self.api_url.as_deref()
    }
}
