//! Command execution context
//!
//! Loads configuration once and wires the API client into a single query
//! cache shared by every portal bundle used during the command.

use std::sync::Arc;

use log::debug;

use crate::cli::GlobalOptions;
use crate::client::PropTalkClient;
use crate::config::Config;
use crate::error::Result;
use crate::hooks::{
    AdminMutations, AdminQueries, AgentMutations, AgentQueries, Api, UserQueries,
};
use crate::output::OutputFormat;
use crate::query::QueryClient;

/// Context for command execution containing the cache and API handle.
pub struct CommandContext {
    /// Query cache for this process
    pub client: QueryClient,
    /// Authenticated API client
    pub api: Api,
    /// Resolved output format
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a context from global options.
    ///
    /// A missing config file is not an error here: requests that need a
    /// token fail with a message pointing at `proptalk init`.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Config::load_or_default(opts.config_ref())?;
        let api_url = config.api_url(opts.api_url_ref());
        debug!("Using API at {}", api_url);

        let api: Api = Arc::new(PropTalkClient::new(
            api_url,
            Arc::new(config.tokens.clone()),
        )?);

        Ok(Self::with_api(opts, &config, api))
    }

    /// Build a context around an existing API handle.
    pub fn with_api(opts: &GlobalOptions, config: &Config, api: Api) -> Self {
        let format = opts
            .format
            .or_else(|| {
                config
                    .preferences
                    .format
                    .as_deref()
                    .and_then(|f| f.parse().ok())
            })
            .unwrap_or_default();

        Self {
            client: QueryClient::new(),
            api,
            format,
        }
    }

    pub fn admin(&self) -> AdminQueries {
        AdminQueries::new(&self.client, self.api.clone())
    }

    pub fn admin_mutations(&self) -> AdminMutations {
        AdminMutations::new(&self.client, self.api.clone())
    }

    pub fn agent(&self) -> AgentQueries {
        AgentQueries::new(&self.client, self.api.clone())
    }

    pub fn agent_mutations(&self) -> AgentMutations {
        AgentMutations::new(&self.client, self.api.clone())
    }

    pub fn user(&self) -> UserQueries {
        UserQueries::new(&self.client, self.api.clone())
    }
}
