//! Configuration management for PropTalk

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::client::{DEFAULT_API_URL, Role, TokenStore};
use crate::error::{ConfigError, Result};

/// Compatibility variable shared with the web front end
pub const LEGACY_API_URL_ENV: &str = "NEXT_PUBLIC_API_URL";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// PropTalk backend base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Role-scoped session tokens
    #[serde(default)]
    pub tokens: Tokens,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,
}

/// Bearer token per portal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl Tokens {
    pub fn get(&self, role: Role) -> Option<&str> {
        match role {
            Role::Admin => self.admin.as_deref(),
            Role::Agent => self.agent.as_deref(),
            Role::User => self.user.as_deref(),
        }
        .filter(|t| !t.is_empty())
    }

    /// Store a token; an empty string clears it.
    pub fn set(&mut self, role: Role, token: impl Into<String>) {
        let token = token.into();
        let token = (!token.trim().is_empty()).then(|| token.trim().to_string());
        match role {
            Role::Admin => self.admin = token,
            Role::Agent => self.agent = token,
            Role::User => self.user = token,
        }
    }
}

impl TokenStore for Tokens {
    fn token(&self, role: Role) -> Option<String> {
        self.get(role).map(str::to_string)
    }
}

/// User preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Default output format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".proptalk").join("config.yaml"))
    }

    fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from `path`, or the default location
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_from(&Self::resolve_path(path)?)
    }

    /// Like [`Config::load_at`], but a missing file yields the defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match Self::load_at(path) {
            Err(crate::error::Error::Config(ConfigError::NotFound)) => Ok(Self::default()),
            other => other,
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Save configuration to `path`, or the default location
    pub fn save_at(&self, path: Option<&str>) -> Result<PathBuf> {
        let path = Self::resolve_path(path)?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        std::fs::write(path, contents)?;

        // Tokens are secrets
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Backend URL: `flag` (`--api-url` / `PROPTALK_API_URL`), then the
    /// config file, then `NEXT_PUBLIC_API_URL`, then the local default.
    pub fn api_url(&self, flag: Option<&str>) -> String {
        let legacy = std::env::var(LEGACY_API_URL_ENV).ok();
        resolve_api_url(flag, self.api_url.as_deref(), legacy.as_deref())
    }
}

fn resolve_api_url(flag: Option<&str>, config: Option<&str>, legacy: Option<&str>) -> String {
    [flag, config, legacy]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .to_string()
}
