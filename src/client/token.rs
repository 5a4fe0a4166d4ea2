//! Role-scoped session tokens
//!
//! Each portal signs requests with its own bearer token. Where the tokens
//! live is up to the caller; the CLI keeps them in the config file.

#[cfg(test)]
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Portal a request is made on behalf of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Agent,
    User,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Agent, Role::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Agent => "agent",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "agent" => Ok(Role::Agent),
            "user" => Ok(Role::User),
            other => Err(format!(
                "unknown role '{other}' (expected admin, agent or user)"
            )),
        }
    }
}

/// Source of bearer tokens for API requests
pub trait TokenStore: Send + Sync {
    /// Token for the given role, if one has been stored.
    fn token(&self, role: Role) -> Option<String>;
}

/// In-memory token store
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct StaticTokens {
    tokens: HashMap<Role, String>,
}

#[cfg(test)]
impl StaticTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, role: Role, token: impl Into<String>) -> Self {
        self.tokens.insert(role, token.into());
        self
    }
}

#[cfg(test)]
impl TokenStore for StaticTokens {
    fn token(&self, role: Role) -> Option<String> {
        self.tokens.get(&role).cloned()
    }
}
