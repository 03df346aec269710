//! Console configuration.
//!
//! Configuration is stored as YAML and includes:
//! - The platform API base URL and credential
//! - Transport timeout
//! - Paging and search-as-you-type tuning

use std::env;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConsoleError, Result};

/// Environment variable consulted before the config file for the API token.
const TOKEN_ENV_VAR: &str = "PITBOSS_API_TOKEN";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Base URL of the platform REST API
    pub base_url: String,

    /// API credential. Prefer the `PITBOSS_API_TOKEN` environment variable;
    /// the file value is a fallback for workstation setups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,

    /// Remote operation timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Rows fetched per page (default: 25)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Search-as-you-type tuning
    #[serde(default, skip_serializing_if = "SearchConfig::is_default")]
    pub search: SearchConfig,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            auth: None,
            request_timeout: default_request_timeout(),
            page_size: default_page_size(),
            search: SearchConfig::default(),
        }
    }
}

/// API credential configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub token: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Search-as-you-type configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet window after the last keystroke before a lookup fires,
    /// in milliseconds (default: 300)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Minimum trimmed query length before a lookup fires (default: 2)
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

fn default_request_timeout() -> u64 {
    30
}

fn default_page_size() -> u32 {
    25
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_query_len() -> usize {
    2
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
        }
    }
}

impl SearchConfig {
    /// Check if this config has default values (for serialization skip)
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl ConsoleConfig {
    /// Load configuration from a YAML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConsoleError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: ConsoleConfig = serde_yaml_ng::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content).map_err(|e| {
            ConsoleError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        // Restrict to owner read/write; the file may hold a credential.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(path, permissions)?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ConsoleError::Config("base_url must be set".to_string()));
        }
        if self.page_size == 0 {
            return Err(ConsoleError::Config(
                "page_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the API token from the environment or the config file.
    pub fn api_token(&self) -> Option<String> {
        if let Ok(token) = env::var(TOKEN_ENV_VAR)
            && !token.is_empty()
        {
            return Some(token);
        }

        self.auth.as_ref().map(|a| a.token.clone())
    }

    /// Set the API token in the config file section.
    pub fn set_api_token(&mut self, token: String) {
        self.auth = Some(AuthConfig { token });
    }

    /// Get the remote operation timeout duration
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout)
    }

    /// Get the debounce window duration
    pub fn debounce_window(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.search.debounce_ms)
    }
}
