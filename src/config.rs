//! Runtime configuration.
//!
//! Two layers feed a provisioning run:
//!
//! - [`Config`]: optional TOML file with API endpoints, operation polling,
//!   agent defaults and the output file location. Every key has a default,
//!   so running without `--config` is the common case.
//! - [`ProvisionSettings`]: the immutable record built once from CLI flags
//!   (plus [`Config`] defaults) and passed by reference into every step.
//!
//! # Example
//!
//! ```toml
//! [api]
//! # Both endpoints are derived from --location unless set here.
//! # discovery_endpoint = "https://eu-discoveryengine.googleapis.com"
//! timeout_secs = 60
//! page_size = 100
//!
//! [operations]
//! poll_interval_secs = 5
//! timeout_secs = 900
//!
//! [agent]
//! default_language_code = "en"
//! time_zone = "America/Los_Angeles"
//!
//! [output]
//! env_file = "marketingEnvValue.json"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub operations: OperationsConfig,
    #[serde(default)]
    pub agent: AgentDefaults,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Overrides the location-derived Discovery Engine endpoint.
    #[serde(default)]
    pub discovery_endpoint: Option<String>,
    /// Overrides the location-derived Dialogflow CX endpoint.
    #[serde(default)]
    pub dialogflow_endpoint: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            discovery_endpoint: None,
            dialogflow_endpoint: None,
            timeout_secs: default_request_timeout(),
            page_size: default_page_size(),
        }
    }
}

impl ApiConfig {
    /// Multi-region datastores are only reachable through their regional host.
    pub fn discovery_endpoint_for(&self, location: &str) -> String {
        match &self.discovery_endpoint {
            Some(endpoint) => endpoint.clone(),
            None if location == "global" => "https://discoveryengine.googleapis.com".to_string(),
            None => format!("https://{}-discoveryengine.googleapis.com", location),
        }
    }

    /// Dialogflow CX is served from a regional host except for `global`.
    pub fn dialogflow_endpoint_for(&self, location: &str) -> String {
        match &self.dialogflow_endpoint {
            Some(endpoint) => endpoint.clone(),
            None if location == "global" => "https://dialogflow.googleapis.com".to_string(),
            None => format!("https://{}-dialogflow.googleapis.com", location),
        }
    }
}

fn default_request_timeout() -> u64 {
    60
}
fn default_page_size() -> u32 {
    100
}

#[derive(Debug, Deserialize, Clone)]
pub struct OperationsConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_operation_timeout")]
    pub timeout_secs: u64,
}

impl Default for OperationsConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            timeout_secs: default_operation_timeout(),
        }
    }
}

fn default_poll_interval() -> u64 {
    5
}
fn default_operation_timeout() -> u64 {
    900
}

#[derive(Debug, Deserialize, Clone)]
pub struct AgentDefaults {
    #[serde(default = "default_language_code")]
    pub default_language_code: String,
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

impl Default for AgentDefaults {
    fn default() -> Self {
        Self {
            default_language_code: default_language_code(),
            time_zone: default_time_zone(),
        }
    }
}

fn default_language_code() -> String {
    "en".to_string()
}
fn default_time_zone() -> String {
    "America/Los_Angeles".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            env_file: default_env_file(),
        }
    }
}

fn default_env_file() -> PathBuf {
    PathBuf::from("marketingEnvValue.json")
}

/// Load and validate the runtime configuration.
///
/// `None` yields the built-in defaults; a path that cannot be read or
/// parsed is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        }
        None => Config::default(),
    };

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.api.timeout_secs == 0 {
        anyhow::bail!("api.timeout_secs must be > 0");
    }
    if !(1..=1000).contains(&config.api.page_size) {
        anyhow::bail!("api.page_size must be in [1, 1000]");
    }
    if config.operations.poll_interval_secs == 0 {
        anyhow::bail!("operations.poll_interval_secs must be > 0");
    }
    if config.operations.timeout_secs == 0 {
        anyhow::bail!("operations.timeout_secs must be > 0");
    }
    if config.agent.default_language_code.trim().is_empty() {
        anyhow::bail!("agent.default_language_code must not be empty");
    }
    if config.agent.time_zone.trim().is_empty() {
        anyhow::bail!("agent.time_zone must not be empty");
    }
    Ok(())
}

/// Identity fields pushed into the agent's generative settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentPersona {
    pub name: String,
    pub identity: String,
    pub description: String,
    pub scope: String,
}

/// Everything a provisioning run needs, resolved once by the entry point.
#[derive(Debug, Clone)]
pub struct ProvisionSettings {
    pub project: String,
    pub location: String,
    pub app_name: String,
    pub company_name: String,
    pub uris: Vec<String>,
    /// Accepted for compatibility; nothing reads from it yet.
    pub datastore_storage_folder: String,
    pub persona: AgentPersona,
    pub language_code: String,
    pub time_zone: String,
    pub wait_for_training: bool,
}

impl ProvisionSettings {
    /// Reject values that would produce malformed resource names.
    pub fn validate(&self) -> Result<()> {
        for (flag, value) in [
            ("--project", &self.project),
            ("--location", &self.location),
            ("--app-name", &self.app_name),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("{} must not be empty", flag);
            }
            if value.contains('/') {
                anyhow::bail!("{} must not contain '/': '{}'", flag, value);
            }
        }
        // Display name only; any characters are allowed.
        if self.company_name.trim().is_empty() {
            anyhow::bail!("--company-name must not be empty");
        }
        if self.uris.is_empty() {
            anyhow::bail!("--uris must name at least one URI pattern");
        }
        if let Some(pos) = self.uris.iter().position(|u| u.trim().is_empty()) {
            anyhow::bail!("--uris entry {} is empty", pos + 1);
        }
        Ok(())
    }
}
