use super::{
    DEFAULT_BIND_ADDRESS, DEFAULT_FALLBACK_SEED, DEFAULT_SCB_ENDPOINT, DEFAULT_TIMEOUT_SECS,
    DEFAULT_UHR_ENDPOINT,
};
use crate::core::ConfigProvider;
use crate::utils::error::{Result, StatsError};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_positive_number, validate_socket_addr,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENVIRONMENTS: [&str; 2] = ["development", "production"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    pub fallback: Option<FallbackConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    pub environment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_uhr_endpoint")]
    pub uhr_endpoint: String,
    #[serde(default = "default_scb_endpoint")]
    pub scb_endpoint: String,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    pub enabled: bool,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

fn default_uhr_endpoint() -> String {
    DEFAULT_UHR_ENDPOINT.to_string()
}

fn default_scb_endpoint() -> String {
    DEFAULT_SCB_ENDPOINT.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            environment: None,
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            uhr_endpoint: default_uhr_endpoint(),
            scb_endpoint: default_scb_endpoint(),
            api_key: None,
            timeout_seconds: None,
        }
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| StatsError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value. Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| StatsError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("sources.uhr_endpoint", &self.sources.uhr_endpoint)?;
        validate_url("sources.scb_endpoint", &self.sources.scb_endpoint)?;
        validate_socket_addr("server.bind_address", &self.server.bind_address)?;

        if let Some(timeout) = self.sources.timeout_seconds {
            validate_positive_number("sources.timeout_seconds", timeout, 1)?;
        }

        if let Some(environment) = &self.server.environment {
            validate_one_of("server.environment", environment, &ENVIRONMENTS)?;
        }

        if let Some(api_key) = &self.sources.api_key {
            validate_non_empty_string("sources.api_key", api_key)?;
        }

        Ok(())
    }

    pub fn verbose_logging(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn uhr_endpoint(&self) -> &str {
        &self.sources.uhr_endpoint
    }

    fn scb_endpoint(&self) -> &str {
        &self.sources.scb_endpoint
    }

    fn api_key(&self) -> Option<&str> {
        // An unresolved `${VAR}` means the key was never provided.
        self.sources
            .api_key
            .as_deref()
            .filter(|key| !key.starts_with("${"))
    }

    fn request_timeout_secs(&self) -> u64 {
        self.sources.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    fn fallback_enabled(&self) -> bool {
        self.fallback.as_ref().map(|f| f.enabled).unwrap_or(true)
    }

    fn fallback_seed(&self) -> u64 {
        self.fallback
            .as_ref()
            .and_then(|f| f.seed)
            .unwrap_or(DEFAULT_FALLBACK_SEED)
    }

    fn bind_address(&self) -> &str {
        &self.server.bind_address
    }

    fn is_development(&self) -> bool {
        self.server.environment.as_deref() == Some("development")
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
