//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports a TOML config file carrying PostHog credentials, the event
//! catalog and logging settings.
//!
//! Credentials resolve per field: the configured value first, then the
//! environment (`POSTHOG_API_KEY`, `POSTHOG_PROJECT_ID`, `POSTHOG_URL`).

use crate::catalog::{EventCatalog, EventDescriptor};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const ENV_API_KEY: &str = "POSTHOG_API_KEY";
pub const ENV_PROJECT_ID: &str = "POSTHOG_PROJECT_ID";
pub const ENV_URL: &str = "POSTHOG_URL";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub posthog: PostHogConfig,

    /// Event catalog
    #[serde(default)]
    pub events: Vec<EventDescriptor>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// PostHog connection settings; any field may be left to the environment
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostHogConfig {
    pub api_key: Option<String>,
    pub project_id: Option<String>,
    /// Project API root, e.g. "https://eu.posthog.com/api/projects/123"
    pub url: Option<String>,
}

/// Fully resolved connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub project_id: String,
    pub base_url: String,
}

impl PostHogConfig {
    pub fn new(api_key: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            project_id: Some(project_id.into()),
            url: None,
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Resolve against the process environment
    pub fn resolve(&self) -> Result<Credentials, ConfigError> {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Resolve with a custom variable lookup
    pub fn resolve_with<F>(&self, lookup: F) -> Result<Credentials, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |value: &Option<String>, var: &str| {
            value
                .clone()
                .filter(|v| !v.is_empty())
                .or_else(|| lookup(var).filter(|v| !v.is_empty()))
        };

        let api_key = pick(&self.api_key, ENV_API_KEY).ok_or(ConfigError::MissingApiKey)?;
        let project_id =
            pick(&self.project_id, ENV_PROJECT_ID).ok_or(ConfigError::MissingProjectId)?;
        let base_url = pick(&self.url, ENV_URL)
            .unwrap_or_else(|| default_base_url(&project_id));

        Ok(Credentials {
            api_key,
            project_id,
            base_url,
        })
    }
}

fn default_base_url(project_id: &str) -> String {
    format!("https://app.posthog.com/api/projects/{}", project_id)
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Standard config file locations, in search order
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(3);
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("typelytics").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/typelytics/config.toml"));
        paths.push(PathBuf::from("./typelytics.toml"));
        paths
    }

    /// First existing file among the standard locations
    pub fn find_default() -> Option<PathBuf> {
        find_existing(&Self::default_paths())
    }

    /// Load from the first default location that exists, or from the
    /// environment alone when none does
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::find_default() {
            Some(path) => Self::load_with_env(&path),
            None => Ok(Self::from_env()),
        }
    }

    /// Build the event catalog declared in `[[events]]`
    pub fn catalog(&self) -> EventCatalog {
        EventCatalog::new(self.events.iter().cloned())
    }

    /// Apply environment variable overrides to an existing config
    ///
    /// PostHog credentials are not overridden here; the environment is their
    /// fallback, see [`PostHogConfig::resolve`].
    fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("TYPELYTICS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("TYPELYTICS_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

fn find_existing(paths: &[PathBuf]) -> Option<PathBuf> {
    paths.iter().find(|path| path.exists()).cloned()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("PostHog ApiKey is required")]
    MissingApiKey,

    #[error("PostHog ProjectId is required")]
    MissingProjectId,

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Typelytics Configuration
#
# Environment variables are used when a value is not set here:
# - POSTHOG_API_KEY
# - POSTHOG_PROJECT_ID
# - POSTHOG_URL
#
# Environment variables override these settings:
# - TYPELYTICS_LOG_LEVEL
# - TYPELYTICS_LOG_FORMAT

[posthog]
# Personal API key (Settings -> Personal API keys)
# api_key = "phx_..."

# Numeric project id
# project_id = "12345"

# Project API root (default: https://app.posthog.com/api/projects/<project_id>)
# url = "https://eu.posthog.com/api/projects/12345"

# Event catalog: the events and properties queries may reference.
# Property types: DateTime, String, Numeric, Boolean (omit for untyped)
[[events]]
name = "$pageview"

[[events.properties]]
name = "$current_url"
type = "String"

[[events.properties]]
name = "$browser"
type = "String"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
