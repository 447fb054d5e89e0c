//! TOML Configuration File Support
//!
//! Configuration for the chat widget, read from
//! `~/.config/folio-chat/chat.toml` and the environment.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (via [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! The API credential is only ever read from the environment
//! (`GEMINI_API_KEY`, then `API_KEY`). When it is missing or blank the
//! widget runs in demo mode.
//!
//! # Example Configuration
//!
//! ```toml
//! [model]
//! name = "gemini-2.5-flash"
//! api_base = "https://generativelanguage.googleapis.com/v1beta"
//!
//! [persona]
//! assistant_name = "Ask AI Spencer"
//! greeting = "Hi! Ask me about Spencer's work."
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::profile::Persona;

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini REST endpoint
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Sampling temperature for every remote request
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Environment variables checked for the credential, in order
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[model]` section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelToml {
    /// Gemini model name
    pub name: Option<String>,
    /// REST endpoint base URL
    pub api_base: Option<String>,
}

/// `[persona]` section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaToml {
    /// Widget header title
    pub assistant_name: Option<String>,
    /// First bot message
    pub greeting: Option<String>,
    /// Replaces the generated system instruction
    pub system_instruction: Option<String>,
}

/// Root of the TOML configuration file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatToml {
    /// Model settings
    pub model: ModelToml,
    /// Persona settings
    pub persona: PersonaToml,
}

// =============================================================================
// Effective Configuration
// =============================================================================

/// Effective chat configuration
#[derive(Clone, Debug)]
pub struct ChatConfig {
    /// Gemini API key; `None` selects demo mode
    pub api_key: Option<String>,
    /// Gemini model name
    pub model: String,
    /// REST endpoint base URL
    pub api_base: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Assistant persona copy
    pub persona: Persona,
    /// Path of the loaded config file, if any
    pub config_file_path: Option<PathBuf>,
    /// Highest-priority source that contributed a value
    source: ConfigSource,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            persona: Persona::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl ChatConfig {
    /// Where the configuration came from
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Whether a usable credential is configured
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Check values that would make every request fail
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "model name must not be empty".to_string(),
            ));
        }
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "api_base must be an http(s) URL, got {:?}",
                self.api_base
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Get the default configuration file path
///
/// `$XDG_CONFIG_HOME/folio-chat/chat.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("folio-chat").join("chat.toml"))
}

/// Load configuration from the default path plus environment
pub fn load_config() -> Result<ChatConfig, ConfigError> {
    load_config_from_path(None)
}

/// Load configuration from an explicit path plus environment
///
/// A missing file is not an error; defaults are used instead.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<ChatConfig, ConfigError> {
    let mut config = ChatConfig::default();

    if let Some(config_path) = path.or_else(default_config_path) {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(&config_path).map_err(|source| ConfigError::ReadError {
                    path: config_path.clone(),
                    source,
                })?;

            let toml_config: ChatToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config);
    config.validate()?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut ChatConfig, toml: &ChatToml) {
    if let Some(ref name) = toml.model.name {
        config.model = name.clone();
    }
    if let Some(ref base) = toml.model.api_base {
        config.api_base = base.trim_end_matches('/').to_string();
    }

    if let Some(ref name) = toml.persona.assistant_name {
        config.persona.assistant_name = name.clone();
    }
    if let Some(ref greeting) = toml.persona.greeting {
        config.persona.greeting = greeting.clone();
    }
    if let Some(ref instruction) = toml.persona.system_instruction {
        config.persona.system_instruction = instruction.clone();
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut ChatConfig) {
    if let Some(key) = API_KEY_ENV_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
    {
        config.api_key = Some(key.trim().to_string());
    }

    if let Ok(model) = std::env::var("FOLIO_CHAT_MODEL") {
        if !model.trim().is_empty() {
            config.model = model;
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(base) = std::env::var("FOLIO_CHAT_API_BASE") {
        if !base.trim().is_empty() {
            config.api_base = base.trim_end_matches('/').to_string();
            config.source = ConfigSource::Env;
        }
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Model override
    pub model: Option<String>,

    /// Endpoint override
    pub api_base: Option<String>,

    /// Credential override
    pub api_key: Option<String>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set model override
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set endpoint override
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Set credential override
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut ChatConfig) {
        if let Some(ref model) = self.model {
            config.model = model.clone();
            config.source = ConfigSource::Cli;
        }
        if let Some(ref base) = self.api_base {
            config.api_base = base.trim_end_matches('/').to_string();
            config.source = ConfigSource::Cli;
        }
        if let Some(ref key) = self.api_key {
            config.api_key = Some(key.clone());
            config.source = ConfigSource::Cli;
        }
    }
}
