use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use url::Url;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream model API settings
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Translation behaviour settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// HTTP server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory where rendered documents are stored
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Maximum number of characters accepted in `text`
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,

    /// Maximum size of a request body in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            download_dir: default_download_dir(),
            max_text_length: default_max_text_length(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Upstream chat-completion service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UpstreamConfig {
    /// Full chat-completions URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key for the service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Model name (e.g., "deepseek-chat")
    #[serde(default = "default_model")]
    pub model: String,

    /// Temperature parameter for text generation (0.0 to 2.0)
    /// Lower values make output more deterministic
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum number of tokens the model may generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: String::new(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Translation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Marker the model places between the translation and the glossary JSON
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Footer line printed on generated documents
    #[serde(default = "default_document_footer")]
    pub document_footer: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            document_footer: default_document_footer(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_max_text_length() -> usize {
    5000
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

fn default_endpoint() -> String {
    "https://api.deepseek.com/chat/completions".to_string()
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_tokens() -> u32 {
    3000
}

fn default_timeout_secs() -> u64 {
    240
}

fn default_separator() -> String {
    "==Terms==".to_string()
}

fn default_document_footer() -> String {
    "此文档由翻译助手自动生成".to_string()
}

/// Environment variable holding the upstream API key
pub const ENV_API_KEY: &str = "DEEPSEEK_API_KEY";
/// Environment variable holding the upstream endpoint
pub const ENV_API_URL: &str = "DEEPSEEK_API_URL";
/// Environment variable holding the upstream model name
pub const ENV_MODEL: &str = "DEEPSEEK_MODEL";
/// Environment variable holding the listen port
pub const ENV_PORT: &str = "PORT";

impl Config {
    /// Load the configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load the configuration, writing a default file first when none exists
    ///
    /// Returns the configuration and whether a default file was created.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        let path = path.as_ref();
        if path.exists() {
            return Ok((Self::from_file(path)?, false));
        }

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok((config, true))
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (the environment in production)
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup(ENV_API_KEY).filter(|v| !v.is_empty()) {
            self.upstream.api_key = api_key;
        }

        if let Some(endpoint) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
            self.upstream.endpoint = endpoint;
        }

        if let Some(model) = lookup(ENV_MODEL).filter(|v| !v.is_empty()) {
            self.upstream.model = model;
        }

        if let Some(port) = lookup(ENV_PORT).filter(|v| !v.is_empty()) {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid {} value: {}", ENV_PORT, port))?;
        }

        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.upstream.api_key.trim().is_empty() {
            return Err(anyhow!(
                "Upstream API key is required (set upstream.api_key or {})",
                ENV_API_KEY
            ));
        }

        Url::parse(&self.upstream.endpoint)
            .with_context(|| format!("Invalid upstream endpoint: {}", self.upstream.endpoint))?;

        if self.upstream.model.trim().is_empty() {
            return Err(anyhow!("Upstream model name must not be empty"));
        }

        if !(0.0..=2.0).contains(&self.upstream.temperature) {
            return Err(anyhow!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.upstream.temperature
            ));
        }

        if self.upstream.max_tokens == 0 {
            return Err(anyhow!("max_tokens must be greater than zero"));
        }

        if self.translation.separator.trim().is_empty() {
            return Err(anyhow!("Glossary separator must not be empty"));
        }

        if self.server.max_text_length == 0 {
            return Err(anyhow!("max_text_length must be greater than zero"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
