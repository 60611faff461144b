//! Server configuration management
//!
//! Handles loading configuration from environment variables, TOML files, and CLI arguments.
//! The resulting [`ServerConfig`] is built once at startup and shared read-only.

use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable names recognised by the server.
pub mod env_vars {
    /// Bind address
    pub const HOST: &str = "SHOCK_SERVER_HOST";
    /// Listen port
    pub const PORT: &str = "SHOCK_SERVER_PORT";
    /// Log level
    pub const LOG_LEVEL: &str = "SHOCK_LOG_LEVEL";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "SHOCK_ENV";
    /// Comma-separated CORS origins
    pub const CORS_ORIGINS: &str = "SHOCK_CORS_ORIGINS";
    /// Enables the market-data provider
    pub const MARKET_DATA_ENABLED: &str = "SHOCK_MARKET_DATA_ENABLED";
    /// Text analysis API key
    pub const ANALYSIS_API_KEY: &str = "OPENAI_API_KEY";
    /// Text analysis model
    pub const ANALYSIS_MODEL: &str = "SHOCK_ANALYSIS_MODEL";

    /// Every variable above.
    pub const ALL: [&str; 8] = [
        HOST,
        PORT,
        LOG_LEVEL,
        ENVIRONMENT,
        CORS_ORIGINS,
        MARKET_DATA_ENABLED,
        ANALYSIS_API_KEY,
        ANALYSIS_MODEL,
    ];
}

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid port number: {0}. Must be between 1 and 65535")]
    InvalidPort(String),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid environment: {0}. Must be one of: development, staging, production")]
    InvalidEnvironment(String),

    #[error("Invalid boolean for {name}: {value}")]
    InvalidFlag { name: String, value: String },

    #[error("Invalid socket address: {0}")]
    InvalidAddress(String),

    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Log levels supported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Environment types for configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidEnvironment(s.to_string())),
        }
    }
}

impl Environment {
    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Market-data provider settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarketDataConfig {
    /// Query the provider before falling back to synthetic data
    pub enabled: bool,
    /// Chart API base URL
    pub base_url: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Symbol served by `/api/market-data`
    pub index_symbol: String,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://query2.finance.yahoo.com".to_string(),
            timeout_ms: 5_000,
            index_symbol: "URTH".to_string(),
        }
    }
}

/// Text-analysis provider settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// API key; the provider is disabled without one
    pub api_key: Option<String>,
    /// Chat model name
    pub model: String,
    /// API base URL
    pub base_url: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_ms: 8_000,
        }
    }
}

impl AnalysisConfig {
    /// Returns `true` when a non-empty API key is configured.
    pub fn is_enabled(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Server configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Environment (development, staging, production)
    #[serde(deserialize_with = "deserialize_environment")]
    pub environment: Environment,
    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
    /// Market-data provider
    pub market_data: MarketDataConfig,
    /// Text-analysis provider
    pub analysis: AnalysisConfig,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

fn deserialize_environment<'de, D>(deserializer: D) -> Result<Environment, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Environment::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5002,
            log_level: LogLevel::Info,
            environment: Environment::Development,
            cors_origins: vec!["*".to_string()],
            market_data: MarketDataConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

fn split_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl ServerConfig {
    /// Create a new ServerConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables on top of defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;

        let config: ServerConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Override fields for every variable `lookup` returns a value for.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(env_vars::HOST) {
            self.host = host;
        }
        if let Some(port) = lookup(env_vars::PORT) {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        if let Some(level) = lookup(env_vars::LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(env) = lookup(env_vars::ENVIRONMENT) {
            self.environment = Environment::from_str(&env)?;
        }
        if let Some(origins) = lookup(env_vars::CORS_ORIGINS) {
            self.cors_origins = split_origins(&origins);
        }
        if let Some(enabled) = lookup(env_vars::MARKET_DATA_ENABLED) {
            self.market_data.enabled = parse_flag(env_vars::MARKET_DATA_ENABLED, &enabled)?;
        }
        if let Some(key) = lookup(env_vars::ANALYSIS_API_KEY) {
            self.analysis.api_key = Some(key);
        }
        if let Some(model) = lookup(env_vars::ANALYSIS_MODEL) {
            self.analysis.model = model;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port.to_string()));
        }
        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns `true` when any origin is allowed.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(log_level) = &cli.log_level {
            self.log_level = LogLevel::from_str(log_level)?;
        }
        if cli.enable_market_data {
            self.market_data.enabled = true;
        }
        Ok(())
    }
}

/// CLI arguments structure
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Host address override
    pub host: Option<String>,
    /// Port override
    pub port: Option<u16>,
    /// Log level override
    pub log_level: Option<String>,
    /// Force the market-data provider on
    pub enable_market_data: bool,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<ServerConfig, ConfigError> {
    build_config_with_env(cli, |name| std::env::var(name).ok())
}

/// [`build_config`] with an explicit environment lookup.
pub fn build_config_with_env<F>(cli: &CliArgs, lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = if let Some(config_path) = &cli.config_file {
        ServerConfig::from_file(config_path)?
    } else {
        ServerConfig::default()
    };

    config.apply_env(lookup)?;
    config.merge_with_cli(cli)?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5002);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.cors_origins, vec!["*"]);
        assert!(!config.market_data.enabled);
        assert_eq!(config.market_data.index_symbol, "URTH");
        assert_eq!(config.market_data.timeout_ms, 5_000);
        assert!(!config.analysis.is_enabled());
        assert_eq!(config.analysis.timeout_ms, 8_000);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("WARN").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);

        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(Environment::from_str("dev").unwrap(), Environment::Development);
        assert_eq!(Environment::from_str("Stage").unwrap(), Environment::Staging);
        assert_eq!(Environment::from_str("production").unwrap(), Environment::Production);
        assert!(Environment::from_str("invalid").is_err());
        assert!(Environment::Production.is_production());
        assert!(!Environment::Staging.is_production());
    }

    #[test]
    fn test_display_impls() {
        assert_eq!(format!("{}", LogLevel::Warn), "warn");
        assert_eq!(format!("{}", Environment::Staging), "staging");
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_validate_port() {
        let mut config = ServerConfig::default();
        config.port = 0;
        assert!(config.validate().is_err());

        config.port = 65535;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_env_overrides() {
        let mut config = ServerConfig::default();
        config
            .apply_env(lookup_from(&[
                (env_vars::HOST, "127.0.0.1"),
                (env_vars::PORT, "7000"),
                (env_vars::LOG_LEVEL, "debug"),
                (env_vars::ENVIRONMENT, "prod"),
                (env_vars::CORS_ORIGINS, "http://localhost:3000, https://example.com"),
                (env_vars::MARKET_DATA_ENABLED, "true"),
                (env_vars::ANALYSIS_API_KEY, "sk-test"),
                (env_vars::ANALYSIS_MODEL, "gpt-4o-mini"),
            ]))
            .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 7000);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:3000", "https://example.com"]
        );
        assert!(!config.allows_any_origin());
        assert!(config.market_data.enabled);
        assert!(config.analysis.is_enabled());
        assert_eq!(config.analysis.model, "gpt-4o-mini");
    }

    #[test]
    fn test_apply_env_rejects_bad_values() {
        let mut config = ServerConfig::default();
        assert!(matches!(
            config.apply_env(lookup_from(&[(env_vars::PORT, "http")])),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            config.apply_env(lookup_from(&[(env_vars::MARKET_DATA_ENABLED, "maybe")])),
            Err(ConfigError::InvalidFlag { .. })
        ));
    }

    #[test]
    fn test_blank_api_key_disables_analysis() {
        let analysis = AnalysisConfig {
            api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(!analysis.is_enabled());
    }

    #[test]
    fn test_cli_args_merge() {
        let mut config = ServerConfig::default();
        let cli = CliArgs {
            host: Some("192.168.1.1".to_string()),
            port: Some(9000),
            log_level: Some("debug".to_string()),
            config_file: None,
            enable_market_data: true,
        };

        config.merge_with_cli(&cli).unwrap();

        assert_eq!(config.host, "192.168.1.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert!(config.market_data.enabled);
    }

    #[test]
    fn test_cli_rejects_bad_log_level() {
        let mut config = ServerConfig::default();
        let cli = CliArgs {
            log_level: Some("loud".to_string()),
            ..Default::default()
        };
        assert!(config.merge_with_cli(&cli).is_err());
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_str = r#"
            host = "127.0.0.1"
            port = 3000
            log_level = "debug"
            environment = "production"
            cors_origins = ["http://localhost:3000"]

            [market_data]
            enabled = true
            timeout_ms = 2500

            [analysis]
            api_key = "sk-file"
            model = "gpt-4o"
        "#;

        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.cors_origins, vec!["http://localhost:3000"]);
        assert!(config.market_data.enabled);
        assert_eq!(config.market_data.timeout_ms, 2500);
        assert_eq!(config.market_data.index_symbol, "URTH");
        assert_eq!(config.analysis.api_key.as_deref(), Some("sk-file"));
        assert_eq!(config.analysis.model, "gpt-4o");
    }

    #[test]
    fn test_partial_toml_deserialization() {
        let config: ServerConfig = toml::from_str("port = 9000").unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.allows_any_origin());
    }

    #[test]
    fn test_build_config_priority() {
        let cli = CliArgs {
            port: Some(9100),
            ..Default::default()
        };
        let env = lookup_from(&[(env_vars::PORT, "9000"), (env_vars::HOST, "10.0.0.1")]);
        let config = build_config_with_env(&cli, env).unwrap();

        // CLI beats env; env beats defaults.
        assert_eq!(config.port, 9100);
        assert_eq!(config.host, "10.0.0.1");
    }

    #[test]
    fn test_build_config_with_defaults() {
        let config = build_config_with_env(&CliArgs::default(), |_| None).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5002);
    }

    #[test]
    fn test_missing_config_file() {
        let cli = CliArgs {
            config_file: Some(PathBuf::from("/nonexistent/shock.toml")),
            ..Default::default()
        };
        assert!(matches!(
            build_config_with_env(&cli, |_| None),
            Err(ConfigError::FileError(_))
        ));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidPort("0".to_string());
        assert!(err.to_string().contains("Invalid port"));

        let err = ConfigError::InvalidLogLevel("bad".to_string());
        assert!(err.to_string().contains("Invalid log level"));

        let err = ConfigError::InvalidEnvironment("bad".to_string());
        assert!(err.to_string().contains("Invalid environment"));
    }
}
