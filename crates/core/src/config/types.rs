use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("shamrock.db")
}

/// Trip image generation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    /// Generate images at startup for modes with no stored image.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// AI Horde service configuration.
    #[serde(default)]
    pub horde: HordeConfig,

    /// Seconds between status polls of an in-progress job.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Maximum status checks per job before giving up (0 = no cap).
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            horde: HordeConfig::default(),
            poll_interval_secs: default_poll_interval(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_poll_interval() -> u64 {
    5
}

fn default_max_poll_attempts() -> u32 {
    120
}

/// AI Horde service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HordeConfig {
    /// Service base URL.
    #[serde(default = "default_horde_url")]
    pub url: String,

    /// API key sent with submissions ("0000000000" is the anonymous key).
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,

    /// Prompt template; "{mode}" is replaced with the travel mode.
    #[serde(default = "default_prompt_template")]
    pub prompt_template: String,
}

impl Default for HordeConfig {
    fn default() -> Self {
        Self {
            url: default_horde_url(),
            api_key: default_api_key(),
            timeout_secs: default_timeout(),
            prompt_template: default_prompt_template(),
        }
    }
}

fn default_horde_url() -> String {
    "https://stablehorde.net".to_string()
}

fn default_api_key() -> String {
    "0000000000".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_prompt_template() -> String {
    "The best trip in Ireland {mode}".to_string()
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub generation: SanitizedGenerationConfig,
}

/// Sanitized generation config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedGenerationConfig {
    pub enabled: bool,
    pub url: String,
    pub api_key_configured: bool,
    pub poll_interval_secs: u64,
    pub max_poll_attempts: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            generation: SanitizedGenerationConfig {
                enabled: config.generation.enabled,
                url: config.generation.horde.url.clone(),
                api_key_configured: !config.generation.horde.api_key.is_empty(),
                poll_interval_secs: config.generation.poll_interval_secs,
                max_poll_attempts: config.generation.max_poll_attempts,
            },
        }
    }
}
