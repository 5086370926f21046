//! Startup configuration for the navigator relay.
//!
//! Values come from the process environment (after `.env` has been loaded by
//! the binary). Everything has a default except the API key.

use std::fmt;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Error
// ─────────────────────────────────────────────────────────────────────────────

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid CORS origin: {0:?}")]
    InvalidOrigin(String),

    #[error("No CORS origins configured")]
    NoOrigins,
}

// ─────────────────────────────────────────────────────────────────────────────
// Keys & Defaults
// ─────────────────────────────────────────────────────────────────────────────

pub const HOST_KEY: &str = "NAVIGATOR_HOST";
pub const PORT_KEY: &str = "NAVIGATOR_PORT";
pub const API_KEY_KEY: &str = "IAM_API_KEY";
pub const TOKEN_URL_KEY: &str = "IAM_TOKEN_URL";
pub const GRANT_TYPE_KEY: &str = "IAM_GRANT_TYPE";
pub const SCORING_URL_KEY: &str = "SCORING_URL";
pub const CORS_ORIGINS_KEY: &str = "CORS_ORIGINS";
pub const TIMEOUT_KEY: &str = "UPSTREAM_TIMEOUT_SECS";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_TOKEN_URL: &str = "https://iam.cloud.ibm.com/identity/token";
const DEFAULT_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";
const DEFAULT_SCORING_URL: &str = "https://us-south.ml.cloud.ibm.com/ml/v4/deployments/ad4ce828-77fb-4905-94c2-930560b54589/ai_service?version=2021-05-01";
const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:5173",
    "http://localhost:3000",
    "http://mistartup-navigator-nek8.bolt.host",
];

// ─────────────────────────────────────────────────────────────────────────────
// Config Structs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where and how the relay talks to the identity provider and the deployment.
#[derive(Clone)]
pub struct UpstreamConfig {
    pub api_key: String,
    pub token_url: String,
    pub grant_type: String,
    pub scoring_url: String,
    /// Per-call timeout. `None` waits on the transport indefinitely.
    pub timeout: Option<Duration>,
}

impl UpstreamConfig {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_key", &if self.has_api_key() { "<set>" } else { "<unset>" })
            .field("token_url", &self.token_url)
            .field("grant_type", &self.grant_type)
            .field("scoring_url", &self.scoring_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    pub origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub cors: CorsConfig,
}

impl RelayConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, treating blank values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get(PORT_KEY) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue { key: PORT_KEY, value: raw })?,
            None => DEFAULT_PORT,
        };

        let timeout = match get(TIMEOUT_KEY) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => return Err(ConfigError::InvalidValue { key: TIMEOUT_KEY, value: raw }),
            },
            None => None,
        };

        let cors = match get(CORS_ORIGINS_KEY) {
            Some(raw) => parse_origins(&raw)?,
            None => CorsConfig::default(),
        };

        Ok(Self {
            server: ServerConfig {
                host: get(HOST_KEY).unwrap_or_else(|| DEFAULT_HOST.into()),
                port,
            },
            upstream: UpstreamConfig {
                api_key: get(API_KEY_KEY).unwrap_or_default(),
                token_url: get(TOKEN_URL_KEY).unwrap_or_else(|| DEFAULT_TOKEN_URL.into()),
                grant_type: get(GRANT_TYPE_KEY).unwrap_or_else(|| DEFAULT_GRANT_TYPE.into()),
                scoring_url: get(SCORING_URL_KEY).unwrap_or_else(|| DEFAULT_SCORING_URL.into()),
                timeout,
            },
            cors,
        })
    }
}

/// Parses a comma-separated origin allow-list.
pub fn parse_origins(raw: &str) -> Result<CorsConfig, ConfigError> {
    let mut origins = Vec::new();
    for origin in raw.split(',').map(str::trim).filter(|o| !o.is_empty()) {
        let valid_scheme = origin.starts_with("http://") || origin.starts_with("https://");
        if !valid_scheme || origin.ends_with('/') || origin.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidOrigin(origin.to_string()));
        }
        origins.push(origin.to_string());
    }

    if origins.is_empty() {
        return Err(ConfigError::NoOrigins);
    }
    Ok(CorsConfig { origins })
}
