//! Configuration loaded from environment variables.
//!
//! The config struct is built once at process start and passed by reference
//! into the gateway and dispatcher; there are no ambient globals. Missing
//! required variables are fatal before the server begins serving.

const ENV_CHANNEL_ACCESS_TOKEN: &str = "LINE_CHANNEL_ACCESS_TOKEN";
const ENV_CHANNEL_SECRET: &str = "LINE_CHANNEL_SECRET";
const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
const ENV_VECTOR_STORE_ID: &str = "VECTOR_STORE_ID";
const ENV_LINE_API_BASE: &str = "LINE_API_BASE";
const ENV_OPENAI_API_BASE: &str = "OPENAI_API_BASE";
const ENV_BIND: &str = "LINA_BIND";
const ENV_PORT: &str = "LINA_PORT";

const DEFAULT_BIND: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Process configuration for the gateway and CLI.
#[derive(Debug, Clone)]
pub struct Config {
    /// LINE channel access token (reply and push API auth).
    pub channel_access_token: String,
    /// LINE channel secret (webhook signature verification).
    pub channel_secret: String,
    pub openai_api_key: String,
    /// Vector store ids for the file-search stub, in configured order.
    pub vector_store_ids: Vec<String>,
    /// Override for the LINE API base URL (tests or proxies).
    pub line_api_base: Option<String>,
    /// Override for the OpenAI API base URL (tests or proxies).
    pub openai_api_base: Option<String>,
    pub bind: String,
    pub port: u16,
}

impl Config {
    /// Load config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build config through a lookup function. Tests pass a map-backed lookup
    /// instead of touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let optional = |name: &'static str| -> Option<String> {
            lookup(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let port = match optional(ENV_PORT) {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: ENV_PORT,
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            channel_access_token: required(ENV_CHANNEL_ACCESS_TOKEN)?,
            channel_secret: required(ENV_CHANNEL_SECRET)?,
            openai_api_key: required(ENV_OPENAI_API_KEY)?,
            vector_store_ids: split_store_ids(optional(ENV_VECTOR_STORE_ID).as_deref()),
            line_api_base: optional(ENV_LINE_API_BASE),
            openai_api_base: optional(ENV_OPENAI_API_BASE),
            bind: optional(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string()),
            port,
        })
    }
}

/// Resolve a single required env var, for entry points that do not need the
/// full config (the push command only needs the channel access token).
pub fn required_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::Missing(name))
}

/// Split a comma-separated store id list, preserving order and dropping
/// empty segments.
fn split_store_ids(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
