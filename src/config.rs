// src/config.rs
use std::env;
use std::time::Duration;

use anyhow::Context;

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Answer clearly and concisely, using markdown where it helps.";
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 4000;
pub const DEFAULT_MAX_UPSTREAM_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,

    // Upstream completion service
    pub upstream_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub upstream_timeout: Duration,
    pub max_upstream_body_bytes: usize,

    // Chat
    pub system_prompt: String,
    pub max_message_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: None,
            temperature: None,
            upstream_timeout: Duration::from_secs(60),
            max_upstream_body_bytes: DEFAULT_MAX_UPSTREAM_BODY_BYTES,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Config::default();

        Ok(Config {
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_or(get("PORT"), "PORT", defaults.port)?,

            upstream_url: get("UPSTREAM_URL").unwrap_or(defaults.upstream_url),
            api_key: get("UPSTREAM_API_KEY"),
            model: get("UPSTREAM_MODEL").unwrap_or(defaults.model),
            max_tokens: parse_opt(get("UPSTREAM_MAX_TOKENS"), "UPSTREAM_MAX_TOKENS")?,
            temperature: parse_opt(get("UPSTREAM_TEMPERATURE"), "UPSTREAM_TEMPERATURE")?,
            upstream_timeout: Duration::from_secs(parse_or(
                get("UPSTREAM_TIMEOUT_SECS"),
                "UPSTREAM_TIMEOUT_SECS",
                defaults.upstream_timeout.as_secs(),
            )?),
            max_upstream_body_bytes: parse_or(
                get("UPSTREAM_MAX_BODY_BYTES"),
                "UPSTREAM_MAX_BODY_BYTES",
                defaults.max_upstream_body_bytes,
            )?,

            system_prompt: get("SYSTEM_PROMPT").unwrap_or(defaults.system_prompt),
            max_message_chars: parse_or(
                get("MAX_MESSAGE_CHARS"),
                "MAX_MESSAGE_CHARS",
                defaults.max_message_chars,
            )?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_opt<T>(value: Option<String>, key: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .map(|v| v.parse::<T>().with_context(|| format!("invalid value for {key}: {v:?}")))
        .transpose()
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    Ok(parse_opt(value, key)?.unwrap_or(default))
}
