use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::embed::ParamPolicy;
use crate::relay::catbox::DEFAULT_API_URL;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be a number, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("CATBOX_API_URL must be an http(s) URL, got '{0}'")]
    InvalidRelayUrl(String),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// `APP_ENV` is anything other than `production`. Selects human-readable logs.
    pub is_dev: bool,
    pub relay_url: Url,
    pub relay_userhash: Option<String>,
    pub upload_timeout: Duration,
    pub max_body_bytes: usize,
    pub param_policy: ParamPolicy,
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present.
    ///
    /// Every variable has a default; only malformed values are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let relay_url_raw = env::var("CATBOX_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let relay_url = Url::parse(&relay_url_raw)
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            .ok_or_else(|| ConfigError::InvalidRelayUrl(relay_url_raw.clone()))?;

        let strict = env::var("EMBED_STRICT_PARAMS")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: parse_var("PORT", 3000)?,
            is_dev: env::var("APP_ENV").as_deref() != Ok("production"),
            relay_url,
            relay_userhash: env::var("CATBOX_USERHASH").ok().filter(|h| !h.is_empty()),
            upload_timeout: Duration::from_secs(parse_var("UPLOAD_TIMEOUT_SECS", 120)?),
            max_body_bytes: parse_var("MAX_BODY_BYTES", 268_435_456)?,
            param_policy: if strict {
                ParamPolicy::Strict
            } else {
                ParamPolicy::Passthrough
            },
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Read a numeric variable, using `default` when unset or empty.
fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        _ => Ok(default),
    }
}
