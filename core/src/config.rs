//! Client configuration: where the movies backend lives.

use std::env;

use reqwest::Url;

use crate::error::ConfigError;

pub const BASE_URL_VAR: &str = "MOVIES_API_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    /// Accepts absolute `http`/`https` URLs with a host.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.into();
        let parsed = match Url::parse(&base_url) {
            Ok(url) => url,
            Err(_) => return Err(ConfigError::InvalidBaseUrl(base_url)),
        };
        let http = matches!(parsed.scheme(), "http" | "https");
        if !http || parsed.host_str().map_or(true, str::is_empty) {
            return Err(ConfigError::InvalidBaseUrl(base_url));
        }
        Ok(Self { base_url })
    }

    /// Read `MOVIES_API_URL`, loading a `.env` file first if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let base_url = env::var(BASE_URL_VAR).map_err(|_| ConfigError::Missing(BASE_URL_VAR))?;
        Self::new(base_url)
    }
}
