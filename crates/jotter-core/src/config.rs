//! Client configuration for reaching the note-storage service.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::Duration;

use crate::util::{is_http_url, normalize_text_option};
use crate::{Error, Result};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Where the note service lives and how to authenticate against it.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL the `/notes` routes hang off, without trailing slash
    pub api_url: String,
    /// Bearer token sent with every request when present
    pub api_token: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(api_url: impl AsRef<str>, api_token: Option<String>) -> Result<Self> {
        Ok(Self {
            api_url: normalize_api_url(api_url.as_ref())?,
            api_token: normalize_text_option(api_token),
            ..Self::default()
        })
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_env() -> Result<Self> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    /// Build from `JOTTER_API_URL`, `JOTTER_API_TOKEN` and `JOTTER_HTTP_TIMEOUT_SECS`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = normalize_text_option(lookup("JOTTER_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_token = normalize_text_option(lookup("JOTTER_API_TOKEN"));

        let timeout_secs = match normalize_text_option(lookup("JOTTER_HTTP_TIMEOUT_SECS")) {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                Error::InvalidConfiguration(
                    "JOTTER_HTTP_TIMEOUT_SECS must be an integer in [1, 120]".to_string(),
                )
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };
        if !(1..=120).contains(&timeout_secs) {
            return Err(Error::InvalidConfiguration(
                "JOTTER_HTTP_TIMEOUT_SECS must be in [1, 120]".to_string(),
            ));
        }

        Ok(Self::new(api_url, api_token)?.with_timeout(Duration::from_secs(timeout_secs)))
    }

    /// Full URL of the notes collection.
    #[must_use]
    pub fn notes_url(&self) -> String {
        format!("{}/notes", self.api_url)
    }
}

pub fn normalize_api_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::InvalidConfiguration(
            "API URL must not be empty".to_string(),
        ));
    }
    if !is_http_url(trimmed) {
        return Err(Error::InvalidConfiguration(
            "API URL must include http:// or https://".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
