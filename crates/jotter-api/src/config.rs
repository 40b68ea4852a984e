use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_MAX_TITLE_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Bearer token every `/api/notes` call must carry; open access when unset
    pub api_token: Option<String>,
    /// JSON snapshot the store is loaded from and rewritten to
    pub data_file: Option<PathBuf>,
    pub max_title_chars: usize,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("data_file", &self.data_file)
            .field("max_title_chars", &self.max_title_chars)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = value_or_default(&lookup, "JOTTER_API_BIND_ADDR", DEFAULT_BIND_ADDR);
        let api_token = optional_trimmed(&lookup, "JOTTER_API_TOKEN");
        let data_file = optional_trimmed(&lookup, "JOTTER_DATA_FILE").map(PathBuf::from);

        let max_title_chars = match optional_trimmed(&lookup, "JOTTER_MAX_TITLE_CHARS") {
            Some(raw) => raw.parse::<usize>().map_err(|_| {
                ConfigError::Invalid(
                    "JOTTER_MAX_TITLE_CHARS must be an integer in [1, 10000]".to_string(),
                )
            })?,
            None => DEFAULT_MAX_TITLE_CHARS,
        };
        if !(1..=10_000).contains(&max_title_chars) {
            return Err(ConfigError::Invalid(
                "JOTTER_MAX_TITLE_CHARS must be in [1, 10000]".to_string(),
            ));
        }

        Ok(Self {
            bind_addr,
            api_token,
            data_file,
            max_title_chars,
        })
    }
}

fn value_or_default(lookup: impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    optional_trimmed(lookup, name).unwrap_or_else(|| default.to_string())
}

fn optional_trimmed(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
