use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::error::ConfigError;
use crate::services::translate::{GoogleConfig, DEFAULT_ENDPOINT};

pub const API_KEY_VAR: &str = "GOOGLE_TRANSLATE_API_KEY";
pub const ENDPOINT_VAR: &str = "GOOGLE_TRANSLATE_ENDPOINT";

/// Loads variables from `path`, or from a `.env` in the working directory
/// (or a parent) when no path is given. Only an explicit file must exist.
/// Variables already set in the process environment are never overridden.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    match path {
        Some(p) => {
            dotenvy::from_path(p).map_err(|e| ConfigError::EnvFile {
                path: p.to_path_buf(),
                reason: e.to_string(),
            })?;
            Ok(Some(p.to_path_buf()))
        }
        None => match dotenvy::dotenv() {
            Ok(found) => {
                debug!("loaded environment from {}", found.display());
                Ok(Some(found))
            }
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(ConfigError::EnvFile {
                path: PathBuf::from(".env"),
                reason: e.to_string(),
            }),
        },
    }
}

/// Settings for the translation backend, merged from flags and environment.
#[derive(Debug, Clone, Default)]
pub struct BackendSettings {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub source_lang: Option<String>,
    pub timeout_secs: u64,
}

impl BackendSettings {
    /// Flags win over the environment; empty values count as unset.
    pub fn resolve(mut self) -> Self {
        self.api_key = non_empty(self.api_key).or_else(|| non_empty(env::var(API_KEY_VAR).ok()));
        self.endpoint = non_empty(self.endpoint).or_else(|| non_empty(env::var(ENDPOINT_VAR).ok()));
        self.source_lang = non_empty(self.source_lang);
        self
    }

    /// `require_key` is false on dry runs, which never reach the backend.
    pub fn google_config(&self, require_key: bool) -> Result<GoogleConfig, ConfigError> {
        let api_key = match (&self.api_key, require_key) {
            (Some(k), _) => k.clone(),
            (None, false) => String::new(),
            (None, true) => return Err(ConfigError::MissingApiKey),
        };

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(GoogleConfig {
            api_key,
            endpoint: self
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            source_lang: self.source_lang.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
