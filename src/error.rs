use std::path::PathBuf;

use thiserror::Error;

/// Fatal problems with the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Please set the GOOGLE_TRANSLATE_API_KEY environment variable.")]
    MissingApiKey,

    #[error("failed to load environment file {path}: {reason}")]
    EnvFile { path: PathBuf, reason: String },

    #[error("request timeout must be at least one second")]
    InvalidTimeout,
}

/// Problems reading, decoding or writing a single catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("catalog contains bytes that are invalid in {encoding}")]
    Decode { encoding: String },

    #[error("text cannot be represented in {encoding}")]
    Unencodable { encoding: String },
}

impl CatalogError {
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }
}

/// Failure of a single call to the translation backend.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid response: {0}")]
    MalformedResponse(String),
}

/// Errors that stop a whole run.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("'{}' is not a valid directory.", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to read {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Catalog {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },
}
