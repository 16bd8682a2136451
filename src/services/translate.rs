use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::TranslateError;

pub const DEFAULT_ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Machine-translation backend: one string in, one string out.
pub trait Translator {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError>;
}

impl<T: Translator + ?Sized> Translator for &T {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError> {
        (**self).translate(text, target_lang)
    }
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub api_key: String,
    pub endpoint: String,
    pub source_lang: Option<String>,
    pub timeout: Duration,
}

impl GoogleConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        GoogleConfig {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            source_lang: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Google Cloud Translation v2, plain-text mode.
pub struct GoogleTranslator {
    client: Client,
    cfg: GoogleConfig,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

impl GoogleTranslator {
    pub fn new(cfg: GoogleConfig) -> Result<Self, TranslateError> {
        let client = Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(TranslateError::Transport)?;
        Ok(GoogleTranslator { client, cfg })
    }
}

impl Translator for GoogleTranslator {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError> {
        let mut params: Vec<(&str, &str)> = vec![
            ("q", text),
            ("target", target_lang),
            ("format", "text"),
            ("key", self.cfg.api_key.as_str()),
        ];
        if let Some(source) = self.cfg.source_lang.as_deref() {
            params.push(("source", source));
        }

        // The request URL carries the API key; keep it out of error messages.
        let resp = self
            .client
            .get(&self.cfg.endpoint)
            .query(&params)
            .send()
            .map_err(|e| TranslateError::Transport(e.without_url()))?;
        let status = resp.status();

        // Read as text first so an error body is not lost when it is not JSON.
        let body = resp
            .text()
            .map_err(|e| TranslateError::Transport(e.without_url()))?;

        if !status.is_success() {
            return Err(TranslateError::Status {
                status: status.as_u16(),
                message: extract_error_message(status, &body),
            });
        }

        parse_response(&body)
    }
}

fn parse_response(body: &str) -> Result<String, TranslateError> {
    let parsed: TranslateResponse = serde_json::from_str(body)
        .map_err(|e| TranslateError::MalformedResponse(e.to_string()))?;

    parsed
        .data
        .translations
        .into_iter()
        .next()
        .map(|t| t.translated_text)
        .ok_or_else(|| TranslateError::MalformedResponse("empty data.translations".into()))
}

fn extract_error_message(status: StatusCode, body_text: &str) -> String {
    // Google reports { "error": { "message": "..." } }
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body_text) {
        if let Some(msg) = v
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return msg.to_string();
        }
    }

    let trimmed = body_text.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string();
    }

    let snippet: String = trimmed.chars().take(400).collect();
    if snippet.len() < trimmed.len() {
        format!("{snippet}...")
    } else {
        snippet
    }
}
