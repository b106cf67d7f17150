//! Process configuration, built once at start-up and passed down explicitly.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable holding the chat-completion endpoint URL.
pub const API_URL_VAR: &str = "ARCHLENS_API_URL";
/// Environment variable holding the bearer token for the endpoint.
pub const API_KEY_VAR: &str = "ARCHLENS_API_KEY";
/// Environment variable overriding the model identifier.
pub const MODEL_VAR: &str = "ARCHLENS_MODEL";
/// Environment variable overriding the per-call timeout, in seconds.
pub const TIMEOUT_VAR: &str = "ARCHLENS_TIMEOUT_SECS";
/// Environment variable overriding the inter-stage delay, in seconds.
pub const STAGE_DELAY_VAR: &str = "ARCHLENS_STAGE_DELAY_SECS";
/// Environment variable overriding the upload staging directory.
pub const UPLOAD_DIR_VAR: &str = "ARCHLENS_UPLOAD_DIR";
/// Environment variable overriding the upload size limit, in MiB.
pub const MAX_UPLOAD_VAR: &str = "ARCHLENS_MAX_UPLOAD_MB";

const DEFAULT_API_URL: &str =
    "https://clovastudio.stream.ntruss.com/testapp/v1/chat-completions/HCX-007";
const DEFAULT_MODEL: &str = "HCX-007";
const DEFAULT_TIMEOUT_SECS: u64 = 90;
const DEFAULT_STAGE_DELAY_SECS: u64 = 15;
const DEFAULT_MAX_UPLOAD_MB: u64 = 200;
const UPLOAD_DIR_NAME: &str = "archlens-uploads";

/// Errors raised while reading configuration or wiring live adapters.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is absent.
    #[error("{key} is not set")]
    Missing {
        /// Name of the missing variable.
        key: &'static str,
    },
    /// A variable is present but cannot be parsed.
    #[error("{key} has an invalid value {value:?}")]
    Invalid {
        /// Name of the offending variable.
        key: &'static str,
        /// The raw value that failed to parse.
        value: String,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Decoding parameters sent with every chat-completion request.
///
/// These are fixed per process so both stages see the same output format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodingParams {
    /// Nucleus sampling threshold.
    pub top_p: f32,
    /// Top-k sampling cutoff (0 disables it).
    pub top_k: u32,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Repetition penalty.
    pub repeat_penalty: f32,
    /// Stop sequences.
    pub stop_before: Vec<String>,
    /// Whether the provider should run its content filters.
    pub include_ai_filters: bool,
}

impl Default for DecodingParams {
    fn default() -> Self {
        Self {
            top_p: 0.8,
            top_k: 0,
            max_tokens: 2000,
            temperature: 0.5,
            repeat_penalty: 5.0,
            stop_before: Vec::new(),
            include_ai_filters: true,
        }
    }
}

/// Settings for the remote model endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Chat-completion URL.
    pub api_url: String,
    /// Bearer token; only required when calling the live endpoint.
    pub api_key: Option<String>,
    /// Model identifier placed in the request body.
    pub model: String,
    /// Per-call HTTP timeout.
    pub timeout: Duration,
    /// Fixed decoding parameters.
    pub params: DecodingParams,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            params: DecodingParams::default(),
        }
    }
}

/// Where uploaded archives are staged and how large they may be.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadConfig {
    /// Directory receiving the transient archive copies.
    pub dir: PathBuf,
    /// Maximum accepted archive size in bytes.
    pub max_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: env::temp_dir().join(UPLOAD_DIR_NAME),
            max_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
        }
    }
}

/// Complete process configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Model endpoint settings.
    pub model: ModelConfig,
    /// Upload staging settings.
    pub upload: UploadConfig,
    /// Blocking pause between the two model calls.
    pub stage_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            upload: UploadConfig::default(),
            stage_delay: Duration::from_secs(DEFAULT_STAGE_DELAY_SECS),
        }
    }
}

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// `.env` loading happens in `main` before this is called.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a numeric variable does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = value(API_URL_VAR) {
            config.model.api_url = url;
        }
        config.model.api_key = value(API_KEY_VAR);
        if let Some(model) = value(MODEL_VAR) {
            config.model.model = model;
        }
        if let Some(raw) = value(TIMEOUT_VAR) {
            config.model.timeout = Duration::from_secs(parse_u64(TIMEOUT_VAR, &raw)?);
        }
        if let Some(raw) = value(STAGE_DELAY_VAR) {
            config.stage_delay = Duration::from_secs(parse_u64(STAGE_DELAY_VAR, &raw)?);
        }
        if let Some(dir) = value(UPLOAD_DIR_VAR) {
            config.upload.dir = PathBuf::from(dir);
        }
        if let Some(raw) = value(MAX_UPLOAD_VAR) {
            config.upload.max_bytes = parse_u64(MAX_UPLOAD_VAR, &raw)?
                .checked_mul(1024 * 1024)
                .ok_or(ConfigError::Invalid { key: MAX_UPLOAD_VAR, value: raw })?;
        }

        Ok(config)
    }
}

fn parse_u64(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw.to_string() })
}
