use crate::services::providers::gemini::{GeminiConfig, GEMINI_API_BASE};
use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-preview-05-20";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    /// Browser origins allowed to call the API. Empty disables CORS handling.
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// Left empty when unset; calls then fail and surface as a 500.
    pub api_key: Secret<String>,
    pub model: String,
    pub api_base: String,
    /// Request the Google Search grounding tool on every call.
    pub enable_search: bool,
    pub timeout_secs: u64,
}

impl AssistantConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        Ok(AssistantConfig {
            common: common_config,
            gemini: GeminiSettings {
                api_key: Secret::new(env::var("GEMINI_API_KEY").unwrap_or_default()),
                model: get_env("GEMINI_MODEL", Some(DEFAULT_GEMINI_MODEL))?,
                api_base: get_env("GEMINI_API_BASE", Some(GEMINI_API_BASE))?,
                enable_search: parse_bool(&get_env("GEMINI_ENABLE_SEARCH", Some("true"))?)?,
                timeout_secs: get_env(
                    "GEMINI_TIMEOUT_SECS",
                    Some(&DEFAULT_TIMEOUT_SECS.to_string()),
                )?
                .parse()
                .map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!("GEMINI_TIMEOUT_SECS is invalid: {}", e))
                })?,
            },
            cors_allowed_origins: parse_list(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default()),
        })
    }
}

impl From<&GeminiSettings> for GeminiConfig {
    fn from(settings: &GeminiSettings) -> Self {
        GeminiConfig {
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            api_base: settings.api_base.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }
}

fn get_env(key: &str, default: Option<&str>) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => match default {
            Some(def) => Ok(def.to_string()),
            None => Err(AppError::ConfigError(anyhow::anyhow!(
                "{} is required but not set",
                key
            ))),
        },
    }
}

fn parse_bool(value: &str) -> Result<bool, AppError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::ConfigError(anyhow::anyhow!(
            "Invalid boolean value: {}",
            other
        ))),
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
