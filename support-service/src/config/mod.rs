use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Model used for both the reply and the reply-analysis calls unless
/// overridden per call.
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Clone, Deserialize)]
pub struct SupportConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub openai: OpenAiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// Model for primary reply generation.
    pub chat_model: String,
    /// Model for the secondary reply-analysis call.
    pub analysis_model: String,
    /// When false, the service runs against the mock provider.
    pub enabled: bool,
}

impl SupportConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(SupportConfig {
            common: common_config,
            openai: OpenAiConfig {
                api_key: get_env("OPENAI_API_KEY", None, is_prod)?,
                chat_model: get_env("OPENAI_CHAT_MODEL", Some(DEFAULT_MODEL), is_prod)?,
                analysis_model: get_env("OPENAI_ANALYSIS_MODEL", Some(DEFAULT_MODEL), is_prod)?,
                enabled: get_env("OPENAI_ENABLED", Some("true"), is_prod)?
                    .parse()
                    .unwrap_or(true),
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
