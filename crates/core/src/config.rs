//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into services. Request handlers
//! never read process-wide environment variables.

use crate::constants::{
    DEFAULT_AI_TIMEOUT, DEFAULT_DATASET_PATH, DEFAULT_GEMINI_API_BASE, DEFAULT_GEMINI_MODEL,
};
use crate::{NonEmptyText, SymptomError, SymptomResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Connection details for the generative-language provider.
#[derive(Clone, Debug)]
pub struct AiProviderConfig {
    api_key: NonEmptyText,
    model: NonEmptyText,
    base_url: String,
}

impl AiProviderConfig {
    pub fn new(api_key: NonEmptyText, model: NonEmptyText, base_url: impl AsRef<str>) -> Self {
        Self {
            api_key,
            model,
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
        }
    }

    pub fn api_key(&self) -> &str {
        self.api_key.as_str()
    }

    pub fn model(&self) -> &str {
        self.model.as_str()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    dataset_path: PathBuf,
    ai_provider: Option<AiProviderConfig>,
    ai_timeout: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `SymptomError::Config` if `ai_timeout` is zero.
    pub fn new(
        dataset_path: PathBuf,
        ai_provider: Option<AiProviderConfig>,
        ai_timeout: Duration,
    ) -> SymptomResult<Self> {
        if ai_timeout.is_zero() {
            return Err(SymptomError::Config(
                "AI provider timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            dataset_path,
            ai_provider,
            ai_timeout,
        })
    }

    /// Build the configuration from already-read environment values.
    ///
    /// Takes the raw values rather than reading `std::env` so that tests can exercise every
    /// combination without touching process state.
    pub fn from_env_values(
        dataset_path: Option<String>,
        api_key: Option<String>,
        model: Option<String>,
        api_base: Option<String>,
        timeout_secs: Option<String>,
    ) -> SymptomResult<Self> {
        let dataset_path = non_blank(dataset_path)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_PATH));

        let ai_provider = match non_blank(api_key) {
            Some(key) => {
                let model = non_blank(model).unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into());
                let base = non_blank(api_base).unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.into());
                let api_key = NonEmptyText::new(key)
                    .map_err(|e| SymptomError::Config(format!("GEMINI_API_KEY: {e}")))?;
                let model = NonEmptyText::new(model)
                    .map_err(|e| SymptomError::Config(format!("GEMINI_MODEL: {e}")))?;
                Some(AiProviderConfig::new(api_key, model, base))
            }
            None => None,
        };

        let ai_timeout = timeout_from_env_value(timeout_secs)?;
        Self::new(dataset_path, ai_provider, ai_timeout)
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }

    pub fn ai_provider(&self) -> Option<&AiProviderConfig> {
        self.ai_provider.as_ref()
    }

    pub fn ai_timeout(&self) -> Duration {
        self.ai_timeout
    }
}

/// Parse the provider timeout (whole seconds) from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default timeout.
pub fn timeout_from_env_value(value: Option<String>) -> SymptomResult<Duration> {
    let Some(value) = non_blank(value) else {
        return Ok(DEFAULT_AI_TIMEOUT);
    };

    let secs: u64 = value
        .parse()
        .map_err(|_| SymptomError::Config(format!("AI_TIMEOUT_SECS is not a number: {value}")))?;
    if secs == 0 {
        return Err(SymptomError::Config(
            "AI_TIMEOUT_SECS must be greater than zero".into(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = CoreConfig::from_env_values(None, None, None, None, None).unwrap();
        assert_eq!(cfg.dataset_path(), Path::new(DEFAULT_DATASET_PATH));
        assert!(cfg.ai_provider().is_none());
        assert_eq!(cfg.ai_timeout(), DEFAULT_AI_TIMEOUT);
    }

    #[test]
    fn blank_api_key_leaves_provider_unconfigured() {
        let cfg =
            CoreConfig::from_env_values(None, Some("   ".into()), None, None, None).unwrap();
        assert!(cfg.ai_provider().is_none());
    }

    #[test]
    fn api_key_enables_provider_with_default_model() {
        let cfg = CoreConfig::from_env_values(
            Some("data/conditions.csv".into()),
            Some("secret".into()),
            None,
            Some("http://localhost:8080/v1beta/".into()),
            Some("5".into()),
        )
        .unwrap();

        let provider = cfg.ai_provider().expect("provider should be configured");
        assert_eq!(provider.api_key(), "secret");
        assert_eq!(provider.model(), DEFAULT_GEMINI_MODEL);
        assert_eq!(provider.base_url(), "http://localhost:8080/v1beta");
        assert_eq!(cfg.ai_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.dataset_path(), Path::new("data/conditions.csv"));
    }

    #[test]
    fn zero_or_garbage_timeout_is_rejected() {
        assert!(matches!(
            timeout_from_env_value(Some("0".into())),
            Err(SymptomError::Config(_))
        ));
        assert!(matches!(
            timeout_from_env_value(Some("soon".into())),
            Err(SymptomError::Config(_))
        ));
        assert!(CoreConfig::new(PathBuf::from("x.csv"), None, Duration::ZERO).is_err());
    }
}
