#[cfg(feature = "cli")]
pub mod cli;

use crate::domain::model::GenerationConfig;
use crate::utils::error::{AdvisorError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;

/// Runtime configuration for the model adapter. Loaded from the environment
/// or from a TOML file with `${VAR}` placeholders resolved against the
/// environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_max_output_tokens() -> u32 {
    DEFAULT_MAX_OUTPUT_TOKENS
}

impl AdvisorConfig {
    pub fn from_env() -> Result<Self> {
        let api_key =
            std::env::var("GOOGLE_API_KEY").map_err(|_| AdvisorError::MissingConfigError {
                field: "GOOGLE_API_KEY".to_string(),
            })?;
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| default_model());

        Ok(Self {
            api_key,
            model,
            endpoint: default_endpoint(),
            timeout_seconds: default_timeout_seconds(),
            max_output_tokens: default_max_output_tokens(),
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AdvisorError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);
        toml::from_str(&processed).map_err(|e| AdvisorError::InvalidConfigValueError {
            field: "toml_parsing".to_string(),
            reason: format!("TOML parsing error: {}", e),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn generation(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: 0.0,
            max_output_tokens: self.max_output_tokens,
            json_output: true,
        }
    }
}

/// Replace `${VAR_NAME}` placeholders with environment values; unresolved
/// placeholders are left as-is so validation can flag them.
fn substitute_env_vars(content: &str) -> String {
    let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();
    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .to_string()
}

impl Validate for AdvisorConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("api_key", &self.api_key)?;
        validate_non_empty_string("model", &self.model)?;
        validate_url("endpoint", &self.endpoint)?;
        validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        validate_positive_number("max_output_tokens", u64::from(self.max_output_tokens), 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_toml_with_defaults() {
        let config = AdvisorConfig::from_toml_str(r#"api_key = "abc123""#).unwrap();
        assert_eq!(config.api_key, "abc123");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout_seconds, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn substitutes_environment_placeholders() {
        std::env::set_var("DECK_ADVISOR_TEST_KEY", "from-env");
        let config =
            AdvisorConfig::from_toml_str(r#"api_key = "${DECK_ADVISOR_TEST_KEY}""#).unwrap();
        assert_eq!(config.api_key, "from-env");
    }

    #[test]
    fn keeps_unresolved_placeholders_verbatim() {
        let config =
            AdvisorConfig::from_toml_str(r#"api_key = "${DECK_ADVISOR_MISSING_VAR}""#).unwrap();
        assert_eq!(config.api_key, "${DECK_ADVISOR_MISSING_VAR}");
    }

    #[test]
    fn rejects_invalid_endpoint() {
        let config = AdvisorConfig::from_toml_str(
            r#"
            api_key = "abc"
            endpoint = "ftp://example.com"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = AdvisorConfig::from_toml_str(
            r#"
            api_key = "abc"
            timeout_seconds = 0
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("advisor.toml");
        std::fs::write(
            &path,
            r#"
            api_key = "file-key"
            model = "gemini-2.5-pro"
            timeout_seconds = 30
            "#,
        )
        .unwrap();

        let config = AdvisorConfig::from_file(&path).unwrap();
        assert_eq!(config.api_key, "file-key");
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }
}
