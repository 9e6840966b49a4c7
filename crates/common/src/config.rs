use crate::errors::ConfigError;
use std::env;

pub const TOKEN_VAR: &str = "HF_TOKEN";
pub const MODEL_VAR: &str = "HF_MODEL";
pub const CI_MARKER_VAR: &str = "GITHUB_ACTIONS";

pub const DEFAULT_MODEL: &str = "google/flan-t5-large";

/// Explicit run configuration. Every pipeline entry point takes one of
/// these instead of doing ambient environment lookups.
#[derive(Debug, Clone)]
pub struct CiConfig {
    /// Bearer token for the inference endpoint. Required.
    pub api_token: String,
    /// Model identifier for the inference endpoint.
    pub model: String,
    /// Whether we are running inside the CI platform. Gates the
    /// PR-annotation artifact of the review pipeline.
    pub ci_platform: bool,
}

impl CiConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            model: DEFAULT_MODEL.to_string(),
            ci_platform: false,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Build the configuration from the process environment.
    ///
    /// `HF_TOKEN` is required; `HF_MODEL` overrides the default model;
    /// the presence of `GITHUB_ACTIONS` flips the CI marker.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_token = env::var(TOKEN_VAR)
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken(TOKEN_VAR))?;

        let model = env::var(MODEL_VAR)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            api_token,
            model,
            ci_platform: env::var(CI_MARKER_VAR).is_ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = CiConfig::new("test-token");
        assert_eq!(config.api_token, "test-token");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(!config.ci_platform);
    }

    #[test]
    fn test_model_override() {
        let config = CiConfig::new("t").with_model("bigscience/bloom");
        assert_eq!(config.model, "bigscience/bloom");
    }

    // Single test for the env path so parallel tests never race on the
    // process environment.
    #[test]
    fn test_from_env() {
        env::remove_var(TOKEN_VAR);
        env::remove_var(MODEL_VAR);
        env::remove_var(CI_MARKER_VAR);
        assert!(matches!(
            CiConfig::from_env(),
            Err(ConfigError::MissingToken(_))
        ));

        env::set_var(TOKEN_VAR, "secret");
        let config = CiConfig::from_env().unwrap();
        assert_eq!(config.api_token, "secret");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(!config.ci_platform);

        env::set_var(MODEL_VAR, "bigscience/bloom");
        env::set_var(CI_MARKER_VAR, "true");
        let config = CiConfig::from_env().unwrap();
        assert_eq!(config.model, "bigscience/bloom");
        assert!(config.ci_platform);

        env::remove_var(TOKEN_VAR);
        env::remove_var(MODEL_VAR);
        env::remove_var(CI_MARKER_VAR);
    }
}
