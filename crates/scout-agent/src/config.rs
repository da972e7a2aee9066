use scout_core::{ScoutError, ScoutResult};
use serde::{Deserialize, Serialize};

/// Configuration for the model endpoint.
///
/// Three user-supplied values (credential, model id, base URL) plus a
/// streaming flag; sampling knobs carry serde defaults so a minimal config
/// only names the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// API credential. Empty means not configured yet.
    #[serde(default)]
    pub api_key: String,
    /// Model identifier passed through to the endpoint.
    pub model_id: String,
    /// Endpoint base URL override; `None` uses the OpenAI default.
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Whether to use the streaming completions path.
    #[serde(default = "default_streaming")]
    pub streaming: bool,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Completion token cap per request.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Upper bound on propose/execute rounds within one turn.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

fn default_streaming() -> bool {
    true
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_max_rounds() -> u32 {
    10
}

impl ModelConfig {
    /// Creates a config for the given model with all defaults.
    pub fn for_model(model_id: impl Into<String>) -> Self {
        Self {
            api_key: String::new(),
            model_id: model_id.into(),
            api_base_url: None,
            streaming: default_streaming(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_rounds: default_max_rounds(),
        }
    }

    /// The effective endpoint base URL.
    pub fn base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or("https://api.openai.com")
    }

    /// Fails with [`ScoutError::MissingCredential`] if no API key is set.
    ///
    /// Checked before any external call is attempted, so a blocked turn
    /// never reaches the network.
    pub fn require_credential(&self) -> ScoutResult<()> {
        if self.api_key.trim().is_empty() {
            Err(ScoutError::MissingCredential)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_defaults_to_openai() {
        let config = ModelConfig::for_model("gpt-4o-mini");
        assert_eq!(config.base_url(), "https://api.openai.com");
    }

    #[test]
    fn base_url_override_wins() {
        let mut config = ModelConfig::for_model("llama3-70b");
        config.api_base_url = Some("http://localhost:8080".to_string());
        assert_eq!(config.base_url(), "http://localhost:8080");
    }

    #[test]
    fn missing_credential_is_detected() {
        let mut config = ModelConfig::for_model("gpt-4o-mini");
        assert!(matches!(
            config.require_credential(),
            Err(scout_core::ScoutError::MissingCredential)
        ));

        config.api_key = "   ".to_string();
        assert!(config.require_credential().is_err());

        config.api_key = "sk-test".to_string();
        assert!(config.require_credential().is_ok());
    }

    #[test]
    fn deserialization_fills_defaults() {
        let json = serde_json::json!({"model_id": "gpt-4o-mini"});
        let config: ModelConfig = serde_json::from_value(json).unwrap();
        assert!(config.streaming);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 4096);
        assert_eq!(config.max_rounds, 10);
        assert!(config.api_key.is_empty());
        assert!(config.api_base_url.is_none());
    }
}
