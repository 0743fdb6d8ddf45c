use crate::config::AdvisorConfig;
use crate::domain::model::GenerationConfig;
use crate::domain::ports::TextGenerator;
use crate::utils::error::GatewayError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

/// Gemini `generateContent` REST adapter. Transport failures and non-2xx
/// statuses are normalized into `GatewayError::Transport`; a parseable body
/// without any text parts becomes `GatewayError::EmptyResponse`. Timeout
/// enforcement lives in the [`ModelGateway`](crate::core::gateway::ModelGateway),
/// not here.
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &AdvisorConfig) -> Self {
        Self::with_base_url(
            config.endpoint.clone(),
            config.api_key.clone(),
            config.model.clone(),
        )
    }

    /// Base URL is injectable so tests can point the client at a local mock.
    pub fn with_base_url(base_url: String, api_key: String, model: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
            api_key,
            model,
        }
    }

    fn endpoint_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(
        &self,
        instruction: &str,
        payload: &str,
        config: &GenerationConfig,
    ) -> Result<String, GatewayError> {
        let mut generation_config = json!({
            "temperature": config.temperature,
            "maxOutputTokens": config.max_output_tokens,
            "candidateCount": 1,
        });
        if config.json_output {
            generation_config["responseMimeType"] = json!("application/json");
        }

        let body = json!({
            "contents": [{"role": "user", "parts": [{"text": payload}]}],
            "systemInstruction": {"parts": [{"text": instruction}]},
            "generationConfig": generation_config,
        });

        tracing::debug!(model = %self.model, "sending generateContent request");
        let response = self
            .http
            .post(self.endpoint_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        let status = response.status();
        tracing::debug!("generateContent response status: {}", status);
        if !status.is_success() {
            return Err(GatewayError::Transport(format!(
                "Gemini API returned HTTP {}",
                status
            )));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        let text = extract_text(&value);
        if text.trim().is_empty() {
            return Err(GatewayError::EmptyResponse);
        }
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Join the text parts of the first candidate. The response shape is treated
/// as untrusted; anything missing simply yields an empty string.
fn extract_text(value: &Value) -> String {
    value
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}
