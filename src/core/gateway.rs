use crate::domain::model::GenerationConfig;
use crate::domain::ports::TextGenerator;
use crate::utils::error::GatewayError;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Wraps a [`TextGenerator`] in a wall-clock timeout race. Exactly one
/// attempt per call, no retries; a timed-out call is abandoned by dropping
/// its future, so a late response can never complete an already-failed call.
pub struct ModelGateway<G: TextGenerator> {
    generator: G,
    timeout: Duration,
}

impl<G: TextGenerator> ModelGateway<G> {
    pub fn new(generator: G) -> Self {
        Self::with_timeout(generator, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(generator: G, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    pub fn model_name(&self) -> &str {
        self.generator.model_name()
    }

    pub async fn generate(
        &self,
        instruction: &str,
        payload: &str,
        config: &GenerationConfig,
    ) -> Result<String, GatewayError> {
        let call = self.generator.generate(instruction, payload, config);
        match tokio::time::timeout(self.timeout, call).await {
            Err(_) => {
                tracing::warn!("model call exceeded {:?}, abandoning", self.timeout);
                Err(GatewayError::Timeout(self.timeout))
            }
            Ok(Err(err)) => {
                tracing::warn!("model call failed: {}", err);
                Err(err)
            }
            Ok(Ok(text)) if text.trim().is_empty() => Err(GatewayError::EmptyResponse),
            Ok(Ok(text)) => Ok(text),
        }
    }
}
