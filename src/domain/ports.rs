use crate::domain::model::GenerationConfig;
use crate::utils::error::GatewayError;
use async_trait::async_trait;

/// Seam to the external generative-text service. One single-shot completion
/// per call; implementations normalize transport failures into
/// `GatewayError::Transport` instead of letting them escape.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        instruction: &str,
        payload: &str,
        config: &GenerationConfig,
    ) -> Result<String, GatewayError>;

    /// Model identifier reported back in results (e.g. "gemini-2.5-flash").
    fn model_name(&self) -> &str;
}
