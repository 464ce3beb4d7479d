use super::error::BackendError;
use super::types::{LLMRequest, LLMResponse};
use async_trait::async_trait;

/// A chat-completion backend the rewriter can talk to
///
/// Implementations must be shareable across tasks. A returned error means the
/// call itself failed; an unhelpful reply is still `Ok`.
#[async_trait]
pub trait LLMClient: Send + Sync {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError>;

    /// Provider name used in logs
    fn name(&self) -> &str;

    fn model_info(&self) -> Option<String> {
        None
    }

    /// `name` plus the model when known, e.g. `OpenAI/gpt-4o`
    fn describe(&self) -> String {
        match self.model_info() {
            Some(model) => format!("{}/{}", self.name(), model),
            None => self.name().to_string(),
        }
    }
}
