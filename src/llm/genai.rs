//! Rewrite collaborator backed by the `genai` crate
//!
//! One client type covers every provider genai knows about (OpenAI, Ollama,
//! Anthropic, Gemini, xAI, Groq, ...). Credentials come from the provider's
//! usual environment variable, e.g. `OPENAI_API_KEY`.

use super::client::LLMClient;
use super::error::BackendError;
use super::types::{ChatMessage, LLMRequest, LLMResponse, MessageRole};
use async_trait::async_trait;
use genai::adapter::AdapterKind;
use genai::chat::{
    ChatMessage as GenAIChatMessage, ChatOptions, ChatRequest as GenAIChatRequest,
    ChatResponseFormat,
};
use genai::resolver::{AuthData, Endpoint, ServiceTargetResolver};
use genai::{Client, ModelIden, ServiceTarget};
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// Overrides the provider's endpoint, e.g. for an OpenAI-compatible proxy
pub const API_BASE_URL_ENV: &str = "SPRINGSHIFT_API_BASE_URL";

pub struct GenAIClient {
    client: Client,
    model: String,
    provider: AdapterKind,
    timeout: Duration,
}

impl GenAIClient {
    pub async fn new(
        provider: AdapterKind,
        model: String,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = match std::env::var(API_BASE_URL_ENV).ok().filter(|u| !u.is_empty()) {
            Some(base_url) => {
                debug!(provider = provider.as_str(), endpoint = %base_url, "Using custom LLM endpoint");
                Client::builder()
                    .with_service_target_resolver(endpoint_resolver(provider, &model, base_url))
                    .build()
            }
            None => Client::default(),
        };

        debug!(
            provider = provider.as_str(),
            model = %model,
            timeout_secs = timeout.as_secs(),
            "Created GenAI client"
        );

        Ok(Self {
            client,
            model,
            provider,
            timeout,
        })
    }

    async fn exec(&self, request: &LLMRequest) -> Result<String, BackendError> {
        let chat = GenAIChatRequest::new(convert_messages(&request.messages));
        let options = chat_options(request);

        let call = self.client.exec_chat(&self.model, chat, Some(&options));
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(response)) => Ok(response.first_text().unwrap_or_default().to_string()),
            Ok(Err(e)) => {
                error!(provider = self.provider.as_str(), error = %e, "LLM request failed");
                Err(BackendError::ApiError {
                    message: format!("{} request failed: {}", self.provider.as_str(), e),
                    status_code: None,
                })
            }
            Err(_) => {
                error!(
                    provider = self.provider.as_str(),
                    seconds = self.timeout.as_secs(),
                    "LLM request timed out"
                );
                Err(BackendError::TimeoutError {
                    seconds: self.timeout.as_secs(),
                })
            }
        }
    }
}

#[async_trait]
impl LLMClient for GenAIClient {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError> {
        let start = Instant::now();
        let response = LLMResponse::text(self.exec(&request).await?, start.elapsed());

        if response.is_empty() {
            warn!(provider = self.provider.as_str(), "LLM returned an empty reply");
        }

        Ok(response)
    }

    fn name(&self) -> &str {
        self.provider.as_str()
    }

    fn model_info(&self) -> Option<String> {
        Some(self.model.clone())
    }
}

impl std::fmt::Debug for GenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAIClient")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Sends every request to `base_url`, keeping the provider's auth variable
fn endpoint_resolver(provider: AdapterKind, model: &str, base_url: String) -> ServiceTargetResolver {
    let model = model.to_string();
    ServiceTargetResolver::from_resolver_fn(
        move |_target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
            let auth = match provider.default_key_env_name() {
                Some(key_var) => AuthData::from_env(key_var),
                None => AuthData::from_single(""),
            };
            Ok(ServiceTarget {
                endpoint: Endpoint::from_owned(base_url.clone()),
                auth,
                model: ModelIden::new(provider, &model),
            })
        },
    )
}

fn convert_messages(messages: &[ChatMessage]) -> Vec<GenAIChatMessage> {
    messages
        .iter()
        .map(|msg| match msg.role {
            MessageRole::System => GenAIChatMessage::system(&msg.content),
            MessageRole::User => GenAIChatMessage::user(&msg.content),
            MessageRole::Assistant => GenAIChatMessage::assistant(&msg.content),
        })
        .collect()
}

fn chat_options(request: &LLMRequest) -> ChatOptions {
    let mut options = ChatOptions::default();
    if let Some(temperature) = request.temperature {
        options = options.with_temperature(temperature as f64);
    }
    if let Some(max_tokens) = request.max_tokens {
        options = options.with_max_tokens(max_tokens);
    }
    if request.json_mode {
        options = options.with_response_format(ChatResponseFormat::JsonMode);
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_client_reports_provider_and_model() {
        std::env::remove_var(API_BASE_URL_ENV);
        let client = GenAIClient::new(
            AdapterKind::OpenAI,
            "gpt-4o".to_string(),
            Duration::from_secs(30),
        )
        .await
        .unwrap();

        assert_eq!(client.name(), AdapterKind::OpenAI.as_str());
        assert_eq!(client.model_info(), Some("gpt-4o".to_string()));
    }

    #[tokio::test]
    #[serial]
    async fn test_client_with_custom_endpoint() {
        std::env::set_var(API_BASE_URL_ENV, "http://localhost:8080/v1/");
        let result = GenAIClient::new(
            AdapterKind::Ollama,
            "qwen2.5-coder:7b".to_string(),
            Duration::from_secs(5),
        )
        .await;
        std::env::remove_var(API_BASE_URL_ENV);

        let client = result.unwrap();
        assert!(format!("{:?}", client).contains("qwen2.5-coder:7b"));
    }

    #[test]
    fn test_convert_messages_keeps_order() {
        let messages = vec![
            ChatMessage::system("rules"),
            ChatMessage::user("code"),
            ChatMessage::assistant("reply"),
        ];
        assert_eq!(convert_messages(&messages).len(), 3);
    }
}
