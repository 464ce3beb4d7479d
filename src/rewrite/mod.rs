//! Per-file code rewriting through the LLM collaborator
//!
//! [`CodeRewriter`] sends one source file at a time to an [`LLMClient`] and
//! interprets the reply. A reply that does not match the expected
//! `{ code, newDependencies }` shape degrades to "raw text is the code" rather
//! than failing the run; transport errors from the client are returned as-is.

mod accumulator;
mod prompt;
mod response;

pub use accumulator::DependencyAccumulator;
pub use prompt::{pom_update_prompt, rewrite_prompt, POM_SYSTEM_PROMPT, REWRITE_SYSTEM_PROMPT};
pub use response::{
    interpret_rewrite_response, parse_rewrite_response, strip_code_fence, ResponseError,
    RewriteResult,
};

use crate::dependency::DependencyRecord;
use crate::llm::{BackendError, ChatMessage, LLMClient, LLMRequest};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Low temperature keeps rewrites close to the original code
pub const REWRITE_TEMPERATURE: f32 = 0.1;

/// Everything the collaborator is told about one file
#[derive(Debug, Clone, Copy)]
pub struct RewriteInput<'a> {
    pub source: &'a str,
    /// Path relative to the legacy project root
    pub relative_path: &'a Path,
    pub target_version: &'a str,
    pub project_dependencies: &'a [DependencyRecord],
}

pub struct CodeRewriter {
    client: Arc<dyn LLMClient>,
    temperature: f32,
}

impl CodeRewriter {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self {
            client,
            temperature: REWRITE_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Backend and model, for logs
    pub fn client_description(&self) -> String {
        self.client.describe()
    }

    /// Calls the collaborator exactly once for this file
    pub async fn rewrite(&self, input: RewriteInput<'_>) -> Result<RewriteResult, BackendError> {
        let file_name = input
            .relative_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| input.relative_path.display().to_string());

        let request = LLMRequest::new(vec![
            ChatMessage::system(REWRITE_SYSTEM_PROMPT),
            ChatMessage::user(rewrite_prompt(
                &file_name,
                input.source,
                input.target_version,
                input.project_dependencies,
            )),
        ])
        .with_temperature(self.temperature)
        .with_json_mode();

        let response = self.client.chat(request).await?;
        debug!(
            file = %input.relative_path.display(),
            response_ms = response.response_time.as_millis() as u64,
            chars = response.content.len(),
            "Received rewrite reply"
        );

        Ok(interpret_rewrite_response(&response.content))
    }

    /// Asks the collaborator for an updated pom.xml
    ///
    /// Returns the original pom when the reply is empty.
    pub async fn update_pom(
        &self,
        pom_xml: &str,
        dependencies: &[DependencyRecord],
    ) -> Result<String, BackendError> {
        let request = LLMRequest::new(vec![
            ChatMessage::system(POM_SYSTEM_PROMPT),
            ChatMessage::user(pom_update_prompt(pom_xml, dependencies)),
        ])
        .with_temperature(self.temperature);

        let response = self.client.chat(request).await?;
        let updated = strip_code_fence(&response.content);

        if updated.is_empty() {
            warn!("Empty pom.xml update reply, keeping the generated pom.xml");
            return Ok(pom_xml.to_string());
        }

        Ok(updated)
    }
}

impl std::fmt::Debug for CodeRewriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeRewriter")
            .field("client", &self.client.name())
            .field("temperature", &self.temperature)
            .finish()
    }
}
