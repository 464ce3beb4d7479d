//! Configuration loaded from environment variables
//!
//! # Environment Variables
//!
//! - `SPRINGSHIFT_PROVIDER`: genai adapter (openai|ollama|anthropic|gemini|xai|groq) - default: "openai"
//! - `SPRINGSHIFT_MODEL`: model name - default: "gpt-4o" for OpenAI, "qwen2.5-coder:7b" for Ollama
//! - `SPRINGSHIFT_REQUEST_TIMEOUT`: LLM and template request timeout in seconds - default: "120"
//! - `SPRINGSHIFT_TEMPLATE_URL`: Spring Initializr archive endpoint - default: "https://start.spring.io/starter.zip"
//! - `SPRINGSHIFT_BOOT_VERSION`: Spring Boot version of the skeleton - default: "3.2.0"
//! - `SPRINGSHIFT_OUTPUT_DIR`: where migrated projects are written - default: "./migrated-projects"
//! - `SPRINGSHIFT_WORK_DIR`: parent of per-run working directories - default: system temp dir
//! - `SPRINGSHIFT_UPDATE_POM`: let the LLM merge dependencies into pom.xml - default: "false"
//! - `SPRINGSHIFT_LOG_LEVEL`: logging level - default: "info"
//!
//! Provider credentials are read by genai itself (`OPENAI_API_KEY`,
//! `ANTHROPIC_API_KEY`, `OLLAMA_HOST`, ...). `SPRINGSHIFT_API_BASE_URL`
//! routes LLM calls to a custom OpenAI-compatible endpoint.
//!
//! # Example
//!
//! ```no_run
//! use springshift::MigrationConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MigrationConfig::default();
//! config.validate()?;
//! let service = config.migration_service().await?;
//! # Ok(())
//! # }
//! ```

use crate::llm::{BackendError, GenAIClient, LLMClient};
use crate::migration::MigrationService;
use crate::rewrite::CodeRewriter;
use crate::template::{
    SpringInitializr, TemplateError, TemplateSource, DEFAULT_BOOT_VERSION, DEFAULT_TEMPLATE_URL,
};
use genai::adapter::AdapterKind;
use reqwest::Url;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5-coder:7b";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

/// Directory under the current working directory that receives migrated projects
pub const DEFAULT_OUTPUT_DIR: &str = "migrated-projects";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid provider: {0}. Valid options: openai, ollama, anthropic, gemini, xai, groq")]
    InvalidProvider(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("LLM client initialization failed: {0}")]
    BackendInitError(#[from] BackendError),

    #[error("Template client initialization failed: {0}")]
    TemplateInitError(#[from] TemplateError),
}

#[derive(Debug, Clone)]
pub struct MigrationConfig {
    pub provider: AdapterKind,

    /// Provider-specific model name
    pub model: String,

    /// Applies to each LLM call and to the template download
    pub request_timeout_secs: u64,

    pub template_url: String,

    pub boot_version: String,

    pub output_dir: PathBuf,

    /// Parent of per-run working directories, system temp dir when unset
    pub work_dir: Option<PathBuf>,

    pub update_pom: bool,

    pub log_level: String,
}

impl Default for MigrationConfig {
    /// Reads `SPRINGSHIFT_*` variables, falling back to defaults for anything missing or unparseable
    fn default() -> Self {
        let provider = env::var("SPRINGSHIFT_PROVIDER")
            .ok()
            .and_then(|s| parse_provider(&s).ok())
            .unwrap_or(AdapterKind::OpenAI);

        let model = env::var("SPRINGSHIFT_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default_model(provider).to_string());

        let request_timeout_secs = env::var("SPRINGSHIFT_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let template_url = env::var("SPRINGSHIFT_TEMPLATE_URL")
            .unwrap_or_else(|_| DEFAULT_TEMPLATE_URL.to_string());

        let boot_version = env::var("SPRINGSHIFT_BOOT_VERSION")
            .unwrap_or_else(|_| DEFAULT_BOOT_VERSION.to_string());

        let output_dir = env::var("SPRINGSHIFT_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_output_dir());

        let work_dir = env::var("SPRINGSHIFT_WORK_DIR").ok().map(PathBuf::from);

        let update_pom = env::var("SPRINGSHIFT_UPDATE_POM")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        let log_level = env::var("SPRINGSHIFT_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            provider,
            model,
            request_timeout_secs,
            template_url,
            boot_version,
            output_dir,
            work_dir,
            update_pom,
            log_level,
        }
    }
}

impl MigrationConfig {
    /// Checks value ranges, the log level and the template URL
    ///
    /// Credentials are checked by genai on the first request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(format!(
                "No default model for provider {}. Set SPRINGSHIFT_MODEL",
                self.provider.as_str()
            )));
        }

        match Url::parse(&self.template_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Template URL must use http or https, got {}",
                    url.scheme()
                )))
            }
            Err(e) => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid template URL '{}': {}",
                    self.template_url, e
                )))
            }
        }

        if self.boot_version.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Boot version must not be empty".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Builds the genai-backed rewrite collaborator
    pub async fn create_client(&self) -> Result<Arc<dyn LLMClient>, ConfigError> {
        let client =
            GenAIClient::new(self.provider, self.model.clone(), self.request_timeout()).await?;
        Ok(Arc::new(client))
    }

    pub fn template_source(&self) -> Result<Arc<dyn TemplateSource>, ConfigError> {
        let source = SpringInitializr::new(self.template_url.clone(), self.request_timeout())?;
        Ok(Arc::new(source))
    }

    /// Wires the template source and rewrite collaborator into a service
    pub async fn migration_service(&self) -> Result<MigrationService, ConfigError> {
        let rewriter = CodeRewriter::new(self.create_client().await?);
        Ok(self.build_service(self.template_source()?, rewriter))
    }

    /// Applies output, working-directory and pom settings to the given collaborators
    pub fn build_service(
        &self,
        template: Arc<dyn TemplateSource>,
        rewriter: CodeRewriter,
    ) -> MigrationService {
        let service = MigrationService::new(template, rewriter, self.output_dir.clone())
            .with_boot_version(self.boot_version.clone())
            .with_pom_update(self.update_pom);

        match &self.work_dir {
            Some(dir) => service.with_work_root(dir.clone()),
            None => service,
        }
    }
}

impl fmt::Display for MigrationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Springshift Configuration:")?;
        writeln!(f, "  Provider: {}", self.provider.as_str())?;
        writeln!(f, "  Model: {}", self.model)?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Template URL: {}", self.template_url)?;
        writeln!(f, "  Boot Version: {}", self.boot_version)?;
        writeln!(f, "  Output Dir: {}", self.output_dir.display())?;
        match &self.work_dir {
            Some(dir) => writeln!(f, "  Work Dir: {}", dir.display())?,
            None => writeln!(f, "  Work Dir: (system temp)")?,
        }
        writeln!(f, "  Update pom.xml: {}", self.update_pom)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

/// Parses a genai adapter name such as `openai` or `ollama`
pub fn parse_provider(s: &str) -> Result<AdapterKind, ConfigError> {
    AdapterKind::from_lower_str(&s.trim().to_lowercase())
        .ok_or_else(|| ConfigError::InvalidProvider(s.to_string()))
}

/// Default model for a provider, empty when there is none
pub fn default_model(provider: AdapterKind) -> &'static str {
    match provider {
        AdapterKind::OpenAI => DEFAULT_OPENAI_MODEL,
        AdapterKind::Ollama => DEFAULT_OLLAMA_MODEL,
        _ => "",
    }
}

fn default_output_dir() -> PathBuf {
    env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(DEFAULT_OUTPUT_DIR)
}
