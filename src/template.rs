//! Project skeleton acquisition
//!
//! The Spring Initializr service generates a zipped Maven project from a set
//! of query parameters. [`TemplateSource`] abstracts it so migrations can run
//! against a local archive in tests.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_TEMPLATE_URL: &str = "https://start.spring.io/starter.zip";
pub const DEFAULT_BOOT_VERSION: &str = "3.2.0";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Template service returned HTTP {status} for {url}")]
    Status { status: StatusCode, url: String },

    #[error("Template service returned an empty archive")]
    EmptyArchive,
}

/// Metadata describing the project skeleton to generate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRequest {
    pub project_name: String,
    pub group_id: String,
    pub package_name: String,
    pub description: String,
    pub java_version: String,
    pub boot_version: String,
    /// Initializr dependency ids such as `web` or `data-jpa`
    pub features: Vec<String>,
}

impl TemplateRequest {
    /// Splits a comma-separated feature list, dropping blanks
    pub fn parse_features(spec: &str) -> Vec<String> {
        spec.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Query parameters understood by Spring Initializr
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("type", "maven-project".to_string()),
            ("language", "java".to_string()),
            ("bootVersion", self.boot_version.clone()),
            ("baseDir", self.project_name.clone()),
            ("groupId", self.group_id.clone()),
            ("artifactId", self.project_name.clone()),
            ("name", self.project_name.clone()),
            ("description", self.description.clone()),
            ("packageName", self.package_name.clone()),
            ("packaging", "jar".to_string()),
            ("javaVersion", self.java_version.clone()),
            ("dependencies", self.features.join(",")),
        ]
    }
}

/// Source of zipped project skeletons
#[async_trait]
pub trait TemplateSource: Send + Sync {
    /// Returns the raw zip archive for `request`
    async fn fetch(&self, request: &TemplateRequest) -> Result<Vec<u8>, TemplateError>;

    fn name(&self) -> &str;
}

/// HTTP client for a Spring Initializr instance
#[derive(Debug, Clone)]
pub struct SpringInitializr {
    client: reqwest::Client,
    base_url: String,
}

impl SpringInitializr {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TemplateError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TemplateSource for SpringInitializr {
    async fn fetch(&self, request: &TemplateRequest) -> Result<Vec<u8>, TemplateError> {
        info!(
            url = %self.base_url,
            project = %request.project_name,
            boot_version = %request.boot_version,
            features = %request.features.join(","),
            "Requesting Spring Boot template"
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&request.query_pairs())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TemplateError::Status {
                status,
                url: response.url().to_string(),
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(TemplateError::EmptyArchive);
        }

        debug!(bytes = bytes.len(), "Downloaded template archive");
        Ok(bytes.to_vec())
    }

    fn name(&self) -> &str {
        "spring-initializr"
    }
}
