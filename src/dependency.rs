//! Build dependency records
//!
//! A [`DependencyRecord`] is produced either by parsing the legacy project's
//! manifest or by the rewrite collaborator suggesting a new library. The wire
//! names (`groupId`, `artifactId`) match Maven coordinates so the same type is
//! used for the manifest, the LLM reply, and the dependency report.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Scope assigned when a declaration does not name one
pub const DEFAULT_SCOPE: &str = "compile";

fn default_scope() -> String {
    DEFAULT_SCOPE.to_string()
}

/// Scalar an LLM may emit where a string is expected, e.g. `"version": 2`
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(text) => text,
            Scalar::Number(number) => number.to_string(),
            Scalar::Bool(flag) => flag.to_string(),
        }
    }
}

/// Accepts null, strings, numbers and booleans; blank text becomes `None`
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(Scalar::into_text)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty()))
}

fn lenient_scope<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_else(default_scope))
}

/// One Maven-style dependency coordinate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    #[serde(rename = "groupId", alias = "group")]
    pub group: String,

    #[serde(rename = "artifactId", alias = "artifact")]
    pub artifact: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub version: Option<String>,

    #[serde(default = "default_scope", deserialize_with = "lenient_scope")]
    pub scope: String,

    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

impl DependencyRecord {
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: None,
            scope: default_scope(),
            description: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// `group:artifact`, the key used for de-duplication
    pub fn identity_key(&self) -> String {
        format!("{}:{}", self.group, self.artifact)
    }
}

impl fmt::Display for DependencyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}:{}:{}", self.group, self.artifact, version),
            None => write!(f, "{}:{}", self.group, self.artifact),
        }
    }
}
