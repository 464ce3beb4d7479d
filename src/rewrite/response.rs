//! Interpreting rewrite collaborator replies

use crate::dependency::DependencyRecord;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
}

/// Rewritten source plus the libraries it now needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    pub rewritten_code: String,
    pub new_dependencies: Vec<DependencyRecord>,
}

impl RewriteResult {
    /// Degraded result: the whole reply is taken as code
    pub fn raw(content: impl Into<String>) -> Self {
        Self {
            rewritten_code: content.into(),
            new_dependencies: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RewriteReply {
    code: String,
    #[serde(default)]
    new_dependencies: Option<Vec<serde_json::Value>>,
}

/// Parses a `{ code, newDependencies }` reply
///
/// Individual dependency entries that lack coordinates are dropped with a
/// warning; only a reply that is not the expected object is an error.
pub fn parse_rewrite_response(content: &str) -> Result<RewriteResult, ResponseError> {
    let reply: RewriteReply = serde_json::from_str(content.trim()).map_err(|e| {
        ResponseError::InvalidJson(format!(
            "{}: {}",
            e,
            content.chars().take(100).collect::<String>()
        ))
    })?;

    let new_dependencies = reply
        .new_dependencies
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<DependencyRecord>(value) {
            Ok(dep) if !dep.group.is_empty() && !dep.artifact.is_empty() => Some(dep),
            Ok(dep) => {
                warn!(dependency = %dep, "Ignoring dependency suggestion with blank coordinates");
                None
            }
            Err(e) => {
                warn!(error = %e, "Ignoring malformed dependency suggestion");
                None
            }
        })
        .collect();

    Ok(RewriteResult {
        rewritten_code: reply.code,
        new_dependencies,
    })
}

/// Like [`parse_rewrite_response`], falling back to [`RewriteResult::raw`]
pub fn interpret_rewrite_response(content: &str) -> RewriteResult {
    match parse_rewrite_response(content) {
        Ok(result) => result,
        Err(e) => {
            warn!(error = %e, "Rewrite reply is not structured JSON, using raw text as code");
            RewriteResult::raw(content)
        }
    }
}

/// Removes a surrounding markdown code fence (```xml or ```) if present
pub fn strip_code_fence(content: &str) -> String {
    let trimmed = content.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    let body = match trimmed.find('\n') {
        Some(newline) => &trimmed[newline + 1..],
        None => "",
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_reply() {
        let reply = r#"{
            "code": "package com.old;\nrecord Foo() {}",
            "newDependencies": [
                {"groupId": "org.slf4j", "artifactId": "slf4j-api", "version": "2.0.9", "description": "logging"}
            ]
        }"#;

        let result = parse_rewrite_response(reply).unwrap();

        assert!(result.rewritten_code.starts_with("package com.old;"));
        assert_eq!(result.new_dependencies.len(), 1);
        assert_eq!(result.new_dependencies[0].identity_key(), "org.slf4j:slf4j-api");
        assert_eq!(result.new_dependencies[0].scope, "compile");
    }

    #[test]
    fn test_missing_or_null_dependencies_is_empty() {
        let result = parse_rewrite_response(r#"{"code":"class A {}"}"#).unwrap();
        assert!(result.new_dependencies.is_empty());

        let result =
            parse_rewrite_response(r#"{"code":"class A {}","newDependencies":null}"#).unwrap();
        assert!(result.new_dependencies.is_empty());
    }

    #[test]
    fn test_malformed_reply_falls_back_to_raw_text() {
        let raw = "Sure! Here is your code:\npublic class Foo {}";
        let result = interpret_rewrite_response(raw);

        assert_eq!(result.rewritten_code, raw);
        assert!(result.new_dependencies.is_empty());
    }

    #[test]
    fn test_json_without_code_falls_back() {
        let raw = r#"{"newDependencies": []}"#;
        assert!(parse_rewrite_response(raw).is_err());
        assert_eq!(interpret_rewrite_response(raw).rewritten_code, raw);
    }

    #[test]
    fn test_incomplete_dependency_entries_are_dropped() {
        let reply = r#"{"code":"x","newDependencies":[
            {"groupId":"a","artifactId":"b"},
            {"groupId":"only-group"},
            {"groupId":"","artifactId":"blank"},
            "not an object"
        ]}"#;

        let result = parse_rewrite_response(reply).unwrap();

        assert_eq!(result.new_dependencies.len(), 1);
        assert_eq!(result.new_dependencies[0].identity_key(), "a:b");
    }

    #[test]
    fn test_loosely_typed_dependency_fields_are_kept() {
        let reply = r#"{"code":"x","newDependencies":[
            {"groupId":"com.h2database","artifactId":"h2","version":2.2,"scope":null},
            {"groupId":"org.projectlombok","artifactId":"lombok","version":null,"description":null}
        ]}"#;

        let result = parse_rewrite_response(reply).unwrap();

        assert_eq!(result.new_dependencies.len(), 2);
        assert_eq!(result.new_dependencies[0].version.as_deref(), Some("2.2"));
        assert_eq!(result.new_dependencies[0].scope, "compile");
        assert!(result.new_dependencies[1].description.is_none());
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```xml\n<project/>\n```"), "<project/>");
        assert_eq!(strip_code_fence("```\n<project/>\n```\n"), "<project/>");
        assert_eq!(strip_code_fence("  <project/>  "), "<project/>");
        assert_eq!(strip_code_fence("```"), "");
    }
}
