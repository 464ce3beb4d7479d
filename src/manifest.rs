//! Maven manifest dependency extraction
//!
//! Reads the `<project><dependencies>` section of a `pom.xml` into a flat list
//! of [`DependencyRecord`]s. Parse problems never abort a migration: they are
//! logged and the caller continues with no known original dependencies.

use crate::dependency::DependencyRecord;
use roxmltree::{Document, Node};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Name of the manifest looked up at the legacy project root
pub const MANIFEST_FILE: &str = "pom.xml";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed manifest XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Manifest root element is <{0}>, expected <project>")]
    NotAProject(String),

    #[error("Manifest has no <dependencies> section")]
    MissingDependencies,

    #[error("Dependency #{index} is missing <{field}>")]
    MissingField { index: usize, field: &'static str },
}

/// Parses the manifest text, failing on any structural problem
pub fn parse_dependencies(content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
    let doc = Document::parse(content)?;
    let root = doc.root_element();

    if !root.has_tag_name("project") {
        return Err(ManifestError::NotAProject(
            root.tag_name().name().to_string(),
        ));
    }

    // Only the project's own <dependencies>, not <dependencyManagement> or plugins
    let section = root
        .children()
        .find(|n| n.has_tag_name("dependencies"))
        .ok_or(ManifestError::MissingDependencies)?;

    section
        .children()
        .filter(|n| n.has_tag_name("dependency"))
        .enumerate()
        .map(|(index, node)| {
            let group = child_text(node, "groupId").ok_or(ManifestError::MissingField {
                index,
                field: "groupId",
            })?;
            let artifact = child_text(node, "artifactId").ok_or(ManifestError::MissingField {
                index,
                field: "artifactId",
            })?;

            let mut record = DependencyRecord::new(group, artifact);
            record.version = child_text(node, "version");
            if let Some(scope) = child_text(node, "scope") {
                record.scope = scope;
            }
            Ok(record)
        })
        .collect()
}

/// Lenient variant: logs the failure and returns an empty list
pub fn extract_dependencies(content: &str) -> Vec<DependencyRecord> {
    match parse_dependencies(content) {
        Ok(deps) => {
            debug!(count = deps.len(), "Parsed manifest dependencies");
            deps
        }
        Err(e) => {
            warn!(error = %e, "Failed to extract Maven dependencies, continuing without them");
            Vec::new()
        }
    }
}

/// Reads `<project_root>/pom.xml` and extracts its dependencies
///
/// A missing or unreadable manifest is treated like a malformed one.
pub fn extract_project_dependencies(project_root: &Path) -> Vec<DependencyRecord> {
    let path = project_root.join(MANIFEST_FILE);
    match std::fs::read_to_string(&path) {
        Ok(content) => extract_dependencies(&content),
        Err(source) => {
            let e = ManifestError::Read {
                path: path.display().to_string(),
                source,
            };
            warn!(error = %e, "Failed to extract Maven dependencies, continuing without them");
            Vec::new()
        }
    }
}

fn child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    node.children()
        .find(|c| c.has_tag_name(tag))
        .and_then(|c| c.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
