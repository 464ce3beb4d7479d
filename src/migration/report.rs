//! Markdown summary of original and newly detected dependencies

use crate::dependency::DependencyRecord;
use std::fmt::Write;

pub const REPORT_FILE: &str = "dependencies-report.md";

pub fn render_dependency_report(
    original: &[DependencyRecord],
    detected: &[DependencyRecord],
) -> String {
    let mut out = String::from("# Dependency Report\n\n");

    out.push_str("## Original Dependencies\n\n");
    if original.is_empty() {
        out.push_str("_None found._\n");
    }
    for dep in original {
        let _ = writeln!(out, "- **{}**", dep);
        if !dep.scope.is_empty() {
            let _ = writeln!(out, "  - Scope: {}", dep.scope);
        }
    }

    out.push_str("\n## Newly Detected Dependencies\n\n");
    if detected.is_empty() {
        out.push_str("_None detected._\n");
    }
    for dep in detected {
        let _ = writeln!(
            out,
            "- **{}:{}:{}**",
            dep.group,
            dep.artifact,
            dep.version.as_deref().unwrap_or("latest")
        );
        if let Some(description) = dep.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "  - {}", description);
        }
    }

    out
}
