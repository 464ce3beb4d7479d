//! Output formatting for migration outcomes and project catalogs
//!
//! JSON and YAML render the serialized structs as-is. The human format uses
//! box-drawing characters for a compact terminal summary.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::catalog::ProjectStructure;
use crate::migration::MigrationOutcome;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Machine-readable
    Json,
    Yaml,
    /// Terminal summary
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_outcome(&self, outcome: &MigrationOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(outcome, "migration outcome"),
            OutputFormat::Yaml => to_yaml(outcome, "migration outcome"),
            OutputFormat::Human => Ok(self.format_outcome_human(outcome)),
        }
    }

    pub fn format_structure(&self, structure: &ProjectStructure) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(structure, "project structure"),
            OutputFormat::Yaml => to_yaml(structure, "project structure"),
            OutputFormat::Human => Ok(self.format_structure_human(structure)),
        }
    }

    /// Machine formats get `{"success": false, "error": ...}`; human output a single line
    pub fn format_error(&self, kind: &str, message: &str) -> Result<String> {
        let body = serde_json::json!({
            "success": false,
            "errorKind": kind,
            "error": message,
        });
        match self.format {
            OutputFormat::Json => to_json(&body, "error"),
            OutputFormat::Yaml => to_yaml(&body, "error"),
            OutputFormat::Human => Ok(format!("\u{2717} Migration failed ({}): {}\n", kind, message)),
        }
    }

    fn format_outcome_human(&self, outcome: &MigrationOutcome) -> String {
        let mut output = String::new();

        let symbol = if outcome.success { "\u{2713}" } else { "\u{2717}" };
        output.push_str(&format!("{} Migration Result\n", symbol));
        output.push_str(RULE);
        output.push_str("\n\n");

        output.push_str(&format!(
            "\u{251C}\u{2500} Output:          {}\n",
            outcome.output_path.display()
        ));
        output.push_str(&format!(
            "\u{2514}\u{2500} Migrated files:  {}\n",
            outcome.migrated_file_count
        ));

        output
    }

    fn format_structure_human(&self, structure: &ProjectStructure) -> String {
        let mut output = String::new();

        output.push_str("Legacy Project Catalog\n");
        output.push_str(RULE);
        output.push_str("\n\n");
        output.push_str(&format!("Root: {}\n\n", structure.root.display()));

        output.push_str(&format!("Sources ({}):\n", structure.files.len()));
        if structure.files.is_empty() {
            output.push_str("\u{2514}\u{2500} (none found)\n");
        }
        for (i, file) in structure.files.iter().enumerate() {
            let connector = tree_connector(i, structure.files.len());
            output.push_str(&format!(
                "{}\u{2500} {}  [{}] {} import(s)\n",
                connector,
                display_relative(&file.path, &structure.root),
                file.declared_package.as_deref().unwrap_or("(default package)"),
                file.imports.len()
            ));
        }

        output.push_str(&format!(
            "\nDependencies ({}):\n",
            structure.dependencies.len()
        ));
        if structure.dependencies.is_empty() {
            output.push_str("\u{2514}\u{2500} (none declared)\n");
        }
        for (i, dep) in structure.dependencies.iter().enumerate() {
            let connector = tree_connector(i, structure.dependencies.len());
            output.push_str(&format!("{}\u{2500} {} ({})\n", connector, dep, dep.scope));
        }

        output
    }
}

fn tree_connector(index: usize, len: usize) -> &'static str {
    if index + 1 == len {
        "\u{2514}"
    } else {
        "\u{251C}"
    }
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

fn to_json<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<String> {
    serde_json::to_string_pretty(value).with_context(|| format!("Failed to serialize {} to JSON", what))
}

fn to_yaml<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<String> {
    serde_yaml::to_string(value).with_context(|| format!("Failed to serialize {} to YAML", what))
}
