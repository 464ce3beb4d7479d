use super::error::MigrationError;
use crate::template::TemplateRequest;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_TARGET_VERSION: &str = "21";
pub const DEFAULT_DEPENDENCY_SPEC: &str = "web,data-jpa,lombok,actuator";

fn default_target_version() -> String {
    DEFAULT_TARGET_VERSION.to_string()
}

fn default_dependency_spec() -> String {
    DEFAULT_DEPENDENCY_SPEC.to_string()
}

/// Parameters of one migration run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationRequest {
    /// Root of the legacy source tree
    pub project_path: PathBuf,

    /// Template artifact id and output directory name
    pub project_name: String,

    pub group_id: String,

    #[serde(default)]
    pub description: String,

    /// Dotted package for relocated sources, e.g. `com.example.app`
    pub package_name: String,

    #[serde(default = "default_target_version", alias = "javaVersion")]
    pub target_version: String,

    /// Comma-separated Spring Initializr feature ids
    #[serde(default = "default_dependency_spec", alias = "dependencies")]
    pub dependency_spec: String,
}

impl MigrationRequest {
    pub fn new(
        project_path: impl Into<PathBuf>,
        project_name: impl Into<String>,
        group_id: impl Into<String>,
        package_name: impl Into<String>,
    ) -> Self {
        Self {
            project_path: project_path.into(),
            project_name: project_name.into(),
            group_id: group_id.into(),
            description: String::new(),
            package_name: package_name.into(),
            target_version: default_target_version(),
            dependency_spec: default_dependency_spec(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_target_version(mut self, version: impl Into<String>) -> Self {
        self.target_version = version.into();
        self
    }

    pub fn with_dependency_spec(mut self, spec: impl Into<String>) -> Self {
        self.dependency_spec = spec.into();
        self
    }

    /// Checks the request before any work area is created
    pub fn validate(&self) -> Result<(), MigrationError> {
        if !self.project_path.exists() {
            return Err(MigrationError::InvalidRequest(format!(
                "project path does not exist: {}",
                self.project_path.display()
            )));
        }
        if !self.project_path.is_dir() {
            return Err(MigrationError::InvalidRequest(format!(
                "project path is not a directory: {}",
                self.project_path.display()
            )));
        }

        for (field, value) in [
            ("projectName", &self.project_name),
            ("groupId", &self.group_id),
            ("packageName", &self.package_name),
            ("targetVersion", &self.target_version),
        ] {
            if value.trim().is_empty() {
                return Err(MigrationError::InvalidRequest(format!(
                    "{} must not be blank",
                    field
                )));
            }
        }

        if !is_single_component(&self.project_name) {
            return Err(MigrationError::InvalidRequest(format!(
                "projectName must be a plain directory name, got '{}'",
                self.project_name
            )));
        }

        Ok(())
    }

    pub fn template_request(&self, boot_version: &str) -> TemplateRequest {
        TemplateRequest {
            project_name: self.project_name.clone(),
            group_id: self.group_id.clone(),
            package_name: self.package_name.clone(),
            description: self.description.clone(),
            java_version: self.target_version.clone(),
            boot_version: boot_version.to_string(),
            features: TemplateRequest::parse_features(&self.dependency_spec),
        }
    }
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationOutcome {
    pub success: bool,
    pub output_path: PathBuf,
    /// Rewritten source files written into the new project
    pub migrated_file_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "projectPath": "/legacy/shop",
            "projectName": "shop",
            "groupId": "com.example",
            "packageName": "com.example.shop"
        }"#;

        let request: MigrationRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.project_path, PathBuf::from("/legacy/shop"));
        assert_eq!(request.description, "");
        assert_eq!(request.target_version, DEFAULT_TARGET_VERSION);
        assert_eq!(request.dependency_spec, DEFAULT_DEPENDENCY_SPEC);
    }

    #[test]
    fn test_deserialize_accepts_aliases() {
        let json = r#"{
            "projectPath": "/legacy/shop",
            "projectName": "shop",
            "groupId": "com.example",
            "packageName": "com.example.shop",
            "javaVersion": "17",
            "dependencies": "web"
        }"#;

        let request: MigrationRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.target_version, "17");
        assert_eq!(request.dependency_spec, "web");
    }

    #[test]
    fn test_deserialize_missing_required_field() {
        let json = r#"{ "projectPath": "/legacy/shop", "projectName": "shop" }"#;
        assert!(serde_json::from_str::<MigrationRequest>(json).is_err());
    }

    #[test]
    fn test_validate_ok() {
        let dir = TempDir::new().unwrap();
        let request = MigrationRequest::new(dir.path(), "shop", "com.example", "com.example.shop");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_path() {
        let request =
            MigrationRequest::new("/nonexistent/legacy", "shop", "com.example", "com.example");
        assert!(matches!(
            request.validate(),
            Err(MigrationError::InvalidRequest(msg)) if msg.contains("does not exist")
        ));
    }

    #[test]
    fn test_validate_path_is_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("pom.xml");
        std::fs::write(&file, "<project/>").unwrap();

        let request = MigrationRequest::new(&file, "shop", "com.example", "com.example");
        assert!(matches!(
            request.validate(),
            Err(MigrationError::InvalidRequest(msg)) if msg.contains("not a directory")
        ));
    }

    #[test]
    fn test_validate_blank_fields() {
        let dir = TempDir::new().unwrap();
        let request = MigrationRequest::new(dir.path(), "shop", "  ", "com.example");
        assert!(matches!(
            request.validate(),
            Err(MigrationError::InvalidRequest(msg)) if msg.contains("groupId")
        ));
    }

    #[test]
    fn test_validate_project_name_is_single_component() {
        let dir = TempDir::new().unwrap();
        for name in ["../escape", "a/b", "a\\b", "..", "."] {
            let request = MigrationRequest::new(dir.path(), name, "com.example", "com.example");
            assert!(request.validate().is_err(), "accepted '{}'", name);
        }
    }

    #[test]
    fn test_template_request() {
        let request = MigrationRequest::new("/legacy", "shop", "com.example", "com.example.shop")
            .with_description("Shop")
            .with_target_version("17")
            .with_dependency_spec("web, lombok");

        let template = request.template_request("3.2.0");

        assert_eq!(template.project_name, "shop");
        assert_eq!(template.java_version, "17");
        assert_eq!(template.boot_version, "3.2.0");
        assert_eq!(template.features, vec!["web", "lombok"]);
        assert_eq!(template.description, "Shop");
    }

    #[test]
    fn test_outcome_serializes_camel_case() {
        let outcome = MigrationOutcome {
            success: true,
            output_path: PathBuf::from("/out/shop"),
            migrated_file_count: 3,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["outputPath"], "/out/shop");
        assert_eq!(json["migratedFileCount"], 3);
    }
}
