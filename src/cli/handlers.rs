//! Subcommand handlers, each returning the process exit code

use super::commands::{AnalyzeArgs, MigrateArgs, OutputFormatArg};
use super::output::OutputFormatter;
use crate::catalog::analyze_project;
use crate::config::{default_model, MigrationConfig};
use crate::migration::MigrationRequest;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tracing::{debug, error};

pub async fn handle_migrate(args: &MigrateArgs, quiet: bool) -> i32 {
    let formatter = OutputFormatter::new(args.format.into());

    let request = match build_request(args) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return 1;
        }
    };

    let config = apply_overrides(MigrationConfig::default(), args);
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return 1;
    }
    debug!("{}", config);

    let service = match config.migration_service().await {
        Ok(service) => service,
        Err(e) => {
            error!(error = %e, "Failed to initialize migration service");
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    match service.migrate(&request).await {
        Ok(outcome) => match formatter.format_outcome(&outcome) {
            Ok(output) => {
                if !quiet || args.format != OutputFormatArg::Human {
                    print!("{}", output);
                }
                0
            }
            Err(e) => {
                eprintln!("Error: {:#}", e);
                1
            }
        },
        Err(e) => {
            match formatter.format_error(e.kind(), &e.to_string()) {
                Ok(output) if args.format != OutputFormatArg::Human => {
                    print!("{}", output)
                }
                Ok(output) => eprint!("{}", output),
                Err(fmt_err) => eprintln!("Error: {} ({:#})", e, fmt_err),
            }
            1
        }
    }
}

pub async fn handle_analyze(args: &AnalyzeArgs) -> i32 {
    let formatter = OutputFormatter::new(args.format.into());
    let path = args
        .project_path
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let result = tokio::task::spawn_blocking(move || analyze_project(&path)).await;
    let structure = match result {
        Ok(Ok(structure)) => structure,
        Ok(Err(e)) => {
            eprintln!("Error: {}", e);
            return 1;
        }
        Err(e) => {
            eprintln!("Error: analysis task failed: {}", e);
            return 1;
        }
    };

    match formatter.format_structure(&structure) {
        Ok(output) => {
            print!("{}", output);
            0
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

/// Request from `--request` (if any) with explicit flags layered on top
fn build_request(args: &MigrateArgs) -> Result<MigrationRequest> {
    let mut request = match &args.request {
        Some(file) => {
            let content = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read request file {}", file.display()))?;
            serde_json::from_str::<MigrationRequest>(&content)
                .with_context(|| format!("Invalid request file {}", file.display()))?
        }
        None => {
            let mut missing = Vec::new();
            if args.project_path.is_none() {
                missing.push("PATH");
            }
            if args.name.is_none() {
                missing.push("--name");
            }
            if args.group_id.is_none() {
                missing.push("--group-id");
            }
            if args.package_name.is_none() {
                missing.push("--package");
            }
            if !missing.is_empty() {
                bail!(
                    "Missing required arguments: {} (or pass --request FILE)",
                    missing.join(", ")
                );
            }

            MigrationRequest::new(
                args.project_path.clone().unwrap_or_default(),
                args.name.clone().unwrap_or_default(),
                args.group_id.clone().unwrap_or_default(),
                args.package_name.clone().unwrap_or_default(),
            )
            .with_target_version(args.java_version_or_default())
            .with_dependency_spec(args.features_or_default())
        }
    };

    if let Some(path) = &args.project_path {
        request.project_path = path.clone();
    }
    if let Some(name) = &args.name {
        request.project_name = name.clone();
    }
    if let Some(group_id) = &args.group_id {
        request.group_id = group_id.clone();
    }
    if let Some(package_name) = &args.package_name {
        request.package_name = package_name.clone();
    }
    if let Some(description) = &args.description {
        request.description = description.clone();
    }
    if let Some(version) = &args.java_version {
        request.target_version = version.clone();
    }
    if let Some(features) = &args.features {
        request.dependency_spec = features.clone();
    }

    Ok(request)
}

fn apply_overrides(mut config: MigrationConfig, args: &MigrateArgs) -> MigrationConfig {
    if let Some(provider) = args.backend {
        if provider != config.provider {
            config.model = default_model(provider).to_string();
        }
        config.provider = provider;
    }
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = timeout;
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if args.update_pom {
        config.update_pom = true;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::{CliArgs, Commands};
    use clap::Parser;
    use genai::adapter::AdapterKind;
    use tempfile::TempDir;

    fn migrate_args(argv: &[&str]) -> MigrateArgs {
        let mut full = vec!["springshift", "migrate"];
        full.extend_from_slice(argv);
        match CliArgs::parse_from(full).command {
            Commands::Migrate(args) => args,
            _ => panic!("Expected Migrate command"),
        }
    }

    #[test]
    fn test_build_request_from_flags() {
        let args = migrate_args(&[
            "/legacy",
            "--name",
            "shop",
            "--group-id",
            "com.example",
            "--package",
            "com.example.shop",
            "--description",
            "Shop",
        ]);

        let request = build_request(&args).unwrap();

        assert_eq!(request.project_path, PathBuf::from("/legacy"));
        assert_eq!(request.project_name, "shop");
        assert_eq!(request.description, "Shop");
        assert_eq!(request.target_version, "21");
        assert_eq!(request.dependency_spec, "web,data-jpa,lombok,actuator");
    }

    #[test]
    fn test_build_request_reports_missing_flags() {
        let args = migrate_args(&["/legacy", "--name", "shop"]);
        let err = build_request(&args).unwrap_err().to_string();
        assert!(err.contains("--group-id"));
        assert!(err.contains("--package"));
        assert!(!err.contains("--name"));
    }

    #[test]
    fn test_build_request_from_file_with_overrides() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("request.json");
        std::fs::write(
            &file,
            r#"{
                "projectPath": "/legacy/shop",
                "projectName": "shop",
                "groupId": "com.example",
                "packageName": "com.example.shop",
                "javaVersion": "17"
            }"#,
        )
        .unwrap();

        let file_arg = file.to_string_lossy().to_string();
        let args = migrate_args(&["--request", &file_arg, "--name", "store"]);

        let request = build_request(&args).unwrap();

        assert_eq!(request.project_path, PathBuf::from("/legacy/shop"));
        assert_eq!(request.project_name, "store");
        assert_eq!(request.target_version, "17");
    }

    #[test]
    fn test_build_request_invalid_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("request.json");
        std::fs::write(&file, "{ not json").unwrap();

        let file_arg = file.to_string_lossy().to_string();
        let args = migrate_args(&["--request", &file_arg]);

        assert!(build_request(&args).is_err());
    }

    fn base_config() -> MigrationConfig {
        MigrationConfig {
            provider: AdapterKind::OpenAI,
            model: "gpt-4o".to_string(),
            request_timeout_secs: 120,
            template_url: "https://start.spring.io/starter.zip".to_string(),
            boot_version: "3.2.0".to_string(),
            output_dir: PathBuf::from("/out"),
            work_dir: None,
            update_pom: false,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_apply_overrides_switches_default_model() {
        let args = migrate_args(&["--backend", "ollama", "--timeout", "30", "--update-pom"]);

        let config = apply_overrides(base_config(), &args);

        assert_eq!(config.provider, AdapterKind::Ollama);
        assert_eq!(config.model, "qwen2.5-coder:7b");
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.update_pom);
    }

    #[test]
    fn test_apply_overrides_explicit_model_wins() {
        let args = migrate_args(&["--backend", "ollama", "--model", "llama3", "-o", "/elsewhere"]);

        let config = apply_overrides(base_config(), &args);

        assert_eq!(config.model, "llama3");
        assert_eq!(config.output_dir, PathBuf::from("/elsewhere"));
    }

    #[tokio::test]
    async fn test_handle_analyze() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("App.java"), "package legacy;").unwrap();

        let args = AnalyzeArgs {
            project_path: Some(dir.path().to_path_buf()),
            format: OutputFormatArg::Json,
        };

        assert_eq!(handle_analyze(&args).await, 0);
    }

    #[tokio::test]
    async fn test_handle_analyze_missing_path() {
        let args = AnalyzeArgs {
            project_path: Some(PathBuf::from("/nonexistent/legacy")),
            format: OutputFormatArg::Human,
        };

        assert_eq!(handle_analyze(&args).await, 1);
    }
}
