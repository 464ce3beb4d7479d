use crate::migration::{DEFAULT_DEPENDENCY_SPEC, DEFAULT_TARGET_VERSION};
use clap::{Parser, Subcommand, ValueEnum};
use genai::adapter::AdapterKind;
use std::path::PathBuf;

/// LLM-assisted migration of legacy Java projects to Spring Boot
#[derive(Parser, Debug)]
#[command(
    name = "springshift",
    about = "LLM-assisted migration of legacy Java projects to Spring Boot",
    version,
    author,
    long_about = "springshift generates a fresh Spring Boot skeleton, rewrites every Java \
                  source of a legacy project through an LLM, places the results in the \
                  skeleton's conventional layout and reports the dependencies it found."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Migrate a legacy Java project into a new Spring Boot project",
        long_about = "Downloads a Spring Boot skeleton, rewrites each Java source file with the \
                      configured LLM and writes the result to <output-dir>/<name>.\n\n\
                      Examples:\n  \
                      springshift migrate ./legacy --name shop --group-id com.example --package com.example.shop\n  \
                      springshift migrate ./legacy --request request.json --format json\n  \
                      springshift migrate ./legacy --name shop --group-id com.acme --package com.acme.shop \\\n      \
                      --backend ollama --model qwen2.5-coder:14b --update-pom"
    )]
    Migrate(MigrateArgs),

    #[command(
        about = "Catalog a legacy project without migrating it",
        long_about = "Lists the Java sources (package and imports) and the pom.xml dependencies \
                      that a migration would work from. No network calls are made.\n\n\
                      Examples:\n  \
                      springshift analyze ./legacy\n  \
                      springshift analyze ./legacy --format yaml"
    )]
    Analyze(AnalyzeArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct MigrateArgs {
    #[arg(
        value_name = "PATH",
        help = "Root of the legacy project (overrides projectPath from --request)"
    )]
    pub project_path: Option<PathBuf>,

    #[arg(
        long,
        value_name = "FILE",
        help = "JSON migration request; flags given alongside it take precedence"
    )]
    pub request: Option<PathBuf>,

    #[arg(
        short = 'n',
        long,
        value_name = "NAME",
        help = "Project name, used as artifact id and output directory name"
    )]
    pub name: Option<String>,

    #[arg(short = 'g', long, value_name = "GROUP", help = "Maven group id")]
    pub group_id: Option<String>,

    #[arg(
        short = 'p',
        long = "package",
        value_name = "PACKAGE",
        help = "Base package for relocated sources, e.g. com.example.shop"
    )]
    pub package_name: Option<String>,

    #[arg(short = 'd', long, help = "Project description")]
    pub description: Option<String>,

    #[arg(
        long,
        value_name = "VERSION",
        help = "Target Java version [default: 21]"
    )]
    pub java_version: Option<String>,

    #[arg(
        long,
        value_name = "LIST",
        help = "Comma-separated Spring Initializr dependencies [default: web,data-jpa,lombok,actuator]"
    )]
    pub features: Option<String>,

    #[arg(
        short = 'b',
        long,
        value_parser = parse_adapter_kind,
        help = "LLM provider (overrides SPRINGSHIFT_PROVIDER)"
    )]
    pub backend: Option<AdapterKind>,

    #[arg(
        short = 'm',
        long,
        value_name = "MODEL",
        help = "Model name (provider-specific, e.g. 'gpt-4o' or 'qwen2.5-coder:7b')"
    )]
    pub model: Option<String>,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "Per-request timeout in seconds (overrides SPRINGSHIFT_REQUEST_TIMEOUT)"
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Directory receiving the migrated project (overrides SPRINGSHIFT_OUTPUT_DIR)"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(long, help = "Ask the LLM to merge detected dependencies into pom.xml")]
    pub update_pom: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

impl MigrateArgs {
    pub fn java_version_or_default(&self) -> &str {
        self.java_version.as_deref().unwrap_or(DEFAULT_TARGET_VERSION)
    }

    pub fn features_or_default(&self) -> &str {
        self.features.as_deref().unwrap_or(DEFAULT_DEPENDENCY_SPEC)
    }
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    #[arg(
        value_name = "PATH",
        help = "Root of the legacy project (defaults to current directory)"
    )]
    pub project_path: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

fn parse_adapter_kind(s: &str) -> Result<AdapterKind, String> {
    AdapterKind::from_lower_str(&s.to_lowercase()).ok_or_else(|| {
        format!(
            "Invalid provider: {}. Valid options: openai, ollama, anthropic, gemini, xai, groq",
            s
        )
    })
}
