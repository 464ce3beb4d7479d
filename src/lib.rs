//! springshift - LLM-assisted migration of legacy Java projects to Spring Boot
//!
//! A migration fetches a Spring Boot skeleton from Spring Initializr, catalogs
//! the legacy source tree, sends each Java file to an LLM for rewriting and
//! places the result in the skeleton's conventional layout. Dependencies the
//! LLM reports are merged first-seen-wins by `groupId:artifactId` and written
//! to a report next to the new `pom.xml`.
//!
//! # Core Concepts
//!
//! - **Catalog**: every `.java` file of the legacy tree with its package and
//!   imports, plus the dependencies declared in its `pom.xml`
//! - **Rewrite**: one LLM call per file returning `{ code, newDependencies }`;
//!   a reply in any other shape is used verbatim as the new code
//! - **Remap**: where a legacy relative path lands inside the skeleton
//!
//! # Example Usage
//!
//! ```no_run
//! use springshift::{MigrationConfig, MigrationRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MigrationConfig::default();
//! config.validate()?;
//!
//! let service = config.migration_service().await?;
//! let request = MigrationRequest::new("./legacy", "shop", "com.example", "com.example.shop");
//! let outcome = service.migrate(&request).await?;
//!
//! println!("{} files -> {}", outcome.migrated_file_count, outcome.output_path.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`catalog`] and [`manifest`]: read-only analysis of the legacy project
//! - [`rewrite`] and [`llm`]: the rewrite collaborator and dependency merging
//! - [`remap`]: destination layout
//! - [`template`] and [`archive`]: skeleton download and extraction
//! - [`migration`]: the end-to-end run

pub mod archive;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod dependency;
pub mod llm;
pub mod manifest;
pub mod migration;
pub mod remap;
pub mod rewrite;
pub mod template;
pub mod util;

pub use catalog::{analyze_project, CatalogError, CatalogedFile, ProjectStructure, SourceCataloger};
pub use config::{ConfigError, MigrationConfig};
pub use dependency::DependencyRecord;
pub use llm::{BackendError, GenAIClient, LLMClient, MockLLMClient};
pub use migration::{MigrationError, MigrationOutcome, MigrationRequest, MigrationService};
pub use remap::{PathRemapper, RemapRule};
pub use rewrite::{CodeRewriter, DependencyAccumulator, RewriteResult};
pub use template::{SpringInitializr, TemplateError, TemplateRequest, TemplateSource};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_springshift() {
        assert_eq!(NAME, "springshift");
    }
}
