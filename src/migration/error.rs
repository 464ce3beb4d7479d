use crate::archive::ArchiveError;
use crate::catalog::CatalogError;
use crate::llm::BackendError;
use crate::template::TemplateError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while obtaining the Spring Boot skeleton
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Failed to extract template archive: {0}")]
    Extract(#[from] ArchiveError),

    #[error("Extracted template has no project directory at {0}")]
    MissingProjectRoot(PathBuf),
}

/// Fatal migration failures
///
/// Recoverable problems (unparseable manifest, malformed rewrite replies) are
/// logged and never surface here.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Invalid migration request: {0}")]
    InvalidRequest(String),

    #[error("Failed to create working directory under {path}: {source}")]
    WorkArea {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template acquisition failed: {0}")]
    Acquisition(#[from] AcquisitionError),

    #[error("Cataloging failed: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Rewrite failed for {path}: {source}")]
    Rewrite {
        path: PathBuf,
        #[source]
        source: BackendError,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy project to {destination}: {source}")]
    Copy {
        destination: PathBuf,
        #[source]
        source: ArchiveError,
    },

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl MigrationError {
    /// Short category name used in logs and CLI output
    pub fn kind(&self) -> &'static str {
        match self {
            MigrationError::InvalidRequest(_) => "invalid_request",
            MigrationError::WorkArea { .. } => "work_area",
            MigrationError::Acquisition(_) => "acquisition",
            MigrationError::Catalog(_) => "catalog",
            MigrationError::Rewrite { .. } => "rewrite",
            MigrationError::Write { .. } => "write",
            MigrationError::Copy { .. } => "copy",
            MigrationError::Task(_) => "task",
        }
    }
}
