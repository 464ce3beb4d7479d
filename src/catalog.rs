//! Legacy source tree cataloging
//!
//! Walks a legacy Java project depth-first and records every `.java` file
//! together with its declared package and imports. Build output and hidden
//! directories are pruned from the walk entirely.

use crate::dependency::DependencyRecord;
use crate::manifest;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Extension of files that are cataloged
pub const SOURCE_EXTENSION: &str = "java";

/// Directory names never descended into (Gradle and Maven build output)
pub const EXCLUDED_DIRS: &[&str] = &["build", "target"];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Project path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Project path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read source file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A discovered source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogedFile {
    /// Absolute path
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
    pub declared_package: Option<String>,
    pub imports: Vec<String>,
}

impl CatalogedFile {
    /// Path relative to the cataloged root, or the absolute path if it lies outside
    pub fn relative_to(&self, root: &Path) -> PathBuf {
        self.path
            .strip_prefix(root)
            .unwrap_or(&self.path)
            .to_path_buf()
    }
}

/// Catalog of a legacy project: its sources plus the manifest's dependencies
#[derive(Debug, Clone, Serialize)]
pub struct ProjectStructure {
    pub root: PathBuf,
    pub files: Vec<CatalogedFile>,
    pub dependencies: Vec<DependencyRecord>,
}

/// Regex-based package/import extractor and directory walker
pub struct SourceCataloger {
    package_re: Regex,
    import_re: Regex,
}

impl Default for SourceCataloger {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceCataloger {
    pub fn new() -> Self {
        Self {
            package_re: Regex::new(r"\bpackage\s+([\w.]+)\s*;").expect("valid regex"),
            import_re: Regex::new(r"\bimport\s+(?:static\s+)?([\w.]+(?:\.\*)?)\s*;")
                .expect("valid regex"),
        }
    }

    /// First `package x.y.z;` declaration in the text
    pub fn extract_package(&self, content: &str) -> Option<String> {
        self.package_re
            .captures(content)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Every `import` declaration, in file order
    pub fn extract_imports(&self, content: &str) -> Vec<String> {
        self.import_re
            .captures_iter(content)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Walks `root` and catalogs every source file found
    ///
    /// Any unreadable directory or file aborts the walk.
    pub fn catalog(&self, root: &Path) -> Result<Vec<CatalogedFile>, CatalogError> {
        let root = canonical_root(root)?;
        let start = Instant::now();

        let mut files = Vec::new();
        for entry in WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_excluded(e, &root))
        {
            let entry = entry.map_err(|source| CatalogError::Walk {
                path: source
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.clone()),
                source,
            })?;

            if !entry.file_type().is_file() || !is_source_file(entry.path()) {
                continue;
            }

            let file = self.catalog_file(entry.path())?;
            debug!(
                path = %file.path.display(),
                package = file.declared_package.as_deref().unwrap_or("<none>"),
                imports = file.imports.len(),
                "Cataloged source file"
            );
            files.push(file);
        }

        info!(
            root = %root.display(),
            files = files.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Source catalog complete"
        );

        Ok(files)
    }

    fn catalog_file(&self, path: &Path) -> Result<CatalogedFile, CatalogError> {
        let read_err = |source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        };
        let bytes = std::fs::read(path).map_err(read_err)?;
        let size_bytes = bytes.len() as u64;
        let content = decode_source(path, bytes);

        Ok(CatalogedFile {
            path: path.to_path_buf(),
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            size_bytes,
            declared_package: self.extract_package(&content),
            imports: self.extract_imports(&content),
        })
    }
}

/// Catalogs the sources under `root` and reads `root/pom.xml`
pub fn analyze_project(root: &Path) -> Result<ProjectStructure, CatalogError> {
    let root = canonical_root(root)?;
    let files = SourceCataloger::new().catalog(&root)?;
    let dependencies = manifest::extract_project_dependencies(&root);

    Ok(ProjectStructure {
        root,
        files,
        dependencies,
    })
}

/// Decodes a source file as UTF-8, replacing invalid sequences
///
/// Legacy trees often carry ISO-8859-1 sources; only I/O failures are fatal.
pub fn decode_source(path: &Path, bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(e) => {
            warn!(
                path = %path.display(),
                offset = e.utf8_error().valid_up_to(),
                "Source file is not valid UTF-8, replacing invalid bytes"
            );
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

fn canonical_root(root: &Path) -> Result<PathBuf, CatalogError> {
    if !root.exists() {
        return Err(CatalogError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(CatalogError::NotADirectory(root.to_path_buf()));
    }
    root.canonicalize().map_err(|source| CatalogError::Read {
        path: root.to_path_buf(),
        source,
    })
}

fn is_excluded(entry: &DirEntry, root: &Path) -> bool {
    if entry.path() == root || !entry.file_type().is_dir() {
        return false;
    }

    match entry.file_name().to_str() {
        Some(name) => name.starts_with('.') || EXCLUDED_DIRS.contains(&name),
        None => false,
    }
}

fn is_source_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(SOURCE_EXTENSION)
}
