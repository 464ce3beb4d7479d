//! End-to-end migration of a legacy Java tree into a Spring Boot skeleton
//!
//! A run goes through these steps in order:
//!
//! 1. create a private working directory
//! 2. fetch the skeleton archive and extract it into the working directory
//! 3. catalog the legacy sources and read the manifest dependencies
//! 4. rewrite every cataloged file, remap it and write it into the skeleton
//! 5. write the dependency report (and optionally update `pom.xml`)
//! 6. copy the populated skeleton to `<output_root>/<projectName>`
//! 7. remove the working directory, whatever the result
//!
//! Files are rewritten one at a time in catalog order so that newly detected
//! dependencies are merged first-seen-wins in a deterministic order. When two
//! legacy files land on the same destination the later one overwrites the
//! earlier, and the migrated count covers distinct destinations only.

mod error;
mod report;
mod request;

pub use error::{AcquisitionError, MigrationError};
pub use report::{render_dependency_report, REPORT_FILE};
pub use request::{
    MigrationOutcome, MigrationRequest, DEFAULT_DEPENDENCY_SPEC, DEFAULT_TARGET_VERSION,
};

use crate::archive;
use crate::catalog::{self, CatalogError, ProjectStructure};
use crate::dependency::DependencyRecord;
use crate::manifest::MANIFEST_FILE;
use crate::remap::PathRemapper;
use crate::rewrite::{CodeRewriter, DependencyAccumulator, RewriteInput};
use crate::template::{TemplateSource, DEFAULT_BOOT_VERSION};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tempfile::TempDir;
use tracing::{debug, error, info, warn};

/// Prefix of the per-run working directory
pub const WORK_DIR_PREFIX: &str = "java-migration-";

/// Directory inside the working area that receives the extracted skeleton
pub const TEMPLATE_DIR: &str = "spring-boot-project";

/// Everything produced by the rewrite loop
#[derive(Debug, Default)]
struct RewriteSummary {
    migrated_file_count: usize,
    new_dependencies: Vec<DependencyRecord>,
}

pub struct MigrationService {
    template: Arc<dyn TemplateSource>,
    rewriter: CodeRewriter,
    output_root: PathBuf,
    work_root: Option<PathBuf>,
    boot_version: String,
    update_pom: bool,
}

impl MigrationService {
    pub fn new(
        template: Arc<dyn TemplateSource>,
        rewriter: CodeRewriter,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            template,
            rewriter,
            output_root: output_root.into(),
            work_root: None,
            boot_version: DEFAULT_BOOT_VERSION.to_string(),
            update_pom: false,
        }
    }

    /// Parent directory for working areas, defaults to the system temp dir
    pub fn with_work_root(mut self, work_root: impl Into<PathBuf>) -> Self {
        self.work_root = Some(work_root.into());
        self
    }

    pub fn with_boot_version(mut self, boot_version: impl Into<String>) -> Self {
        self.boot_version = boot_version.into();
        self
    }

    /// Have the collaborator merge all dependencies into the skeleton's `pom.xml`
    pub fn with_pom_update(mut self, enabled: bool) -> Self {
        self.update_pom = enabled;
        self
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub async fn migrate(
        &self,
        request: &MigrationRequest,
    ) -> Result<MigrationOutcome, MigrationError> {
        if let Err(e) = request.validate() {
            error!(error = %e, "Rejected migration request");
            return Err(e);
        }

        let start = Instant::now();
        info!(
            project = %request.project_name,
            source = %request.project_path.display(),
            template = self.template.name(),
            rewriter = %self.rewriter.client_description(),
            "Starting migration"
        );

        let work_area = self.create_work_area()?;
        let work_path = work_area.path().to_path_buf();
        debug!(path = %work_path.display(), "Created working directory");

        let result = self.run(request, &work_path).await;

        // Dropping the TempDir would also remove it; closing surfaces the error
        if let Err(e) = work_area.close() {
            warn!(path = %work_path.display(), error = %e, "Failed to remove working directory");
        } else {
            debug!(path = %work_path.display(), "Removed working directory");
        }

        match result {
            Ok(outcome) => {
                info!(
                    project = %request.project_name,
                    output = %outcome.output_path.display(),
                    files = outcome.migrated_file_count,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Migration complete"
                );
                Ok(outcome)
            }
            Err(e) => {
                error!(
                    project = %request.project_name,
                    kind = e.kind(),
                    error = %e,
                    "Migration failed"
                );
                Err(e)
            }
        }
    }

    fn create_work_area(&self) -> Result<TempDir, MigrationError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORK_DIR_PREFIX);

        let root = self.work_root.clone().unwrap_or_else(std::env::temp_dir);
        std::fs::create_dir_all(&root)
            .and_then(|_| builder.tempdir_in(&root))
            .map_err(|source| MigrationError::WorkArea { path: root, source })
    }

    async fn run(
        &self,
        request: &MigrationRequest,
        work_dir: &Path,
    ) -> Result<MigrationOutcome, MigrationError> {
        let skeleton = self.acquire_template(request, work_dir).await?;

        info!(source = %request.project_path.display(), "Cataloging legacy project");
        let legacy_root = request.project_path.clone();
        let structure = blocking(move || catalog::analyze_project(&legacy_root)).await??;
        info!(
            files = structure.files.len(),
            dependencies = structure.dependencies.len(),
            "Legacy project cataloged"
        );

        let remapper = PathRemapper::new(&skeleton, &request.package_name);
        let summary = self.rewrite_all(request, &structure, &remapper).await?;

        let report_path = skeleton.join(REPORT_FILE);
        let report = render_dependency_report(&structure.dependencies, &summary.new_dependencies);
        write_file(&report_path, &report).await?;
        debug!(path = %report_path.display(), "Wrote dependency report");

        if self.update_pom {
            self.update_manifest(&skeleton, &structure, &summary.new_dependencies)
                .await?;
        }

        let destination = self.output_root.join(&request.project_name);
        info!(to = %destination.display(), "Copying migrated project");
        let (from, to) = (skeleton.clone(), destination.clone());
        blocking(move || archive::copy_dir_all(&from, &to))
            .await?
            .map_err(|source| MigrationError::Copy {
                destination: destination.clone(),
                source,
            })?;

        Ok(MigrationOutcome {
            success: true,
            output_path: destination,
            migrated_file_count: summary.migrated_file_count,
        })
    }

    /// Fetches and extracts the skeleton, returning its project root
    async fn acquire_template(
        &self,
        request: &MigrationRequest,
        work_dir: &Path,
    ) -> Result<PathBuf, MigrationError> {
        let template_request = request.template_request(&self.boot_version);
        let bytes = self
            .template
            .fetch(&template_request)
            .await
            .map_err(AcquisitionError::from)?;

        let extract_root = work_dir.join(TEMPLATE_DIR);
        let target = extract_root.clone();
        let extracted = blocking(move || archive::extract_zip(&bytes, &target))
            .await?
            .map_err(AcquisitionError::from)?;
        info!(files = extracted, "Template extracted");

        locate_project_root(&extract_root, &request.project_name)
    }

    async fn rewrite_all(
        &self,
        request: &MigrationRequest,
        structure: &ProjectStructure,
        remapper: &PathRemapper,
    ) -> Result<RewriteSummary, MigrationError> {
        let total = structure.files.len();
        let mut accumulator = DependencyAccumulator::new();
        let mut written = HashSet::new();

        info!(files = total, "Rewriting sources");
        for (index, file) in structure.files.iter().enumerate() {
            let relative = file.relative_to(&structure.root);
            let bytes = tokio::fs::read(&file.path)
                .await
                .map_err(|source| CatalogError::Read {
                    path: file.path.clone(),
                    source,
                })?;
            let source = catalog::decode_source(&file.path, bytes);

            let result = self
                .rewriter
                .rewrite(RewriteInput {
                    source: &source,
                    relative_path: &relative,
                    target_version: &request.target_version,
                    project_dependencies: &structure.dependencies,
                })
                .await
                .map_err(|source| MigrationError::Rewrite {
                    path: relative.clone(),
                    source,
                })?;

            let added = accumulator.merge(result.new_dependencies);
            let remapped = remapper.remap(&relative);
            write_file(&remapped.destination, &result.rewritten_code).await?;
            if !written.insert(remapped.destination.clone()) {
                warn!(
                    file = %relative.display(),
                    destination = %remapped.destination.display(),
                    "Destination already written by an earlier file, overwriting it"
                );
            }

            debug!(
                file = %relative.display(),
                destination = %remapped.destination.display(),
                rule = %remapped.rule,
                new_dependencies = added,
                progress = %format!("{}/{}", index + 1, total),
                "Migrated file"
            );
        }

        info!(
            files = written.len(),
            collisions = total - written.len(),
            new_dependencies = accumulator.len(),
            "Rewrite complete"
        );

        Ok(RewriteSummary {
            migrated_file_count: written.len(),
            new_dependencies: accumulator.into_records(),
        })
    }

    async fn update_manifest(
        &self,
        skeleton: &Path,
        structure: &ProjectStructure,
        detected: &[DependencyRecord],
    ) -> Result<(), MigrationError> {
        let pom_path = skeleton.join(MANIFEST_FILE);
        let pom = match tokio::fs::read_to_string(&pom_path).await {
            Ok(pom) => pom,
            Err(e) => {
                warn!(path = %pom_path.display(), error = %e, "Skeleton has no readable pom.xml, skipping update");
                return Ok(());
            }
        };

        let all: Vec<DependencyRecord> = structure
            .dependencies
            .iter()
            .chain(detected)
            .cloned()
            .collect();

        info!(dependencies = all.len(), "Updating pom.xml");
        let updated = self
            .rewriter
            .update_pom(&pom, &all)
            .await
            .map_err(|source| MigrationError::Rewrite {
                path: PathBuf::from(MANIFEST_FILE),
                source,
            })?;

        write_file(&pom_path, &updated).await
    }
}

impl std::fmt::Debug for MigrationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationService")
            .field("template", &self.template.name())
            .field("rewriter", &self.rewriter)
            .field("output_root", &self.output_root)
            .field("work_root", &self.work_root)
            .field("boot_version", &self.boot_version)
            .field("update_pom", &self.update_pom)
            .finish()
    }
}

/// `<extract_root>/<projectName>`, or the extraction root itself if it holds a pom
fn locate_project_root(extract_root: &Path, project_name: &str) -> Result<PathBuf, MigrationError> {
    let nested = extract_root.join(project_name);
    if nested.is_dir() {
        return Ok(nested);
    }
    if extract_root.join(MANIFEST_FILE).is_file() {
        debug!("Template archive has no base directory, using extraction root");
        return Ok(extract_root.to_path_buf());
    }
    Err(AcquisitionError::MissingProjectRoot(nested).into())
}

async fn write_file(path: &Path, content: &str) -> Result<(), MigrationError> {
    let write_err = |source| MigrationError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }
    tokio::fs::write(path, content).await.map_err(write_err)
}

async fn blocking<F, T>(f: F) -> Result<T, MigrationError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLLMClient;
    use crate::template::{TemplateError, TemplateRequest};
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct FailingTemplate;

    #[async_trait]
    impl TemplateSource for FailingTemplate {
        async fn fetch(&self, _request: &TemplateRequest) -> Result<Vec<u8>, TemplateError> {
            Err(TemplateError::EmptyArchive)
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn service(work: &Path, out: &Path) -> MigrationService {
        MigrationService::new(
            Arc::new(FailingTemplate),
            CodeRewriter::new(Arc::new(MockLLMClient::new())),
            out,
        )
        .with_work_root(work)
    }

    #[test]
    fn test_locate_project_root_prefers_named_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("shop")).unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "<project/>").unwrap();

        let root = locate_project_root(dir.path(), "shop").unwrap();
        assert_eq!(root, dir.path().join("shop"));
    }

    #[test]
    fn test_locate_project_root_falls_back_to_extract_root() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "<project/>").unwrap();

        let root = locate_project_root(dir.path(), "shop").unwrap();
        assert_eq!(root, dir.path());
    }

    #[test]
    fn test_locate_project_root_missing() {
        let dir = TempDir::new().unwrap();
        let result = locate_project_root(dir.path(), "shop");
        assert!(matches!(
            result,
            Err(MigrationError::Acquisition(
                AcquisitionError::MissingProjectRoot(_)
            ))
        ));
    }

    #[tokio::test]
    async fn test_write_file_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/c/Foo.java");

        write_file(&path, "class Foo {}").await.unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "class Foo {}");
    }

    #[tokio::test]
    async fn test_invalid_request_creates_no_work_area() {
        let work = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let request = MigrationRequest::new("/nonexistent/legacy", "shop", "com.example", "com.example");

        let result = service(work.path(), out.path()).migrate(&request).await;

        assert!(matches!(result, Err(MigrationError::InvalidRequest(_))));
        assert_eq!(std::fs::read_dir(work.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_template_failure_cleans_work_area() {
        let work = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let legacy = TempDir::new().unwrap();
        let request = MigrationRequest::new(legacy.path(), "shop", "com.example", "com.example");

        let result = service(work.path(), out.path()).migrate(&request).await;

        assert!(matches!(result, Err(MigrationError::Acquisition(_))));
        assert_eq!(std::fs::read_dir(work.path()).unwrap().count(), 0);
        assert!(!out.path().join("shop").exists());
    }

    #[test]
    fn test_debug_hides_clients() {
        let work = TempDir::new().unwrap();
        let debug = format!("{:?}", service(work.path(), work.path()));
        assert!(debug.contains("failing"));
        assert!(debug.contains("MockLLM"));
    }
}
