//! Destination layout for migrated files
//!
//! [`PathRemapper`] decides where a file from the legacy tree lands inside the
//! freshly generated Spring Boot project. Rules are tried in order and the
//! last one always matches, so every relative path has exactly one
//! destination:
//!
//! 1. `.../src/main/java/<rest>` goes to `<root>/src/main/java/<rest>`
//! 2. any other `.java` file goes to `<root>/src/main/java/<package dirs>/<file>`
//! 3. `.../src/main/resources/<rest>` goes to `<root>/src/main/resources/<rest>`
//! 4. anything else is mirrored at `<root>/<relative path>`
//!
//! Remapping is pure path arithmetic. Creating directories is up to the caller.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Directory sequence marking the root of application sources
pub const MAIN_SOURCE_SEGMENT: [&str; 3] = ["src", "main", "java"];

/// Directory sequence marking the root of application resources
pub const MAIN_RESOURCES_SEGMENT: [&str; 3] = ["src", "main", "resources"];

const SOURCE_SUFFIX: &str = ".java";

/// Which rule produced a destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemapRule {
    MainSource,
    PackageRelocated,
    Resource,
    Mirrored,
}

impl fmt::Display for RemapRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RemapRule::MainSource => "main-source",
            RemapRule::PackageRelocated => "package-relocated",
            RemapRule::Resource => "resource",
            RemapRule::Mirrored => "mirrored",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remapped {
    pub destination: PathBuf,
    pub rule: RemapRule,
}

#[derive(Debug, Clone)]
pub struct PathRemapper {
    project_root: PathBuf,
    package_dirs: Vec<String>,
}

impl PathRemapper {
    /// `package_name` is the dotted target package, e.g. `com.example.app`
    pub fn new(project_root: impl Into<PathBuf>, package_name: &str) -> Self {
        Self {
            project_root: project_root.into(),
            package_dirs: package_name
                .split('.')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn main_source_root(&self) -> PathBuf {
        join_all(&self.project_root, MAIN_SOURCE_SEGMENT)
    }

    pub fn resources_root(&self) -> PathBuf {
        join_all(&self.project_root, MAIN_RESOURCES_SEGMENT)
    }

    /// Main source root plus the target package as nested directories
    pub fn package_root(&self) -> PathBuf {
        join_all(&self.main_source_root(), &self.package_dirs)
    }

    pub fn destination(&self, relative: &Path) -> PathBuf {
        self.remap(relative).destination
    }

    pub fn remap(&self, relative: &Path) -> Remapped {
        let parts = components(relative);

        if let Some(rest) = after_segment(&parts, &MAIN_SOURCE_SEGMENT) {
            return Remapped {
                destination: join_all(&self.main_source_root(), rest),
                rule: RemapRule::MainSource,
            };
        }

        if let Some(file_name) = parts.last().filter(|name| name.ends_with(SOURCE_SUFFIX)) {
            return Remapped {
                destination: self.package_root().join(file_name),
                rule: RemapRule::PackageRelocated,
            };
        }

        if let Some(rest) = after_segment(&parts, &MAIN_RESOURCES_SEGMENT) {
            return Remapped {
                destination: join_all(&self.resources_root(), rest),
                rule: RemapRule::Resource,
            };
        }

        Remapped {
            destination: join_all(&self.project_root, &parts),
            rule: RemapRule::Mirrored,
        }
    }
}

/// Splits on both separator styles so Windows-style relative paths map too
fn components(path: &Path) -> Vec<String> {
    path.to_string_lossy()
        .split(['/', '\\'])
        .filter(|c| !c.is_empty() && *c != ".")
        .map(str::to_string)
        .collect()
}

/// Components after the first occurrence of `segment`
fn after_segment<'a>(parts: &'a [String], segment: &[&str]) -> Option<&'a [String]> {
    if parts.len() < segment.len() {
        return None;
    }
    (0..=parts.len() - segment.len())
        .find(|&i| {
            parts[i..i + segment.len()]
                .iter()
                .zip(segment)
                .all(|(a, b)| a == b)
        })
        .map(|i| &parts[i + segment.len()..])
}

fn join_all<I, S>(base: &Path, parts: I) -> PathBuf
where
    I: IntoIterator<Item = S>,
    S: AsRef<Path>,
{
    let mut path = base.to_path_buf();
    for part in parts {
        path.push(part);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    const ROOT: &str = "/work/spring-boot-project/shop";

    fn remapper() -> PathRemapper {
        PathRemapper::new(ROOT, "com.new.app")
    }

    #[parameterized(
        main_source = { "src/main/java/com/old/Foo.java", "src/main/java/com/old/Foo.java", RemapRule::MainSource },
        nested_module = { "core/src/main/java/com/old/svc/Bar.java", "src/main/java/com/old/svc/Bar.java", RemapRule::MainSource },
        windows_separators = { "legacy\\src\\main\\java\\com\\old\\Win.java", "src/main/java/com/old/Win.java", RemapRule::MainSource },
        bare_file = { "Helper.java", "src/main/java/com/new/app/Helper.java", RemapRule::PackageRelocated },
        loose_source = { "misc/util/Strings.java", "src/main/java/com/new/app/Strings.java", RemapRule::PackageRelocated },
        test_source = { "src/test/java/com/old/FooTest.java", "src/main/java/com/new/app/FooTest.java", RemapRule::PackageRelocated },
        resource = { "src/main/resources/application.properties", "src/main/resources/application.properties", RemapRule::Resource },
        nested_resource = { "web/src/main/resources/static/css/site.css", "src/main/resources/static/css/site.css", RemapRule::Resource },
        fallback = { "scripts/run.sh", "scripts/run.sh", RemapRule::Mirrored },
        fallback_dot_prefix = { "./docs/README.md", "docs/README.md", RemapRule::Mirrored },
    )]
    fn test_remap(relative: &str, expected: &str, rule: RemapRule) {
        let remapped = remapper().remap(Path::new(relative));

        let mut want = PathBuf::from(ROOT);
        for part in expected.split('/') {
            want.push(part);
        }
        assert_eq!(remapped.destination, want);
        assert_eq!(remapped.rule, rule);
    }

    #[test]
    fn test_main_source_ignores_target_package() {
        let a = PathRemapper::new(ROOT, "com.new.app");
        let b = PathRemapper::new(ROOT, "org.other");
        let rel = Path::new("src/main/java/com/old/Foo.java");

        assert_eq!(a.destination(rel), b.destination(rel));
    }

    #[test]
    fn test_remap_is_idempotent() {
        let remapper = remapper();
        let rel = Path::new("Helper.java");

        let first = remapper.destination(rel);
        for _ in 0..5 {
            assert_eq!(remapper.destination(rel), first);
        }
    }

    #[test]
    fn test_empty_package_places_under_main_root() {
        let remapper = PathRemapper::new(ROOT, "");
        assert_eq!(
            remapper.destination(Path::new("Helper.java")),
            remapper.main_source_root().join("Helper.java")
        );
    }

    #[test]
    fn test_resource_with_java_suffix_is_treated_as_source() {
        let remapped = remapper().remap(Path::new("src/main/resources/templates/Snippet.java"));
        assert_eq!(remapped.rule, RemapRule::PackageRelocated);
    }

    #[test]
    fn test_segment_must_be_whole_components() {
        let remapped = remapper().remap(Path::new("mysrc/main/java/notes.txt"));
        assert_eq!(remapped.rule, RemapRule::Mirrored);
    }

    #[test]
    fn test_roots() {
        let remapper = remapper();
        assert_eq!(
            remapper.main_source_root(),
            PathBuf::from(ROOT).join("src").join("main").join("java")
        );
        assert_eq!(
            remapper.resources_root(),
            PathBuf::from(ROOT).join("src").join("main").join("resources")
        );
        assert_eq!(
            remapper.package_root(),
            remapper.main_source_root().join("com").join("new").join("app")
        );
        assert_eq!(remapper.project_root(), Path::new(ROOT));
    }

    #[test]
    fn test_rule_display() {
        assert_eq!(RemapRule::PackageRelocated.to_string(), "package-relocated");
    }
}
