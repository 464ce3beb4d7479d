//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use springshift::template::{TemplateError, TemplateRequest, TemplateSource};
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Mutex;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const LEGACY_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <modelVersion>4.0.0</modelVersion>
    <groupId>com.old</groupId>
    <artifactId>shop</artifactId>
    <dependencies>
        <dependency>
            <groupId>junit</groupId>
            <artifactId>junit</artifactId>
            <version>4.12</version>
            <scope>test</scope>
        </dependency>
        <dependency>
            <groupId>commons-lang</groupId>
            <artifactId>commons-lang</artifactId>
            <version>2.6</version>
        </dependency>
    </dependencies>
</project>
"#;

pub const SKELETON_POM: &str = "<project><artifactId>shop</artifactId></project>";

pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Legacy tree whose sources catalog in this order:
/// `Helper.java`, `src/main/java/com/old/Foo.java`, `src/main/java/com/old/util/Bar.java`
pub fn legacy_project(root: &Path) {
    write_file(root, "pom.xml", LEGACY_POM);
    write_file(root, "Helper.java", "class Helper {}\n");
    write_file(
        root,
        "src/main/java/com/old/Foo.java",
        "package com.old;\n\nimport java.util.Vector;\n\npublic class Foo {}\n",
    );
    write_file(
        root,
        "src/main/java/com/old/util/Bar.java",
        "package com.old.util;\n\npublic class Bar {}\n",
    );
    write_file(root, "target/classes/Compiled.java", "class Compiled {}\n");
    write_file(root, ".git/hooks/Hook.java", "class Hook {}\n");
    write_file(root, "README.md", "# Legacy shop\n");
}

/// Zip archive built in memory from `(name, content)` pairs
pub fn build_zip(entries: &[(String, String)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(name.as_str(), SimpleFileOptions::default().unix_permissions(0o644))
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Serves a Spring Initializr-like skeleton from memory and records requests
pub struct ZipTemplate {
    entries: Vec<(String, String)>,
    requests: Mutex<Vec<TemplateRequest>>,
}

impl ZipTemplate {
    /// Skeleton nested under `<project>/`, like Spring Initializr's `baseDir`
    pub fn spring_boot(project: &str) -> Self {
        Self::with_prefix(&format!("{}/", project))
    }

    /// Skeleton at the archive root
    pub fn flat() -> Self {
        Self::with_prefix("")
    }

    fn with_prefix(prefix: &str) -> Self {
        let entries = [
            ("pom.xml", SKELETON_POM),
            ("mvnw", "#!/bin/sh\n"),
            (".mvn/wrapper/maven-wrapper.properties", "distributionUrl=x\n"),
            (
                "src/main/java/com/example/shop/ShopApplication.java",
                "package com.example.shop;\n\n@SpringBootApplication\npublic class ShopApplication {}\n",
            ),
            ("src/main/resources/application.properties", "spring.application.name=shop\n"),
        ]
        .iter()
        .map(|(name, content)| (format!("{}{}", prefix, name), content.to_string()))
        .collect();

        Self {
            entries,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<TemplateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TemplateSource for ZipTemplate {
    async fn fetch(&self, request: &TemplateRequest) -> Result<Vec<u8>, TemplateError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(build_zip(&self.entries))
    }

    fn name(&self) -> &str {
        "zip-fixture"
    }
}

/// Returns fixed bytes, e.g. a corrupt archive
pub struct RawTemplate(pub Vec<u8>);

#[async_trait]
impl TemplateSource for RawTemplate {
    async fn fetch(&self, _request: &TemplateRequest) -> Result<Vec<u8>, TemplateError> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "raw-fixture"
    }
}

pub struct UnavailableTemplate;

#[async_trait]
impl TemplateSource for UnavailableTemplate {
    async fn fetch(&self, _request: &TemplateRequest) -> Result<Vec<u8>, TemplateError> {
        Err(TemplateError::EmptyArchive)
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

pub fn dir_is_empty(path: &Path) -> bool {
    fs::read_dir(path).map(|mut d| d.next().is_none()).unwrap_or(true)
}
