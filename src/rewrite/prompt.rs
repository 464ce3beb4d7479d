//! Prompts sent to the rewrite collaborator

use crate::dependency::DependencyRecord;

/// System prompt for per-file Java modernization
pub const REWRITE_SYSTEM_PROMPT: &str = r#"You are an expert in Java code migration, focused on upgrading legacy Java 8 projects to modern Java with Spring Boot 3.x.
Your task is to refactor code and identify the dependencies it needs.
Respond only with the requested JSON object."#;

/// System prompt for the optional pom.xml update
pub const POM_SYSTEM_PROMPT: &str = r#"You are an expert in Maven configuration and Java dependencies.
Your job is to update pom.xml files for modern Spring Boot projects."#;

/// Builds the user prompt for rewriting one source file
pub fn rewrite_prompt(
    file_name: &str,
    source: &str,
    target_version: &str,
    dependencies: &[DependencyRecord],
) -> String {
    format!(
        r#"# Java to Spring Boot Refactoring Task

## Original file: `{file_name}`
```java
{source}
```

## Current project dependencies
{dependencies}

## Project context
This file is part of a Java project being refactored to Java {target_version} with Spring Boot 3.x.

## Goals
- Refactor the Java code above to Java {target_version} and Spring Boot 3.x
- Keep the original business logic intact
- Replace deprecated APIs with their modern equivalents
- Use Java {target_version} language features where appropriate

## Specific instructions
1. Replace legacy APIs with modern Spring Boot equivalents
2. Use Java {target_version} features such as lambdas, streams and switch expressions where applicable
3. Modernize exception handling and I/O
4. Convert legacy date/time classes to the java.time API
5. Keep the original names of classes, methods and variables
6. Make sure every import is correct
7. Add Spring Boot annotations (@Service, @Repository, @RestController) where applicable

## Response format (respond EXACTLY with this JSON shape)
{{
  "code": "// refactored Java code here",
  "newDependencies": [
    {{
      "groupId": "dependency group",
      "artifactId": "dependency artifact",
      "version": "recommended version compatible with Spring Boot 3.x",
      "description": "short reason this dependency is needed"
    }}
  ]
}}"#,
        dependencies = dependencies_json(dependencies),
    )
}

/// Builds the user prompt asking for an updated pom.xml
pub fn pom_update_prompt(pom_xml: &str, dependencies: &[DependencyRecord]) -> String {
    format!(
        r#"# Maven Dependency Update

## Original pom.xml
```xml
{pom_xml}
```

## Dependencies of the original project
{dependencies}

## Task
Update the pom.xml above so it includes every dependency the original project needs,
using versions compatible with Spring Boot 3.x.

Guidelines:
1. Keep every existing Spring Boot dependency
2. Add modern equivalents for the original project's dependencies
3. Remove duplicated or conflicting dependencies
4. Update versions to be compatible with Spring Boot 3.x
5. Add explanatory comments where needed

Return only the updated pom.xml, without any extra explanation."#,
        dependencies = dependencies_json(dependencies),
    )
}

fn dependencies_json(dependencies: &[DependencyRecord]) -> String {
    serde_json::to_string_pretty(dependencies).unwrap_or_else(|_| "[]".to_string())
}
