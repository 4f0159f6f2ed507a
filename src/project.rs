//! Project probing: build system detection and file inventories.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::logging::Logger;

/// Java version assumed when the build files do not state one.
pub const DEFAULT_JAVA_VERSION: &str = "11";

static MAVEN_JAVA_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<java\.version>([^<]+)</java\.version>").unwrap());
static GRADLE_JAVA_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"sourceCompatibility\s*=?\s*['"]?([\d.]+)['"]?"#).unwrap());
static MAVEN_ARTIFACT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<artifactId>([^<]+)</artifactId>").unwrap());

/// Build system of the scanned project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildSystem {
    Maven,
    Gradle,
}

impl BuildSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildSystem::Maven => "maven",
            BuildSystem::Gradle => "gradle",
        }
    }
}

/// What the probe learned about the project before any checker runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub name: String,
    pub build_system: BuildSystem,
    pub java_version: String,
    pub dependencies: Vec<String>,
    pub source_files: Vec<PathBuf>,
    pub test_files: Vec<PathBuf>,
    pub config_files: Vec<PathBuf>,
}

/// Probe a project root. Fails when the root has neither a Maven nor a
/// Gradle build file.
pub fn probe_project(root: &Path, logger: &Logger) -> Result<ProjectInfo> {
    let pom = root.join("pom.xml");
    let gradle = root.join("build.gradle");
    let gradle_kts = root.join("build.gradle.kts");

    let (build_system, build_file) = if pom.is_file() {
        (BuildSystem::Maven, pom)
    } else if gradle.is_file() {
        (BuildSystem::Gradle, gradle)
    } else if gradle_kts.is_file() {
        (BuildSystem::Gradle, gradle_kts)
    } else {
        anyhow::bail!("no Maven or Gradle build file found in {}", root.display());
    };

    let build_content = std::fs::read_to_string(&build_file)
        .with_context(|| format!("reading {}", build_file.display()))?;

    let java_version = match build_system {
        BuildSystem::Maven => MAVEN_JAVA_VERSION
            .captures(&build_content)
            .map(|c| c[1].trim().to_string()),
        BuildSystem::Gradle => GRADLE_JAVA_VERSION
            .captures(&build_content)
            .map(|c| c[1].to_string()),
    }
    .unwrap_or_else(|| DEFAULT_JAVA_VERSION.to_string());

    let dependencies = match build_system {
        BuildSystem::Maven => MAVEN_ARTIFACT
            .captures_iter(&build_content)
            .map(|c| c[1].to_string())
            .collect(),
        BuildSystem::Gradle => build_content
            .lines()
            .filter(|l| {
                let l = l.trim();
                l.starts_with("implementation") || l.starts_with("api") || l.starts_with("compile")
            })
            .filter_map(|l| l.split('\'').nth(1).or_else(|| l.split('"').nth(1)))
            .map(str::to_string)
            .collect(),
    };

    let mut source_files = Vec::new();
    let mut test_files = Vec::new();
    let mut config_files = Vec::new();

    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = path.strip_prefix(root).unwrap_or(path);
        let rel_str = rel.to_string_lossy();
        if rel_str.contains("target/") || rel_str.contains("build/") || rel_str.contains(".git/") {
            continue;
        }

        match path.extension().and_then(|e| e.to_str()) {
            Some("java") => {
                if rel_str.contains("src/test/") || rel_str.ends_with("Test.java") {
                    test_files.push(path.to_path_buf());
                } else {
                    source_files.push(path.to_path_buf());
                }
            }
            Some("properties") | Some("yml") | Some("yaml") => {
                config_files.push(path.to_path_buf());
            }
            _ => {}
        }
    }

    source_files.sort();
    test_files.sort();
    config_files.sort();

    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());

    logger.debug(format!(
        "probed {}: {} build, java {}, {} source files",
        name,
        build_system.as_str(),
        java_version,
        source_files.len()
    ));

    Ok(ProjectInfo {
        name,
        build_system,
        java_version,
        dependencies,
        source_files,
        test_files,
        config_files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_probe_maven_project() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("pom.xml"),
            "<project>\n<java.version>17</java.version>\n<artifactId>demo</artifactId>\n</project>",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("src/main/java")).unwrap();
        fs::write(dir.path().join("src/main/java/App.java"), "class App {}").unwrap();

        let info = probe_project(dir.path(), &Logger::default()).unwrap();
        assert_eq!(info.build_system, BuildSystem::Maven);
        assert_eq!(info.java_version, "17");
        assert_eq!(info.dependencies, vec!["demo".to_string()]);
        assert_eq!(info.source_files.len(), 1);
    }

    #[test]
    fn test_probe_gradle_defaults_java_version() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("build.gradle"),
            "dependencies {\n    implementation 'org.springframework.boot:spring-boot-starter'\n}",
        )
        .unwrap();

        let info = probe_project(dir.path(), &Logger::default()).unwrap();
        assert_eq!(info.build_system, BuildSystem::Gradle);
        assert_eq!(info.java_version, DEFAULT_JAVA_VERSION);
        assert_eq!(
            info.dependencies,
            vec!["org.springframework.boot:spring-boot-starter".to_string()]
        );
    }

    #[test]
    fn test_probe_without_build_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = probe_project(dir.path(), &Logger::default()).unwrap_err();
        assert!(err.to_string().contains("Maven or Gradle"));
    }

    #[test]
    fn test_test_files_separated() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();
        fs::create_dir_all(dir.path().join("src/main/java")).unwrap();
        fs::create_dir_all(dir.path().join("src/test/java")).unwrap();
        fs::write(dir.path().join("src/main/java/App.java"), "class App {}").unwrap();
        fs::write(dir.path().join("src/test/java/AppTest.java"), "class AppTest {}").unwrap();

        let info = probe_project(dir.path(), &Logger::default()).unwrap();
        assert_eq!(info.source_files.len(), 1);
        assert_eq!(info.test_files.len(), 1);
    }
}
