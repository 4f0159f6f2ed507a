//! Optional per-project configuration file.
//!
//! A `springlint.yaml` at the project root can pre-set scan defaults.
//! Command-line flags always win over file values.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::issue::Category;

pub const CONFIG_FILE_NAME: &str = "springlint.yaml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl ProjectConfig {
    /// Load `springlint.yaml` from the project root, if present. A missing
    /// file is not an error; a malformed one is.
    pub fn load(root: &Path) -> Result<Option<ProjectConfig>> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: ProjectConfig = serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(ProjectConfig::load(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "include:\n  - \"src/**/*.java\"\nexclude:\n  - \"**/generated/**\"\ncategories:\n  - security\n  - database\n",
        )
        .unwrap();

        let config = ProjectConfig::load(dir.path()).unwrap().unwrap();
        assert_eq!(config.include, vec!["src/**/*.java".to_string()]);
        assert_eq!(config.exclude, vec!["**/generated/**".to_string()]);
        assert_eq!(config.categories, vec![Category::Security, Category::Database]);
    }

    #[test]
    fn test_malformed_config_is_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "include: {not: [valid").unwrap();
        assert!(ProjectConfig::load(dir.path()).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "includes:\n  - \"a\"\n").unwrap();
        assert!(ProjectConfig::load(dir.path()).is_err());
    }
}
