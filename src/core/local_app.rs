//! Local app project detection.
//!
//! An app project is any directory holding a `stratus_app.json` file. Commands
//! run from inside a project (or any of its subdirectories) see it as the
//! current app.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::app::{AppConfigVersion, DeploymentModel, Location};
use crate::error::{Error, Result};
use crate::utils::io;

pub const FILE_NAME: &str = "stratus_app.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub config_version: AppConfigVersion,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_model: Option<DeploymentModel>,
}

#[derive(Debug, Clone)]
pub struct LocalApp {
    pub root_dir: PathBuf,
    pub config: AppConfig,
}

impl LocalApp {
    /// The value used to refer to this app in remote lookups: its id when linked, else its name.
    pub fn identifier(&self) -> Option<&str> {
        self.config
            .app_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| Some(self.config.name.as_str()).filter(|name| !name.is_empty()))
    }
}

/// Find the app project containing `dir`, searching `dir` and then its ancestors.
pub fn load(dir: &Path) -> Result<Option<LocalApp>> {
    for candidate in dir.ancestors() {
        let path = candidate.join(FILE_NAME);
        if !path.is_file() {
            continue;
        }

        let config: AppConfig = io::read_json(&path, "read app config")?;
        log::debug!("Found app config at {}", path.display());
        return Ok(Some(LocalApp {
            root_dir: candidate.to_path_buf(),
            config,
        }));
    }
    Ok(None)
}

/// Write an app config into `root_dir`, returning the file path.
pub fn write(root_dir: &Path, config: &AppConfig) -> Result<PathBuf> {
    std::fs::create_dir_all(root_dir).map_err(|e| {
        Error::internal_io(e.to_string(), Some("create app directory".to_string()))
    })?;

    let path = root_dir.join(FILE_NAME);
    let content = serde_json::to_string_pretty(config).map_err(|e| {
        Error::internal_json(e.to_string(), Some("serialize app config".to_string()))
    })?;
    io::write_file_atomic(&path, &content, "write app config")?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_config() -> AppConfig {
        AppConfig {
            config_version: AppConfigVersion::DEFAULT,
            name: "todo".to_string(),
            app_id: None,
            location: Some(Location::Ireland),
            deployment_model: Some(DeploymentModel::Local),
        }
    }

    #[test]
    fn load_returns_none_outside_a_project() {
        let dir = TempDir::new().unwrap();
        assert!(load(dir.path()).unwrap().is_none());
    }

    #[test]
    fn load_finds_project_from_nested_directory() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), &sample_config()).unwrap();
        let nested = dir.path().join("functions").join("src");
        std::fs::create_dir_all(&nested).unwrap();

        let app = load(&nested).unwrap().unwrap();

        assert_eq!(app.root_dir, dir.path());
        assert_eq!(app.config, sample_config());
    }

    #[test]
    fn written_config_uses_camel_case_keys() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), &sample_config()).unwrap();
        let content = std::fs::read_to_string(path).unwrap();

        assert!(content.contains("\"configVersion\": 20210101"));
        assert!(content.contains("\"deploymentModel\": \"LOCAL\""));
        assert!(!content.contains("appId"));
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(FILE_NAME), "[]").unwrap();

        let err = load(dir.path()).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_json");
    }

    #[test]
    fn identifier_prefers_app_id_over_name() {
        let mut app = LocalApp {
            root_dir: PathBuf::from("/apps/todo"),
            config: sample_config(),
        };
        assert_eq!(app.identifier(), Some("todo"));

        app.config.app_id = Some("todo-abcde".to_string());
        assert_eq!(app.identifier(), Some("todo-abcde"));

        app.config.app_id = None;
        app.config.name.clear();
        assert_eq!(app.identifier(), None);
    }
}
