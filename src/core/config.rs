//! User configuration
//!
//! Project config (`.gearguard/config.yaml`) wins over the global config in
//! the platform config directory, which wins over built-in defaults. The
//! config supplies the session user's display name (stamped on worksheet
//! comments) and the default company for new records.

use serde::Deserialize;
use std::path::Path;

use crate::core::project::Project;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display name of the session user
    pub user: Option<String>,

    /// Default company stamped onto new records
    pub company: Option<String>,
}

impl Config {
    /// Load configuration for a project
    pub fn load(project: &Project) -> Self {
        let project_config = Self::read_file(&project.data_dir().join("config.yaml"));
        let global_config = Self::global();
        project_config.or_else(global_config)
    }

    /// Load only the global configuration (used outside a project)
    pub fn global() -> Self {
        directories::ProjectDirs::from("com", "gearguard", "gearguard")
            .map(|dirs| Self::read_file(&dirs.config_dir().join("config.yaml")))
            .unwrap_or_default()
    }

    fn read_file(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_yml::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Fill unset fields from a fallback config
    fn or_else(mut self, fallback: Self) -> Self {
        self.user = self.user.or(fallback.user);
        self.company = self.company.or(fallback.company);
        self
    }

    /// The session user's display name, for comment authorship
    pub fn user(&self) -> String {
        self.user
            .clone()
            .or_else(|| std::env::var("GEARGUARD_USER").ok())
            .or_else(|| std::env::var("USER").ok())
            .unwrap_or_else(|| "Technician".to_string())
    }

    pub fn company(&self) -> String {
        self.company.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_project_config_is_read() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        std::fs::write(
            project.data_dir().join("config.yaml"),
            "user: Jane Smith\ncompany: GearGuard Inc\n",
        )
        .unwrap();

        let config = Config::load(&project);
        assert_eq!(config.user(), "Jane Smith");
        assert_eq!(config.company(), "GearGuard Inc");
    }

    #[test]
    fn test_missing_config_falls_back() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();

        let config = Config::load(&project);
        // user() falls back to environment or the built-in default
        assert!(!config.user().is_empty());
        assert_eq!(config.company(), "");
    }

    #[test]
    fn test_or_else_prefers_self() {
        let project = Config {
            user: Some("Project User".into()),
            company: None,
        };
        let global = Config {
            user: Some("Global User".into()),
            company: Some("Global Co".into()),
        };

        let merged = project.or_else(global);
        assert_eq!(merged.user.as_deref(), Some("Project User"));
        assert_eq!(merged.company.as_deref(), Some("Global Co"));
    }
}
