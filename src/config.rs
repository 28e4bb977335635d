//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/reposync/reposync.toml`
//! 3. Repository config: `<dir>/.reposync.toml`
//! 4. Environment variables: `REPOSYNC_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::application::ApplicationError;
use crate::domain::UpdatePolicy;

/// Dependabot generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DependabotSettings {
    /// Output file, relative to the target directory
    pub output: PathBuf,
    /// Update schedule interval (daily, weekly, monthly)
    pub interval: String,
    /// Day of the week for weekly schedules
    pub day: String,
    /// Labels attached to every update PR
    pub labels: Vec<String>,
    /// Directory patterns never listed in the configuration
    pub exclude: Vec<String>,
}

impl Default for DependabotSettings {
    fn default() -> Self {
        Self {
            output: PathBuf::from(".github/dependabot.yml"),
            interval: "weekly".into(),
            day: "monday".into(),
            labels: vec!["dependencies".into()],
            // dev tooling at the root is kept out of production updates
            exclude: vec!["/tools".into()],
        }
    }
}

impl DependabotSettings {
    pub fn policy(&self) -> UpdatePolicy {
        UpdatePolicy {
            interval: self.interval.clone(),
            day: self.day.clone(),
            labels: self.labels.clone(),
        }
    }
}

/// Raw dependabot settings (arrays are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawDependabotSettings {
    pub output: Option<PathBuf>,
    pub interval: Option<String>,
    pub day: Option<String>,
    pub labels: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub log_level: Option<String>,
    pub templates_dir: Option<PathBuf>,
    pub exclude_dirs: Option<Vec<String>>,
    pub header_source: Option<String>,
    pub dependabot: RawDependabotSettings,
}

/// Unified configuration for reposync.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Minimum level of structured log output (error, warn, info, debug, trace)
    pub log_level: String,
    /// Template tree used by `sync`
    pub templates_dir: PathBuf,
    /// Directory names never descended into while detecting
    pub exclude_dirs: Vec<String>,
    /// Name written into managed/unmanaged file headers
    pub header_source: String,
    pub dependabot: DependabotSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            templates_dir: default_templates_dir(),
            exclude_dirs: vec![".git".into(), "vendor".into(), "node_modules".into()],
            header_source: "reposync".into(),
            dependabot: DependabotSettings::default(),
        }
    }
}

/// `$TMP_REPO_PATH/templates`, where the template repository is checked out.
fn default_templates_dir() -> PathBuf {
    let checkout = std::env::var("TMP_REPO_PATH").unwrap_or_else(|_| ".tmp_repo".into());
    PathBuf::from(checkout).join("templates")
}

/// Get the XDG config directory for reposync.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "reposync").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("reposync.toml"))
}

/// Get the path to the repository config file.
pub fn repo_config_path(repo_dir: &Path) -> PathBuf {
    repo_dir.join(".reposync.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`, leaving the input untouched on failure.
fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// Base order is kept; new items follow in overlay order.
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let removed: HashSet<&str> = overlay
            .iter()
            .filter_map(|p| p.strip_prefix('!'))
            .collect();

        let mut result: Vec<String> = Vec::new();
        for item in base
            .iter()
            .chain(overlay.iter().filter(|p| !p.starts_with('!')))
        {
            if removed.contains(item.as_str()) || result.contains(item) {
                continue;
            }
            result.push(item.clone());
        }
        result
    }

    fn merge_opt(base: &[String], overlay: &Option<Vec<String>>) -> Vec<String> {
        overlay
            .as_ref()
            .map(|o| Self::merge_array(base, o))
            .unwrap_or_else(|| base.to_vec())
    }

    /// Merge repository config onto self (base).
    ///
    /// - Scalar options: overlay wins if Some, otherwise keep base
    /// - Arrays: union merge with negation support
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let d = &overlay.dependabot;
        Self {
            log_level: overlay.log_level.clone().unwrap_or_else(|| self.log_level.clone()),
            templates_dir: overlay
                .templates_dir
                .clone()
                .unwrap_or_else(|| self.templates_dir.clone()),
            exclude_dirs: Self::merge_opt(&self.exclude_dirs, &overlay.exclude_dirs),
            header_source: overlay
                .header_source
                .clone()
                .unwrap_or_else(|| self.header_source.clone()),
            dependabot: DependabotSettings {
                output: d.output.clone().unwrap_or_else(|| self.dependabot.output.clone()),
                interval: d.interval.clone().unwrap_or_else(|| self.dependabot.interval.clone()),
                day: d.day.clone().unwrap_or_else(|| self.dependabot.day.clone()),
                labels: Self::merge_opt(&self.dependabot.labels, &d.labels),
                exclude: Self::merge_opt(&self.dependabot.exclude, &d.exclude),
            },
        }
    }

    /// Apply global config onto defaults with REPLACE semantics for arrays.
    ///
    /// Unlike `merge_with()`, arrays given in the global file replace the
    /// compiled defaults entirely.
    fn apply_global(&self, global: &RawSettings) -> Self {
        let d = &global.dependabot;
        Self {
            log_level: global.log_level.clone().unwrap_or_else(|| self.log_level.clone()),
            templates_dir: global
                .templates_dir
                .clone()
                .unwrap_or_else(|| self.templates_dir.clone()),
            exclude_dirs: global
                .exclude_dirs
                .clone()
                .unwrap_or_else(|| self.exclude_dirs.clone()),
            header_source: global
                .header_source
                .clone()
                .unwrap_or_else(|| self.header_source.clone()),
            dependabot: DependabotSettings {
                output: d.output.clone().unwrap_or_else(|| self.dependabot.output.clone()),
                interval: d.interval.clone().unwrap_or_else(|| self.dependabot.interval.clone()),
                day: d.day.clone().unwrap_or_else(|| self.dependabot.day.clone()),
                labels: d.labels.clone().unwrap_or_else(|| self.dependabot.labels.clone()),
                exclude: d.exclude.clone().unwrap_or_else(|| self.dependabot.exclude.clone()),
            },
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.templates_dir.to_string_lossy().as_ref());
        self.templates_dir = PathBuf::from(expanded);

        let expanded = expand_env_vars(self.dependabot.output.to_string_lossy().as_ref());
        self.dependabot.output = PathBuf::from(expanded);
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `repo_dir` - Optional target directory holding a `.reposync.toml`
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE
    /// - Global → Repository: UNION with `!item` negation
    /// - Any → Env vars: REPLACE
    pub fn load(repo_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(dir) = repo_dir {
            let local_path = repo_config_path(dir);
            if local_path.is_file() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply REPOSYNC_* environment variables as explicit overrides.
    ///
    /// `__` separates nested keys (`REPOSYNC_DEPENDABOT__DAY`), `,` separates
    /// list items (`REPOSYNC_EXCLUDE_DIRS=.git,target`).
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("REPOSYNC")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("exclude_dirs")
                .with_list_parse_key("dependabot.labels")
                .with_list_parse_key("dependabot.exclude"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("log_level") {
            settings.log_level = val;
        }
        if let Ok(val) = config.get_string("templates_dir") {
            settings.templates_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("header_source") {
            settings.header_source = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("exclude_dirs") {
            settings.exclude_dirs = val;
        }
        if let Ok(val) = config.get_string("dependabot.output") {
            settings.dependabot.output = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("dependabot.interval") {
            settings.dependabot.interval = val;
        }
        if let Ok(val) = config.get_string("dependabot.day") {
            settings.dependabot.day = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("dependabot.labels") {
            settings.dependabot.labels = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("dependabot.exclude") {
            settings.dependabot.exclude = val;
        }

        Ok(settings)
    }

    /// Parsed `log_level`.
    pub fn level(&self) -> Result<Level, ApplicationError> {
        Level::from_str(self.log_level.trim()).map_err(|_| ApplicationError::Config {
            message: format!("invalid log_level: {}", self.log_level),
        })
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn given_defaults_when_created_then_have_expected_values() {
        let settings = Settings::default();
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.exclude_dirs, strings(&[".git", "vendor", "node_modules"]));
        assert_eq!(settings.dependabot.output, PathBuf::from(".github/dependabot.yml"));
        assert_eq!(settings.dependabot.exclude, strings(&["/tools"]));
        assert!(settings.templates_dir.ends_with("templates"));
    }

    #[test]
    fn given_tilde_in_templates_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            templates_dir: PathBuf::from("~/templates"),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(
            settings.templates_dir.to_string_lossy().starts_with(&home),
            "templates_dir should start with home dir: {}",
            settings.templates_dir.display()
        );
    }

    #[test]
    fn given_level_names_when_parsed_then_case_insensitive() {
        let mut settings = Settings::default();
        assert_eq!(settings.level().unwrap(), Level::INFO);

        settings.log_level = "DEBUG".into();
        assert_eq!(settings.level().unwrap(), Level::DEBUG);

        settings.log_level = "loud".into();
        assert!(settings.level().is_err());
    }

    // ========================================
    // Tests for merge_array union semantics
    // ========================================

    #[test]
    fn test_merge_array_union() {
        let result = Settings::merge_array(&strings(&["a", "b"]), &strings(&["c"]));
        assert_eq!(result, strings(&["a", "b", "c"]));
    }

    #[test]
    fn test_merge_array_negation() {
        let result = Settings::merge_array(&strings(&["a", "b"]), &strings(&["!a", "c"]));
        assert_eq!(result, strings(&["b", "c"]));
    }

    #[test]
    fn test_merge_array_negation_nonexistent() {
        let result = Settings::merge_array(&strings(&["a"]), &strings(&["!zzz"]));
        assert_eq!(result, strings(&["a"]));
    }

    #[test]
    fn test_merge_array_duplicates() {
        let result = Settings::merge_array(&strings(&["a", "b"]), &strings(&["b", "a", "c"]));
        assert_eq!(result, strings(&["a", "b", "c"]));
    }

    #[test]
    fn test_apply_global_replaces_arrays() {
        let global = RawSettings {
            exclude_dirs: Some(strings(&["target"])),
            dependabot: RawDependabotSettings {
                exclude: Some(vec![]),
                ..Default::default()
            },
            ..Default::default()
        };

        let result = Settings::default().apply_global(&global);

        assert_eq!(result.exclude_dirs, strings(&["target"]));
        assert!(result.dependabot.exclude.is_empty());
        assert_eq!(result.dependabot.labels, strings(&["dependencies"]));
    }

    #[test]
    fn test_merge_with_unions_arrays_and_overrides_scalars() {
        let local = RawSettings {
            header_source: Some("acme/github".into()),
            exclude_dirs: Some(strings(&["dist", "!vendor"])),
            dependabot: RawDependabotSettings {
                day: Some("friday".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let result = Settings::default().merge_with(&local);

        assert_eq!(result.header_source, "acme/github");
        assert_eq!(result.exclude_dirs, strings(&[".git", "node_modules", "dist"]));
        assert_eq!(result.dependabot.day, "friday");
        assert_eq!(result.dependabot.interval, "weekly");
    }
}
