//! Integration tests for DependabotService.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use reposync::application::services::DependabotService;
use reposync::config::Settings;
use reposync::domain::dependabot::GENERATED_HEADER;
use reposync::domain::{DependabotConfig, Ecosystem};
use reposync::infrastructure::traits::RealFileSystem;

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
}

fn service(settings: Settings) -> DependabotService {
    DependabotService::new(Arc::new(RealFileSystem), Arc::new(settings))
}

fn sample_repo() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    touch(root, "go.mod");
    touch(root, "Dockerfile");
    touch(root, "tools/go.mod");
    touch(root, "web/package.json");
    touch(root, "services/api/go.mod");
    touch(root, "services/api/tools/go.mod");
    temp
}

#[test]
fn given_default_excludes_when_collect_then_root_tools_dropped_only() {
    // Arrange
    let repo = sample_repo();
    let settings = Settings::default();
    let exclude = settings.dependabot.exclude.clone();

    // Act
    let ecosystems = service(settings).collect(repo.path(), &exclude).unwrap();

    // Assert
    assert_eq!(
        ecosystems[&Ecosystem::Gomod],
        vec![".", "services/api", "services/api/tools"]
    );
    assert_eq!(ecosystems[&Ecosystem::Npm], vec!["web"]);
    assert_eq!(ecosystems[&Ecosystem::Docker], vec!["."]);
}

#[test]
fn given_bare_name_exclude_when_collect_then_every_component_match_dropped() {
    let repo = sample_repo();

    let ecosystems = service(Settings::default())
        .collect(repo.path(), &["tools".to_string(), "web".to_string()])
        .unwrap();

    assert_eq!(ecosystems[&Ecosystem::Gomod], vec![".", "services/api"]);
    assert!(!ecosystems.contains_key(&Ecosystem::Npm));
}

#[test]
fn given_invalid_glob_when_collect_then_error() {
    let repo = sample_repo();

    let result = service(Settings::default()).collect(repo.path(), &["src/[".to_string()]);

    assert!(result.is_err());
}

#[test]
fn given_repo_when_generate_then_header_and_parseable_yaml() {
    // Arrange
    let repo = sample_repo();
    let settings = Settings::default();
    let exclude = settings.dependabot.exclude.clone();

    // Act
    let document = service(settings).generate(repo.path(), &exclude).unwrap();

    // Assert
    let yaml = document.strip_prefix(GENERATED_HEADER).expect("generated header");
    let config: DependabotConfig = serde_yaml_ng::from_str(yaml).unwrap();
    assert_eq!(config.version, 2);

    let ecosystems: Vec<&str> = config
        .updates
        .iter()
        .map(|u| u.package_ecosystem.as_str())
        .collect();
    assert_eq!(ecosystems, vec!["github-actions", "gomod", "npm", "docker"]);

    let actions = &config.updates[0];
    assert_eq!(actions.directories, vec!["/"]);
    assert!(actions.groups["github-actions"].update_types.is_empty());

    let gomod = &config.updates[1];
    assert_eq!(
        gomod.directories,
        vec!["/", "/services/api", "/services/api/tools"]
    );
    assert_eq!(gomod.schedule.interval, "weekly");
    assert_eq!(gomod.schedule.day, "monday");
    assert_eq!(gomod.labels, vec!["dependencies"]);
    assert_eq!(
        gomod.groups["gomod-minor-patch"].update_types,
        vec!["minor", "patch"]
    );
    assert_eq!(gomod.groups["gomod-minor-patch"].patterns, vec!["*"]);
}

#[test]
fn given_yaml_when_generate_then_kebab_case_keys() {
    let repo = sample_repo();

    let document = service(Settings::default()).generate(repo.path(), &[]).unwrap();

    assert!(document.contains("package-ecosystem: gomod"));
    assert!(document.contains("update-types:"));
    assert!(!document.contains("package_ecosystem"));
}

#[test]
fn given_empty_repo_when_generate_then_github_actions_only() {
    let repo = TempDir::new().unwrap();

    let document = service(Settings::default()).generate(repo.path(), &[]).unwrap();

    let config: DependabotConfig =
        serde_yaml_ng::from_str(document.strip_prefix(GENERATED_HEADER).unwrap()).unwrap();
    assert_eq!(config.updates.len(), 1);
    assert_eq!(config.updates[0].package_ecosystem, "github-actions");
}

#[test]
fn given_nested_output_when_write_then_parents_created() {
    let repo = TempDir::new().unwrap();
    let output = repo.path().join(".github/dependabot.yml");

    service(Settings::default())
        .write(&output, "version: 2\n")
        .unwrap();

    assert_eq!(fs::read_to_string(output).unwrap(), "version: 2\n");
}
