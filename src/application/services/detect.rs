//! Project type and dependency ecosystem detection
//!
//! Project types drive template selection during sync; ecosystems drive
//! dependabot generation. Both come from one walk of the target directory,
//! with different pruning:
//! - project walks skip `exclude_dirs` and every hidden directory
//! - ecosystem walks skip only `exclude_dirs` (`.devcontainer/` holds an indicator)

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::application::scan::{scan_tree, ScanOptions};
use crate::config::Settings;
use crate::domain::{Ecosystem, ProjectType};

/// Everything found in a directory tree.
///
/// Directories are root-relative and `/`-separated; the root is `.`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detection {
    pub projects: BTreeMap<ProjectType, Vec<String>>,
    pub ecosystems: BTreeMap<Ecosystem, Vec<String>>,
}

impl Detection {
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.ecosystems.is_empty()
    }
}

/// Service for detecting what a repository contains.
pub struct DetectService {
    settings: Arc<Settings>,
}

impl DetectService {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// Directories holding each project type.
    pub fn detect_projects(&self, root: &Path) -> BTreeMap<ProjectType, Vec<String>> {
        debug!("detect_projects: root={}", root.display());
        let listings = scan_tree(
            root,
            ScanOptions {
                exclude_dirs: &self.settings.exclude_dirs,
                skip_hidden: true,
            },
        );

        let mut projects: BTreeMap<ProjectType, Vec<String>> = BTreeMap::new();
        for listing in &listings {
            for project_type in ProjectType::ALL {
                if project_type.matches(&listing.files, &listing.dirs) {
                    projects
                        .entry(project_type)
                        .or_default()
                        .push(listing.rel.clone());
                }
            }
        }
        projects
    }

    /// Directories holding each dependency ecosystem.
    pub fn detect_ecosystems(&self, root: &Path) -> BTreeMap<Ecosystem, Vec<String>> {
        debug!("detect_ecosystems: root={}", root.display());
        let listings = scan_tree(
            root,
            ScanOptions {
                exclude_dirs: &self.settings.exclude_dirs,
                skip_hidden: false,
            },
        );

        let mut ecosystems: BTreeMap<Ecosystem, BTreeSet<String>> = BTreeMap::new();
        for listing in &listings {
            for ecosystem in listing.files.iter().filter_map(|f| Ecosystem::from_indicator(f)) {
                ecosystems
                    .entry(ecosystem)
                    .or_default()
                    .insert(listing.rel.clone());
            }
        }
        ecosystems
            .into_iter()
            .map(|(ecosystem, dirs)| (ecosystem, dirs.into_iter().collect()))
            .collect()
    }

    pub fn detect(&self, root: &Path) -> Detection {
        Detection {
            projects: self.detect_projects(root),
            ecosystems: self.detect_ecosystems(root),
        }
    }
}
