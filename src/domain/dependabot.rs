//! Dependabot configuration document model

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::Ecosystem;

/// Comment block written above the generated YAML.
pub const GENERATED_HEADER: &str = "# This file was generated by reposync\n# Do not edit manually!\n\n";

/// Schedule and labelling shared by all update entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePolicy {
    pub interval: String,
    pub day: String,
    pub labels: Vec<String>,
}

/// Root of `.github/dependabot.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependabotConfig {
    pub version: u32,
    pub updates: Vec<UpdateEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateEntry {
    pub package_ecosystem: String,
    pub directories: Vec<String>,
    pub schedule: Schedule,
    pub groups: BTreeMap<String, Group>,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub interval: String,
    pub day: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Group {
    pub patterns: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub update_types: Vec<String>,
}

/// Render a root-relative directory the way dependabot expects it.
///
/// `.` becomes `/`, `a/b` becomes `/a/b`.
pub fn dependabot_directory(rel: &str) -> String {
    match rel.trim_start_matches("./").trim_matches('/') {
        "" | "." => "/".to_string(),
        path => format!("/{path}"),
    }
}

impl DependabotConfig {
    /// Build the document: `github-actions` first, then one entry per ecosystem.
    ///
    /// `ecosystems` maps each ecosystem to root-relative directories.
    /// Ecosystems without directories are skipped.
    pub fn new(ecosystems: &BTreeMap<Ecosystem, Vec<String>>, policy: &UpdatePolicy) -> Self {
        let mut updates = vec![Self::entry(
            Ecosystem::GithubActions,
            vec!["/".to_string()],
            Group {
                patterns: vec!["*".to_string()],
                update_types: vec![],
            },
            policy,
        )];

        for (ecosystem, dirs) in ecosystems {
            if *ecosystem == Ecosystem::GithubActions || dirs.is_empty() {
                continue;
            }
            let directories = dirs.iter().map(|d| dependabot_directory(d)).collect();
            updates.push(Self::entry(
                *ecosystem,
                directories,
                Group {
                    patterns: vec!["*".to_string()],
                    update_types: vec!["minor".to_string(), "patch".to_string()],
                },
                policy,
            ));
        }

        Self {
            version: 2,
            updates,
        }
    }

    fn entry(
        ecosystem: Ecosystem,
        directories: Vec<String>,
        group: Group,
        policy: &UpdatePolicy,
    ) -> UpdateEntry {
        let group_name = match ecosystem {
            Ecosystem::GithubActions => ecosystem.to_string(),
            _ => format!("{ecosystem}-minor-patch"),
        };
        UpdateEntry {
            package_ecosystem: ecosystem.to_string(),
            directories,
            schedule: Schedule {
                interval: policy.interval.clone(),
                day: policy.day.clone(),
            },
            groups: BTreeMap::from([(group_name, group)]),
            labels: policy.labels.clone(),
        }
    }
}
