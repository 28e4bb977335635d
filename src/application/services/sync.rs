//! Template sync service
//!
//! Copies workflow and configuration files from a template tree into a
//! repository:
//! - managed files are always overwritten
//! - unmanaged files are only copied when the destination does not exist
//! - files accepting `#` comments get a header saying which kind they are
//!
//! Template layout (`<kind>` is `managed` or `unmanaged`):
//!
//! ```text
//! <kind>/common/workflows/*.yml            -> .github/workflows/<kind>-<name>
//! <kind>/common/files/root/*               -> <repo>/
//! <kind>/project/<type>/workflows/*.yml    -> .github/workflows/<kind>-<name>
//! <kind>/project/<type>/files/root/*       -> <repo>/
//! <kind>/project/<type>/files/project/*    -> every <type> project directory
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use itertools::Itertools;
use tracing::debug;

use crate::application::services::DetectService;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{supports_header, Header, HeaderKind};
use crate::infrastructure::logger::Logger;
use crate::infrastructure::traits::FileSystem;

/// Workflow that keeps its name so the sync workflow can find itself.
const SYNC_WORKFLOW: &str = "sync.yml";

/// Placeholder kept in empty template directories.
const GITKEEP: &str = ".gitkeep";

/// Outcome of one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Managed files written
    pub updated: Vec<PathBuf>,
    /// Unmanaged files copied for the first time
    pub added: Vec<PathBuf>,
    /// Unmanaged files left alone because they already exist
    pub skipped: Vec<PathBuf>,
}

/// One template directory and where its files go.
#[derive(Debug, Clone)]
struct Mapping {
    source: PathBuf,
    dest: PathBuf,
    kind: HeaderKind,
    /// Workflows are renamed `<kind>-<name>`; plain files keep their name
    workflows: bool,
}

/// Service for syncing template files into a repository.
pub struct SyncService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
    log: Arc<dyn Logger>,
}

impl SyncService {
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>, log: Arc<dyn Logger>) -> Self {
        Self { fs, settings, log }
    }

    /// Sync `templates` into `repo`.
    pub fn sync(&self, repo: &Path, templates: &Path) -> ApplicationResult<SyncReport> {
        debug!(
            "sync: repo={} templates={}",
            repo.display(),
            templates.display()
        );
        if !self.fs.is_dir(templates) {
            return Err(ApplicationError::TemplatesNotFound(templates.to_path_buf()));
        }

        let managed = Header::new(HeaderKind::Managed, &self.settings.header_source)?;
        let unmanaged = Header::new(HeaderKind::Unmanaged, &self.settings.header_source)?;

        let projects = DetectService::new(Arc::clone(&self.settings)).detect_projects(repo);
        for (project_type, dirs) in &projects {
            let dirs = dirs.iter().join(",");
            self.log.info(
                "Found project",
                &[("type", project_type), ("dirs", &dirs)],
            );
        }

        let workflows_dir = repo.join(".github").join("workflows");
        self.fs
            .create_dir_all(&workflows_dir)
            .with_path_context("create", &workflows_dir)?;

        let mut mappings = Vec::new();
        for kind in [HeaderKind::Managed, HeaderKind::Unmanaged] {
            mappings.push(Mapping {
                source: templates.join(kind.as_str()).join("common").join("workflows"),
                dest: workflows_dir.clone(),
                kind,
                workflows: true,
            });
        }
        for project_type in projects.keys() {
            for kind in [HeaderKind::Managed, HeaderKind::Unmanaged] {
                mappings.push(Mapping {
                    source: project_templates(templates, kind, project_type.as_str())
                        .join("workflows"),
                    dest: workflows_dir.clone(),
                    kind,
                    workflows: true,
                });
            }
        }

        for kind in [HeaderKind::Managed, HeaderKind::Unmanaged] {
            mappings.push(Mapping {
                source: templates
                    .join(kind.as_str())
                    .join("common")
                    .join("files")
                    .join("root"),
                dest: repo.to_path_buf(),
                kind,
                workflows: false,
            });
        }
        for (project_type, dirs) in &projects {
            for kind in [HeaderKind::Managed, HeaderKind::Unmanaged] {
                let files = project_templates(templates, kind, project_type.as_str()).join("files");
                mappings.push(Mapping {
                    source: files.join("root"),
                    dest: repo.to_path_buf(),
                    kind,
                    workflows: false,
                });
                for dir in dirs {
                    let dest = match dir.as_str() {
                        "." => repo.to_path_buf(),
                        _ => repo.join(dir),
                    };
                    mappings.push(Mapping {
                        source: files.join("project"),
                        dest,
                        kind,
                        workflows: false,
                    });
                }
            }
        }

        let mut report = SyncReport::default();
        for mapping in &mappings {
            if !self.fs.is_dir(&mapping.source) {
                continue;
            }
            debug!(
                "sync: processing {} files from {}",
                mapping.kind.as_str(),
                mapping.source.display()
            );
            let header = match mapping.kind {
                HeaderKind::Managed => &managed,
                HeaderKind::Unmanaged => &unmanaged,
            };
            self.sync_mapping(mapping, header, &mut report)?;
        }

        Ok(report)
    }

    fn sync_mapping(
        &self,
        mapping: &Mapping,
        header: &Header,
        report: &mut SyncReport,
    ) -> ApplicationResult<()> {
        let entries = self
            .fs
            .list_dir(&mapping.source)
            .with_path_context("list", &mapping.source)?;

        for src in entries {
            let Some(name) = src.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name == GITKEEP || !self.fs.is_file(&src) {
                continue;
            }
            if mapping.workflows && !name.ends_with(".yml") {
                continue;
            }

            let dest_name = if mapping.workflows && name != SYNC_WORKFLOW {
                format!("{}-{}", mapping.kind.as_str(), name)
            } else {
                name.to_string()
            };
            let dst = mapping.dest.join(dest_name);
            self.copy_file(&src, &dst, header, report)?;
        }
        Ok(())
    }

    fn copy_file(
        &self,
        src: &Path,
        dst: &Path,
        header: &Header,
        report: &mut SyncReport,
    ) -> ApplicationResult<()> {
        let managed = header.kind() == HeaderKind::Managed;
        if !managed && self.fs.exists(dst) {
            self.log
                .info("Skipping existing file", &[("path", &dst.display())]);
            report.skipped.push(dst.to_path_buf());
            return Ok(());
        }

        self.fs
            .ensure_parent(dst)
            .with_path_context("create parent directory of", dst)?;

        if supports_header(src) {
            let content = self
                .fs
                .read_to_string(src)
                .with_path_context("read", src)?;
            self.fs
                .write(dst, &header.apply(&content))
                .with_path_context("write", dst)?;
        } else {
            self.fs.copy(src, dst).with_path_context("copy", src)?;
        }

        if managed {
            self.log.info("Updated", &[("path", &dst.display())]);
            report.updated.push(dst.to_path_buf());
        } else {
            self.log.info("Added", &[("path", &dst.display())]);
            report.added.push(dst.to_path_buf());
        }
        Ok(())
    }
}

fn project_templates(templates: &Path, kind: HeaderKind, project_type: &str) -> PathBuf {
    templates
        .join(kind.as_str())
        .join("project")
        .join(project_type)
}
