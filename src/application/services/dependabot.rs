//! Dependabot configuration generation

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::application::services::DetectService;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::dependabot::GENERATED_HEADER;
use crate::domain::{DependabotConfig, Ecosystem, ExcludeSet};
use crate::infrastructure::traits::FileSystem;

/// Service that turns detected ecosystems into a `dependabot.yml`.
pub struct DependabotService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl DependabotService {
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// Ecosystems under `root` with their directories, minus excluded ones.
    ///
    /// Ecosystems left without directories are dropped.
    pub fn collect(
        &self,
        root: &Path,
        exclude: &[String],
    ) -> ApplicationResult<BTreeMap<Ecosystem, Vec<String>>> {
        let exclude = ExcludeSet::new(exclude)?;
        let found = DetectService::new(Arc::clone(&self.settings)).detect_ecosystems(root);

        let mut ecosystems = BTreeMap::new();
        for (ecosystem, dirs) in found {
            let (excluded, kept): (Vec<String>, Vec<String>) =
                dirs.into_iter().partition(|d| exclude.is_excluded(d));
            if !excluded.is_empty() {
                debug!("collect: {} excluded {:?}", ecosystem, excluded);
            }
            if !kept.is_empty() {
                ecosystems.insert(ecosystem, kept);
            }
        }
        Ok(ecosystems)
    }

    /// Full document text: generated-file comment followed by YAML.
    pub fn generate(&self, root: &Path, exclude: &[String]) -> ApplicationResult<String> {
        let ecosystems = self.collect(root, exclude)?;
        let config = DependabotConfig::new(&ecosystems, &self.settings.dependabot.policy());
        let yaml = serde_yaml_ng::to_string(&config).map_err(|e| ApplicationError::Serialize {
            what: "dependabot configuration",
            message: e.to_string(),
        })?;
        Ok(format!("{GENERATED_HEADER}{yaml}"))
    }

    /// Write the document, creating parent directories.
    pub fn write(&self, output: &Path, document: &str) -> ApplicationResult<()> {
        self.fs
            .ensure_parent(output)
            .with_path_context("create parent directory of", output)?;
        self.fs
            .write(output, document)
            .with_path_context("write", output)?;
        debug!("write: output={}", output.display());
        Ok(())
    }
}
