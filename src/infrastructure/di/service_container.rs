//! Service container for dependency injection
//!
//! Wires up all services with their dependencies. Built once in `main` and
//! passed by reference to everything that logs or touches the filesystem.

use std::sync::Arc;

use tracing::Level;

use crate::application::services::{DependabotService, DetectService, SyncService};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::infrastructure::logger::{Logger, PlainLogger, StructuredLogger};
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding settings, I/O boundaries and both loggers.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Structured diagnostics
    pub log: Arc<dyn Logger>,

    /// Plain usage/help output
    pub usage: Arc<dyn Logger>,
}

impl ServiceContainer {
    /// Create a container with the real filesystem and stderr loggers,
    /// at the configured log level.
    pub fn new(settings: Settings) -> ApplicationResult<Self> {
        let level = settings.level()?;
        Ok(Self::stderr(settings, level))
    }

    /// Create a container with the real filesystem and stderr loggers.
    ///
    /// The structured logger's subscriber also becomes the process-wide
    /// `tracing` dispatcher, so `debug!` diagnostics inside services share
    /// its format and level.
    pub fn stderr(settings: Settings, level: Level) -> Self {
        let log = StructuredLogger::stderr(level);
        // already set when embedded in a host that configured tracing itself
        let _ = tracing::dispatcher::set_global_default(log.dispatch().clone());

        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(log),
            Arc::new(PlainLogger::stderr()),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        log: Arc<dyn Logger>,
        usage: Arc<dyn Logger>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
            log,
            usage,
        }
    }

    pub fn detect_service(&self) -> DetectService {
        DetectService::new(Arc::clone(&self.settings))
    }

    pub fn dependabot_service(&self) -> DependabotService {
        DependabotService::new(Arc::clone(&self.fs), Arc::clone(&self.settings))
    }

    pub fn sync_service(&self) -> SyncService {
        SyncService::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.settings),
            Arc::clone(&self.log),
        )
    }
}
