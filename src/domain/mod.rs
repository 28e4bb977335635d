//! Domain layer: project types, ecosystems, exclusion rules and file headers
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod dependabot;
pub mod ecosystem;
pub mod error;
pub mod header;
pub mod patterns;
pub mod project;

pub use dependabot::{DependabotConfig, Group, Schedule, UpdateEntry, UpdatePolicy};
pub use ecosystem::Ecosystem;
pub use error::{DomainError, DomainResult};
pub use header::{supports_header, Header, HeaderKind};
pub use patterns::{ExcludePattern, ExcludeSet};
pub use project::{Indicator, ProjectType};
