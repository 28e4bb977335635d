//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, Logger)
//! but are themselves concrete structs, not traits.

mod dependabot;
mod detect;
mod sync;

pub use dependabot::DependabotService;
pub use detect::{Detection, DetectService};
pub use sync::{SyncReport, SyncService};
