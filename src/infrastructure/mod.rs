//! Infrastructure layer: I/O implementations, loggers and DI container
//!
//! This layer implements I/O boundary traits and wires up services.

pub mod di;
pub mod logger;
pub mod traits;

pub use di::ServiceContainer;
pub use logger::{Field, Logger, PlainLogger, SharedBuffer, StructuredLogger};
