//! reposync: detect project types, generate dependabot configuration and
//! sync workflow templates into a repository.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
