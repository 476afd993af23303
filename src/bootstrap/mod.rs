//! Bootstrap orchestration layer
//!
//! # Modules
//!
//! - [`error`]: Failure classes of a run and their exit codes
//! - [`install`]: Cached installation directory layout
//! - [`launcher`]: Build subprocess and output relay
//! - [`orchestrator`]: Stage-by-stage pipeline driver

pub mod error;
pub mod install;
pub mod launcher;
pub mod orchestrator;
