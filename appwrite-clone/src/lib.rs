//! # Appwrite Clone
//!
//! Copies databases, collections, attributes, documents, users and teams
//! from a source Appwrite project into a target project.
//!
//! ## Flow
//!
//! 1. **Catalog**: read the source into a selection tree of databases and
//!    collections followed by the users and teams roots
//! 2. **Selection**: check the nodes to clone
//! 3. **Run**: clone every checked node in tree order; each database goes
//!    through collections, then attributes, then documents
//!
//! Every outcome is reported as one line of the run log. Write failures never
//! stop a run.
//!
//! ## Modules
//!
//! - [`config`]: Configuration from the environment and dependency wiring
//! - [`orchestrator`]: Catalog fetch and the clone run
//! - [`writers`]: Create-or-resolve writers per entity kind
//! - [`policy`]: Override policy and the generic delete-and-retry operation
//! - [`log`]: The run log
//! - [`errors`]: Error types for the tool

pub mod config;
pub mod errors;
pub mod log;
pub mod orchestrator;
pub mod policy;
pub mod writers;

pub use config::{Config, Dependencies};
pub use errors::CloneError;
pub use log::{LogSink, RunLog};
pub use orchestrator::{CloneEngine, SourceCatalog, RUN_END_MARKER, RUN_START_MARKER};
pub use policy::{create_or_replace, ConflictPolicy, WriteOutcome};
pub use writers::{DocumentOutcome, TargetWriter};
