//! Provenance tracking for bioinformatics workflows.
//!
//! The crate models a small ownership tree — [`Project`](models::Project) →
//! [`Sample`](models::Sample) → [`File`](models::File) /
//! [`Program`](models::Program) → [`Parameter`](models::Parameter) /
//! [`Run`](models::Run) — with two mechanisms layered on top:
//!
//! - **Execution**: [`Program::run`](models::Program::run) builds a command
//!   from its ordered parameters, blocks until the process exits, and
//!   records the outcome (timing, captured output, exit-derived status) as
//!   an immutable [`Run`](models::Run). A failed command is provenance, not
//!   an error.
//! - **Persistence**: a project serializes to a single order-preserving
//!   JSON document and reconstructs losslessly with [`from_json`].
//!
//! [`workflow`] adds a thin driver that applies preset program steps across
//! every sample of a project.

pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod workflow;

pub use error::{Error, Result};
pub use store::{from_json, from_json_str};
