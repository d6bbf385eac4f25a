//! Domain models for the provenance graph.
//!
//! # Core Concepts
//!
//! The graph is a simple ownership tree:
//!
//! - [`Project`]: top-level container of samples plus project-level files.
//! - [`Sample`]: a named biological entity owning tagged [`File`]s and named
//!   [`Program`]s, with free-form scalar [`AttributeValue`]s.
//! - [`Program`]: an external command built from ordered [`Parameter`]s; each
//!   execution is recorded as a [`Run`].
//! - [`Run`]: one historical execution — timing, captured output, and a
//!   terminal [`RunStatus`]. Never re-executed on load.
//! - [`PresetProgram`]: a program template instantiated per sample by
//!   resolving file tags to paths; the building block of workflow steps.
//!
//! Every tag/name-keyed collection is an insertion-ordered map, so a
//! serialized project round-trips with its ordering intact.

mod file;
mod program;
mod project;
mod run;
mod sample;

pub use file::*;
pub use program::*;
pub use project::*;
pub use run::*;
pub use sample::*;

use indexmap::IndexMap;

use crate::error::{EntityKind, Error, Result};

/// Validates a batch insert against an existing map and within itself, so a
/// collision leaves the target untouched.
pub(crate) fn check_batch<'a, V>(
    map: &IndexMap<String, V>,
    keys: impl Iterator<Item = &'a str>,
    kind: EntityKind,
) -> Result<()> {
    let mut seen = Vec::new();
    for key in keys {
        if map.contains_key(key) || seen.contains(&key) {
            return Err(Error::duplicate(kind, key));
        }
        seen.push(key);
    }
    Ok(())
}
