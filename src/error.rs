use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The kind of entity involved in a keyed-map operation.
///
/// Used by [`Error::DuplicateKey`] and [`Error::NotFound`] so messages can
/// say which mapping was involved without a separate variant per entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    File,
    Program,
    Run,
    Sample,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Program => "program",
            Self::Run => "run",
            Self::Sample => "sample",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by the provenance model.
///
/// All errors propagate to the caller immediately; there is no retry or
/// silent-recovery path. A nonzero exit code from an executed command is
/// *not* an error — it is recorded on the [`Run`](crate::models::Run) as
/// [`RunStatus::Failure`](crate::models::RunStatus::Failure).
#[derive(Debug, Error)]
pub enum Error {
    /// A tag or name already exists in the target mapping. The mapping is
    /// left unchanged.
    #[error("duplicate {kind} key '{key}'")]
    DuplicateKey { kind: EntityKind, key: String },

    /// A lookup key was absent from its mapping.
    #[error("{kind} '{key}' not found")]
    NotFound { kind: EntityKind, key: String },

    /// The process layer could not be invoked at all (missing executable,
    /// permission denied). Distinct from a nonzero exit status.
    #[error("failed to dispatch command '{cmd}': {source}")]
    ExecutionDispatch {
        cmd: String,
        #[source]
        source: io::Error,
    },

    /// A document could not be parsed or is structurally incompatible with
    /// the project graph.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// File I/O while reading or writing a persisted document.
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn duplicate(kind: EntityKind, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            kind,
            key: key.into(),
        }
    }

    pub(crate) fn not_found(kind: EntityKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
