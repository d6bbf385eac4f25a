use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded execution of a [`Program`](crate::models::Program).
///
/// Runs are created exclusively by [`Program::run`] and are historical
/// records: deserializing a project never re-executes anything. Fields are
/// write-once — set when the process starts (`start_time`, `Pending`
/// status) and finalized when it exits (`end_time`, captured output, and a
/// terminal status derived from the exit code).
///
/// [`Program::run`]: crate::models::Program::run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    /// Sequential identifier assigned by the owning program: `"1"`, `"2"`, …
    pub id: String,
    pub start_time: DateTime<Utc>,
    /// `None` while the run is still pending.
    pub end_time: Option<DateTime<Utc>>,
    pub stdout: String,
    pub stderr: String,
    pub status: RunStatus,
}

impl Run {
    /// A run in its initial in-flight state.
    pub(crate) fn started(id: String, start_time: DateTime<Utc>) -> Self {
        Self {
            id,
            start_time,
            end_time: None,
            stdout: String::new(),
            stderr: String::new(),
            status: RunStatus::Pending,
        }
    }

    /// Finalizes the record at process exit. `Pending → {Success, Failure}`
    /// is the only transition; a finalized run is never touched again.
    pub(crate) fn finalize(&mut self, stdout: String, stderr: String, exit_ok: bool) {
        self.end_time = Some(Utc::now());
        self.stdout = stdout;
        self.stderr = stderr;
        self.status = if exit_ok {
            RunStatus::Success
        } else {
            RunStatus::Failure
        };
    }

    /// Wall-clock duration, available once the run has finished.
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.end_time.map(|end| end - self.start_time)
    }
}

/// The lifecycle status of a run.
///
/// - `Pending`: process dispatched, not yet exited
/// - `Success`: exit code 0
/// - `Failure`: nonzero exit code (still a normal, recorded outcome — a
///   failed command is provenance too, not an error)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Pending,
    Success,
    Failure,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "success" => Some(Self::Success),
            "failure" => Some(Self::Failure),
            _ => None,
        }
    }
}
