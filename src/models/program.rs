use std::process::Command;

use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{EntityKind, Error, Result};
use crate::models::{Run, Sample};

/// A single command-line token.
///
/// Immutable once constructed. No validation is performed — arbitrary
/// strings, including shell metacharacters, are accepted verbatim (they only
/// gain shell meaning when the owning program runs in raw shell mode).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameter {
    value: String,
}

impl Parameter {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl From<&str> for Parameter {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Parameter {
    fn from(value: String) -> Self {
        Self { value }
    }
}

/// A named external command plus its parameters and execution history.
///
/// The command string is always rebuilt from the name and the current
/// parameter sequence — never cached — so it reflects every
/// [`add_parameter`](Program::add_parameter) immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    /// Dispatch the whole command string through `sh -c` instead of
    /// spawning the executable with an argument vector. Opt-in: it enables
    /// redirection and pipes embedded in parameter values (e.g. a
    /// `"> out.txt"` parameter), at the cost of shell injection if
    /// parameter values are untrusted.
    #[serde(default)]
    pub shell: bool,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default, with = "crate::store::keyed_list")]
    runs: IndexMap<String, Run>,
}

impl Program {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shell: false,
            parameters: Vec::new(),
            runs: IndexMap::new(),
        }
    }

    /// Appends a parameter. Order is significant (it determines command
    /// order) and duplicates are allowed.
    pub fn add_parameter(&mut self, parameter: Parameter) {
        self.parameters.push(parameter);
    }

    pub fn add_parameters(&mut self, parameters: impl IntoIterator<Item = Parameter>) {
        self.parameters.extend(parameters);
    }

    /// The full command string: name followed by each parameter value in
    /// insertion order, space-separated.
    pub fn cmd(&self) -> String {
        let mut cmd = self.name.clone();
        for parameter in &self.parameters {
            cmd.push(' ');
            cmd.push_str(parameter.value());
        }
        cmd
    }

    /// Recorded executions, keyed by run id in execution order.
    pub fn runs(&self) -> &IndexMap<String, Run> {
        &self.runs
    }

    pub fn get_run(&self, id: &str) -> Result<&Run> {
        self.runs
            .get(id)
            .ok_or_else(|| Error::not_found(EntityKind::Run, id))
    }

    /// The most recent run, if any.
    pub fn last_run(&self) -> Option<&Run> {
        self.runs.values().last()
    }

    /// Executes the command, blocking until the process exits, and records
    /// the outcome as a new [`Run`].
    ///
    /// Stdout and stderr are captured in full. Exit code 0 finalizes the
    /// run as [`Success`], anything else as [`Failure`] — a nonzero exit is
    /// recorded provenance, not an error. The returned `Err` case is
    /// reserved for dispatch failures: the executable or shell could not be
    /// invoked at all, and no run is recorded.
    ///
    /// Run ids are sequential per program (`"1"`, `"2"`, …), assigned at
    /// creation and never reused — the next id follows the highest existing
    /// one, so a loaded document with gaps in its run history can never have
    /// a historical run overwritten.
    ///
    /// [`Success`]: crate::models::RunStatus::Success
    /// [`Failure`]: crate::models::RunStatus::Failure
    pub fn run(&mut self) -> Result<&Run> {
        let cmd = self.cmd();
        let id = self.next_run_id();
        let mut run = Run::started(id.clone(), Utc::now());
        tracing::debug!(program = %self.name, run = %id, %cmd, "dispatching");

        let output = if self.shell {
            Command::new("sh").arg("-c").arg(&cmd).output()
        } else {
            Command::new(&self.name)
                .args(self.parameters.iter().map(Parameter::value))
                .output()
        }
        .map_err(|source| Error::ExecutionDispatch { cmd, source })?;

        run.finalize(
            String::from_utf8_lossy(&output.stdout).into_owned(),
            String::from_utf8_lossy(&output.stderr).into_owned(),
            output.status.success(),
        );
        tracing::debug!(program = %self.name, run = %id, status = run.status.as_str(), "finished");

        self.runs.insert(id.clone(), run);
        Ok(&self.runs[&id])
    }

    fn next_run_id(&self) -> String {
        let max = self
            .runs
            .keys()
            .filter_map(|id| id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (max + 1).to_string()
    }
}

/// A reusable program template, instantiated per sample.
///
/// Workflow steps are presets: the fixed part of the command (name and
/// leading parameters) is shared, and each sample contributes the files
/// named by `input_tags`, resolved to paths and appended as trailing
/// parameters in tag order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetProgram {
    pub name: String,
    #[serde(default)]
    pub shell: bool,
    #[serde(default)]
    pub params: Vec<Parameter>,
    /// File tags looked up on the sample at instantiation time.
    #[serde(default)]
    pub input_tags: Vec<String>,
}

impl PresetProgram {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shell: false,
            params: Vec::new(),
            input_tags: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: impl IntoIterator<Item = Parameter>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn with_input_tags(
        mut self,
        tags: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.input_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_shell(mut self, shell: bool) -> Self {
        self.shell = shell;
        self
    }

    /// Builds a concrete [`Program`] for one sample.
    ///
    /// Fails with `NotFound` if the sample has no file under one of the
    /// input tags. A tagged file that is missing on disk only logs a
    /// warning — existence is validated lazily, and the command itself will
    /// record the failure as a run.
    pub fn instantiate(&self, sample: &Sample) -> Result<Program> {
        let mut program = Program::new(&self.name);
        program.shell = self.shell;
        program.add_parameters(self.params.iter().cloned());

        for tag in &self.input_tags {
            let file = sample.file(tag)?;
            if !file.exists() {
                tracing::warn!(
                    sample = %sample.name,
                    tag = %tag,
                    path = %file.path.display(),
                    "input file does not exist"
                );
            }
            program.add_parameter(Parameter::new(file.path.to_string_lossy()));
        }

        Ok(program)
    }
}
