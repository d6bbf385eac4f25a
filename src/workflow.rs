//! Workflows: a series of preset program steps run over a set of samples.
//!
//! A workflow first builds a [`Project`] from its input definition — either
//! a directory of files or a tab-delimited sample sheet — and then
//! instantiates and executes every step against every sample, recording the
//! runs on the samples themselves.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EntityKind, Error, Result};
use crate::models::{AttributeValue, File, PresetProgram, Project, RunStatus, Sample};

/// Where a workflow's samples come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum WorkflowInput {
    /// One sample per file in `path` whose extension matches; the sample is
    /// named after the file stem and the file stored under `file_tag`.
    Directory {
        path: PathBuf,
        file_tag: String,
        extensions: Vec<String>,
    },
    /// A delimited sheet: `index_col` names the sample, `file_columns`
    /// become tagged files, and every remaining column becomes a sample
    /// attribute. Referenced files must exist on disk.
    SampleSheet {
        path: PathBuf,
        index_col: String,
        file_columns: Vec<String>,
        #[serde(default = "default_sep")]
        sep: char,
    },
}

fn default_sep() -> char {
    '\t'
}

/// Outcome counts for one workflow invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowReport {
    /// Runs that finished with exit code 0.
    pub successes: usize,
    /// Runs that finished with a nonzero exit code (still recorded).
    pub failures: usize,
    /// Step instantiations or dispatches that could not execute at all.
    pub skipped: usize,
}

/// A named series of [`PresetProgram`] steps applied to every sample of a
/// project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub name: String,
    pub description: String,
    /// Tag for the project built from the input; defaults to the workflow
    /// name when `None`.
    pub tag: Option<String>,
    pub input: WorkflowInput,
    pub steps: Vec<PresetProgram>,
}

impl Workflow {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input: WorkflowInput,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            tag: None,
            input,
            steps: Vec::new(),
        }
    }

    pub fn add_step(&mut self, step: PresetProgram) {
        self.steps.push(step);
    }

    /// Builds a project from the input definition. The project carries one
    /// sample per input row or matching file, in input order.
    pub fn build_project(&self) -> Result<Project> {
        let tag = self.tag.clone().unwrap_or_else(|| self.name.clone());
        let mut project = Project::new(tag);

        match &self.input {
            WorkflowInput::Directory {
                path,
                file_tag,
                extensions,
            } => load_directory(&mut project, path, file_tag, extensions)?,
            WorkflowInput::SampleSheet {
                path,
                index_col,
                file_columns,
                sep,
            } => load_sample_sheet(&mut project, path, index_col, file_columns, *sep)?,
        }

        tracing::info!(
            workflow = %self.name,
            samples = project.len(),
            "loaded samples"
        );
        Ok(project)
    }

    /// Runs every step against every sample of `project`, recording runs on
    /// the samples.
    ///
    /// A step that cannot be instantiated for a sample (missing file tag)
    /// or dispatched at all is logged and counted as skipped; execution
    /// continues with the remaining samples. Re-running a workflow appends
    /// new runs to the programs it created previously.
    pub fn run(&self, project: &mut Project) -> WorkflowReport {
        let mut report = WorkflowReport::default();

        for step in &self.steps {
            for sample in project.samples.values_mut() {
                if !sample.programs.contains_key(&step.name) {
                    match step.instantiate(sample) {
                        Ok(program) => {
                            sample.programs.insert(step.name.clone(), program);
                        }
                        Err(e) => {
                            tracing::warn!(
                                step = %step.name,
                                sample = %sample.name,
                                error = %e,
                                "skipping step"
                            );
                            report.skipped += 1;
                            continue;
                        }
                    }
                }
                let Some(program) = sample.programs.get_mut(&step.name) else {
                    continue;
                };
                match program.run() {
                    Ok(run) => {
                        if run.status == RunStatus::Success {
                            report.successes += 1;
                        } else {
                            report.failures += 1;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            step = %step.name,
                            sample = %sample.name,
                            error = %e,
                            "could not dispatch step"
                        );
                        report.skipped += 1;
                    }
                }
            }
        }

        tracing::info!(
            workflow = %self.name,
            successes = report.successes,
            failures = report.failures,
            skipped = report.skipped,
            "workflow finished"
        );
        report
    }
}

fn load_directory(
    project: &mut Project,
    dir: &Path,
    file_tag: &str,
    extensions: &[String],
) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Error::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let matches = path
            .extension()
            .map(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
            .unwrap_or(false);
        if path.is_file() && matches {
            paths.push(path);
        }
    }
    // Directory order is filesystem-dependent; sort for a stable project.
    paths.sort();

    for path in paths {
        let file = File::new(&path, Some(file_tag.to_string()));
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let mut sample = Sample::new(name);
        sample.add_file(file)?;
        project.add_sample(sample)?;
    }
    Ok(())
}

fn load_sample_sheet(
    project: &mut Project,
    path: &Path,
    index_col: &str,
    file_columns: &[String],
    sep: char,
) -> Result<()> {
    let contents = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut lines = contents.lines();
    let header = lines
        .next()
        .ok_or_else(|| Error::Serialization(format!("sample sheet '{}' is empty", path.display())))?;
    let columns: Vec<&str> = header.split(sep).collect();

    let index_pos = columns
        .iter()
        .position(|c| *c == index_col)
        .ok_or_else(|| {
            Error::Serialization(format!(
                "sample sheet '{}' has no column '{index_col}'",
                path.display()
            ))
        })?;
    for col in file_columns {
        if !columns.iter().any(|c| c == col) {
            return Err(Error::Serialization(format!(
                "sample sheet '{}' has no column '{col}'",
                path.display()
            )));
        }
    }

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(sep).collect();
        if fields.len() != columns.len() {
            return Err(Error::Serialization(format!(
                "sample sheet '{}' row has {} fields, expected {}",
                path.display(),
                fields.len(),
                columns.len()
            )));
        }

        let mut sample = Sample::new(fields[index_pos]);
        for (column, value) in columns.iter().zip(&fields) {
            if *column == index_col {
                continue;
            }
            if file_columns.iter().any(|c| c == column) {
                let file_path = Path::new(value);
                if !file_path.is_file() {
                    return Err(Error::not_found(EntityKind::File, *value));
                }
                sample.add_file(File::new(file_path, Some((*column).to_string())))?;
            } else {
                sample
                    .attributes
                    .insert((*column).to_string(), AttributeValue::from(*value));
            }
        }
        project.add_sample(sample)?;
    }
    Ok(())
}
