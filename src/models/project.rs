use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{EntityKind, Error, Result};
use crate::models::{check_batch, File, Sample};

/// Top-level container of samples and shared files.
///
/// Samples are keyed by name and project-level files by tag, both in
/// insertion order. The whole graph serializes to a single JSON document
/// via [`to_json`](Project::to_json) and reconstructs losslessly with
/// [`from_json`](crate::store::from_json).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub tag: String,
    #[serde(default)]
    pub samples: IndexMap<String, Sample>,
    #[serde(default, with = "crate::store::keyed_list")]
    pub files: IndexMap<String, File>,
}

impl Project {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            samples: IndexMap::new(),
            files: IndexMap::new(),
        }
    }

    /// Inserts a sample keyed by its name. Fails with `DuplicateKey` if a
    /// sample of that name already exists.
    pub fn add_sample(&mut self, sample: Sample) -> Result<()> {
        if self.samples.contains_key(&sample.name) {
            return Err(Error::duplicate(EntityKind::Sample, &sample.name));
        }
        self.samples.insert(sample.name.clone(), sample);
        Ok(())
    }

    /// Looks up a sample by name.
    pub fn sample(&self, name: &str) -> Result<&Sample> {
        self.samples
            .get(name)
            .ok_or_else(|| Error::not_found(EntityKind::Sample, name))
    }

    pub fn sample_mut(&mut self, name: &str) -> Result<&mut Sample> {
        self.samples
            .get_mut(name)
            .ok_or_else(|| Error::not_found(EntityKind::Sample, name))
    }

    /// Inserts a project-level file keyed by its tag.
    pub fn add_file(&mut self, file: File) -> Result<()> {
        if self.files.contains_key(&file.tag) {
            return Err(Error::duplicate(EntityKind::File, &file.tag));
        }
        self.files.insert(file.tag.clone(), file);
        Ok(())
    }

    /// Batch insert with the same unchanged-on-failure guarantee as
    /// [`Sample::add_files`](crate::models::Sample::add_files).
    pub fn add_files(&mut self, files: impl IntoIterator<Item = File>) -> Result<()> {
        let files: Vec<File> = files.into_iter().collect();
        check_batch(&self.files, files.iter().map(|f| f.tag.as_str()), EntityKind::File)?;
        for file in files {
            self.files.insert(file.tag.clone(), file);
        }
        Ok(())
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.values()
    }
}
