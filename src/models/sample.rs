use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{EntityKind, Error, Result};
use crate::models::{check_batch, File, Program};

/// A scalar attribute value attached to a sample.
///
/// Attributes are an explicit tagged union of permitted scalar types rather
/// than an open-ended dynamic bag. Serializes untagged, so attribute maps
/// read naturally in JSON (`"depth": 42`, `"species": "E. coli"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A named biological entity with associated files and programs.
///
/// Files are keyed by tag and programs by name; both maps preserve
/// insertion order so a serialized sample round-trips byte-stably. Sample
/// names are unique within their owning [`Project`](crate::models::Project).
///
/// The maps are plain public fields — direct read/write access is part of
/// the contract. The `add_*` methods layer the collision policy on top:
/// inserting an existing key fails with `DuplicateKey` and leaves the map
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub name: String,
    #[serde(default)]
    pub attributes: IndexMap<String, AttributeValue>,
    #[serde(default, with = "crate::store::keyed_list")]
    pub files: IndexMap<String, File>,
    #[serde(default, with = "crate::store::keyed_list")]
    pub programs: IndexMap<String, Program>,
}

impl Sample {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            files: IndexMap::new(),
            programs: IndexMap::new(),
        }
    }

    /// Inserts a file keyed by its tag. Fails with `DuplicateKey` if the
    /// tag is already present.
    pub fn add_file(&mut self, file: File) -> Result<()> {
        if self.files.contains_key(&file.tag) {
            return Err(Error::duplicate(EntityKind::File, &file.tag));
        }
        self.files.insert(file.tag.clone(), file);
        Ok(())
    }

    /// Inserts several files at once. The whole batch is validated first,
    /// so a collision (with the map or within the batch) leaves the map
    /// unchanged.
    pub fn add_files(&mut self, files: impl IntoIterator<Item = File>) -> Result<()> {
        let files: Vec<File> = files.into_iter().collect();
        check_batch(&self.files, files.iter().map(|f| f.tag.as_str()), EntityKind::File)?;
        for file in files {
            self.files.insert(file.tag.clone(), file);
        }
        Ok(())
    }

    /// Inserts a program keyed by its name, with the same collision policy
    /// as [`add_file`](Sample::add_file).
    pub fn add_program(&mut self, program: Program) -> Result<()> {
        if self.programs.contains_key(&program.name) {
            return Err(Error::duplicate(EntityKind::Program, &program.name));
        }
        self.programs.insert(program.name.clone(), program);
        Ok(())
    }

    pub fn add_programs(&mut self, programs: impl IntoIterator<Item = Program>) -> Result<()> {
        let programs: Vec<Program> = programs.into_iter().collect();
        check_batch(
            &self.programs,
            programs.iter().map(|p| p.name.as_str()),
            EntityKind::Program,
        )?;
        for program in programs {
            self.programs.insert(program.name.clone(), program);
        }
        Ok(())
    }

    pub fn file(&self, tag: &str) -> Result<&File> {
        self.files
            .get(tag)
            .ok_or_else(|| Error::not_found(EntityKind::File, tag))
    }

    pub fn program(&self, name: &str) -> Result<&Program> {
        self.programs
            .get(name)
            .ok_or_else(|| Error::not_found(EntityKind::Program, name))
    }

    pub fn program_mut(&mut self, name: &str) -> Result<&mut Program> {
        self.programs
            .get_mut(name)
            .ok_or_else(|| Error::not_found(EntityKind::Program, name))
    }
}
