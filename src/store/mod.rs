//! JSON persistence for the project graph.
//!
//! The document layout is stable across versions so round trips stay
//! lossless: top level `{tag, samples, files}`, where `samples` is a map of
//! sample name to sample object and every file/program/run collection is an
//! ordered list keyed back into its map on load. Runs deserialize as
//! historical records; nothing is re-executed.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::{File, Program, Project, Run};

/// Entities that carry their own map key when serialized as list elements.
pub(crate) trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for File {
    fn key(&self) -> &str {
        &self.tag
    }
}

impl Keyed for Program {
    fn key(&self) -> &str {
        &self.name
    }
}

impl Keyed for Run {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Serde bridge between an insertion-ordered map and the JSON list layout.
///
/// Serialization writes the map's values as a sequence; deserialization
/// rebuilds the map from each element's own key and rejects duplicates, so
/// a hand-edited document cannot smuggle in colliding tags.
pub(crate) mod keyed_list {
    use indexmap::IndexMap;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Keyed;

    pub fn serialize<T, S>(map: &IndexMap<String, T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        serializer.collect_seq(map.values())
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
    where
        T: Deserialize<'de> + Keyed,
        D: Deserializer<'de>,
    {
        let items = Vec::<T>::deserialize(deserializer)?;
        let mut map = IndexMap::with_capacity(items.len());
        for item in items {
            let key = item.key().to_string();
            if map.insert(key.clone(), item).is_some() {
                return Err(D::Error::custom(format!("duplicate key '{key}'")));
            }
        }
        Ok(map)
    }
}

impl Project {
    /// Serializes the full object graph to a pretty-printed JSON document
    /// at `path`, creating parent directories as needed.
    pub fn to_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| Error::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let json = self.to_json_string()?;
        fs::write(path, json).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The serialized document as a string, without touching the filesystem.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Reconstructs a [`Project`] from a document previously written by
/// [`Project::to_json`].
///
/// The round trip is lossless under structural equality; a malformed or
/// structurally incompatible document fails with
/// [`Error::Serialization`].
pub fn from_json(path: impl AsRef<Path>) -> Result<Project> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_json_str(&contents)
}

/// [`from_json`] for an in-memory document.
pub fn from_json_str(contents: &str) -> Result<Project> {
    let project: Project = serde_json::from_str(contents)?;
    validate(&project)?;
    Ok(project)
}

fn validate(project: &Project) -> Result<()> {
    for (key, sample) in &project.samples {
        if key != &sample.name {
            return Err(Error::Serialization(format!(
                "samples key '{key}' does not match sample name '{}'",
                sample.name
            )));
        }
    }
    Ok(())
}
