use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A path reference with a provenance tag.
///
/// Files record *where* a data artifact lives, not its content. The path is
/// not required to exist at construction time — consumers (e.g. a program
/// resolving its inputs) validate existence lazily when the file is used.
///
/// The tag is the file's key within its owning mapping (a [`Sample`]'s or
/// [`Project`]'s file map) and must be unique there.
///
/// [`Sample`]: crate::models::Sample
/// [`Project`]: crate::models::Project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub tag: String,
    pub path: PathBuf,
}

impl File {
    /// Creates a file reference. When `tag` is `None` it defaults to the
    /// file stem (basename without extension).
    pub fn new(path: impl Into<PathBuf>, tag: Option<String>) -> Self {
        let path = path.into();
        let tag = tag.unwrap_or_else(|| default_tag(&path));
        Self { tag, path }
    }

    /// Parent directory of the path, derived on demand rather than stored.
    pub fn directory(&self) -> Option<&Path> {
        self.path.parent()
    }

    /// Whether the path currently exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

fn default_tag(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
