use std::path::PathBuf;

/// Where projects are persisted.
///
/// Constructor-injected rather than a process-wide singleton, so tests and
/// embedders can point it anywhere (a tempdir, a fixture directory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
}

impl Config {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Resolves the platform data directory (e.g. `~/.local/share/bioprov`
    /// on Linux). `None` when the platform provides no home directory.
    pub fn default_dirs() -> Option<Self> {
        let dirs = directories::ProjectDirs::from("", "", "bioprov")?;
        Some(Self::new(dirs.data_dir()))
    }

    /// Path of the persisted document for a project tag.
    pub fn project_path(&self, tag: &str) -> PathBuf {
        self.data_dir.join(format!("{tag}.json"))
    }
}
