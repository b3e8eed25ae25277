//! `.code-workspace` folder list persistence

use std::path::{Path, PathBuf};

use ghq_nav_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// One folder entry of a workspace file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WorkspaceFolder {
    pub path: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A multi-root workspace file
///
/// Keys other than `folders` (settings, extensions, ...) are carried through
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WorkspaceFile {
    #[serde(default)]
    pub folders: Vec<WorkspaceFolder>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl WorkspaceFile {
    /// Read a workspace file; a missing file is an empty workspace
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|source| Error::WorkspaceFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the workspace file, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents + "\n")?;
        Ok(())
    }

    /// Folder paths, with relative entries resolved against `base`
    pub fn folder_paths(&self, base: &Path) -> Vec<PathBuf> {
        self.folders
            .iter()
            .map(|folder| {
                if folder.path.is_absolute() {
                    folder.path.clone()
                } else {
                    base.join(&folder.path)
                }
            })
            .collect()
    }

    /// Insert a folder at `position`, clamped to the end of the list
    pub fn insert(&mut self, position: usize, path: &Path) {
        let position = position.min(self.folders.len());
        self.folders.insert(
            position,
            WorkspaceFolder {
                path: path.to_path_buf(),
                name: None,
            },
        );
    }
}
