//! Project discovery and layout
//!
//! A GearGuard project is any directory containing a `.gearguard/` data
//! directory. Discovery walks upward from the starting directory, the way
//! git finds its repository root.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the data directory that marks a project root
pub const DATA_DIR: &str = ".gearguard";

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("No GearGuard project found. Run 'ggd init' first")]
    NotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Handle to a discovered or freshly initialized project
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Discover the project containing the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let cwd = std::env::current_dir()?;
        Self::discover_from(&cwd)
    }

    /// Discover the project containing `start`, walking upward
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut dir = Some(start);
        while let Some(current) = dir {
            if current.join(DATA_DIR).is_dir() {
                return Ok(Self {
                    root: current.to_path_buf(),
                });
            }
            dir = current.parent();
        }
        Err(ProjectError::NotFound)
    }

    /// Create the data directory under `dir`, making it a project root.
    /// Initializing an existing project is a no-op.
    pub fn init(dir: &Path) -> Result<Self, ProjectError> {
        std::fs::create_dir_all(dir.join(DATA_DIR))?;
        Ok(Self {
            root: dir.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the collection files and project config
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }
}
