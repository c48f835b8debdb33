//! Script file loading.

use crate::error::{Result, ScriptError};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolves and reads script files.
pub struct ScriptLoader {
    /// Base directory for relative script paths.
    base_dir: PathBuf,
}

impl ScriptLoader {
    /// Create a new script loader.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Resolve a script path relative to the base directory.
    ///
    /// Paths that exist as given (absolute, or relative to the working
    /// directory) are used unchanged.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() || path.exists() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Load a script file.
    pub fn load(&self, path: &Path) -> Result<String> {
        let full_path = self.resolve_path(path);

        if !full_path.exists() {
            return Err(ScriptError::ScriptNotFound { path: full_path });
        }

        fs::read_to_string(&full_path).map_err(ScriptError::from)
    }

    /// Get the base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}
