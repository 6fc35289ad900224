//! Copy resource: standard-mode install on Windows.
use std::path::PathBuf;

use anyhow::Result;

use super::helpers::fs::{ensure_parent_dir, entry_exists, is_real_dir, is_symlink, remove_existing};
use super::{Resource, ResourceChange, ResourceState};
use crate::error::InstallError;

/// A regular file at `target` whose bytes match `source`.
#[derive(Debug, Clone)]
pub struct CopyResource {
    /// The file to copy from.
    pub source: PathBuf,
    /// Where the copy is written.
    pub target: PathBuf,
}

impl CopyResource {
    /// Create a new copy resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }
}

impl Resource for CopyResource {
    fn description(&self) -> String {
        format!("{} <= {}", self.target.display(), self.source.display())
    }

    fn current_state(&self) -> Result<ResourceState> {
        if !self.source.is_file() {
            return Ok(ResourceState::Invalid {
                reason: format!("source does not exist: {}", self.source.display()),
            });
        }

        if is_real_dir(&self.target) {
            return Ok(ResourceState::Invalid {
                reason: "target is a real directory".to_string(),
            });
        }

        if is_symlink(&self.target) {
            return Ok(ResourceState::Incorrect {
                current: "target is a symlink".to_string(),
            });
        }

        if !entry_exists(&self.target) {
            return Ok(ResourceState::Missing);
        }

        let wanted =
            std::fs::read(&self.source).map_err(|e| InstallError::io("reading", &self.source, e))?;
        let current =
            std::fs::read(&self.target).map_err(|e| InstallError::io("reading", &self.target, e))?;
        if wanted == current {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: "content differs".to_string(),
            })
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        if is_real_dir(&self.target) {
            return Ok(ResourceChange::Skipped {
                reason: "target is a real directory".to_string(),
            });
        }

        ensure_parent_dir(&self.target)?;
        if is_symlink(&self.target) {
            remove_existing(&self.target)?;
        }
        std::fs::copy(&self.source, &self.target)
            .map_err(|e| InstallError::io("copying to", &self.target, e))?;

        Ok(ResourceChange::Applied)
    }
}
