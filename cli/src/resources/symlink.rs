//! Symlink resource: standard-mode install on Linux and macOS.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::helpers::fs::{
    ensure_parent_dir, entry_exists, is_real_dir, paths_equal, remove_existing,
};
use super::{Resource, ResourceChange, ResourceState};

/// A symlink at `target` pointing to `source`.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// The source file (what the symlink points to).
    pub source: PathBuf,
    /// The target path (where the symlink will be created).
    pub target: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }
}

impl Resource for SymlinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn current_state(&self) -> Result<ResourceState> {
        if !self.source.exists() {
            return Ok(ResourceState::Invalid {
                reason: format!("source does not exist: {}", self.source.display()),
            });
        }

        if is_real_dir(&self.target) {
            return Ok(ResourceState::Invalid {
                reason: "target is a real directory".to_string(),
            });
        }

        std::fs::read_link(&self.target).map_or_else(
            |_| {
                if entry_exists(&self.target) {
                    Ok(ResourceState::Incorrect {
                        current: "target is a regular file".to_string(),
                    })
                } else {
                    Ok(ResourceState::Missing)
                }
            },
            |existing| {
                if paths_equal(&existing, &self.source) {
                    Ok(ResourceState::Correct)
                } else {
                    Ok(ResourceState::Incorrect {
                        current: format!("points to {}", existing.display()),
                    })
                }
            },
        )
    }

    fn apply(&self) -> Result<ResourceChange> {
        if is_real_dir(&self.target) {
            return Ok(ResourceChange::Skipped {
                reason: "target is a real directory".to_string(),
            });
        }

        ensure_parent_dir(&self.target)?;
        remove_existing(&self.target)?;
        create_symlink(&self.source, &self.target)?;

        Ok(ResourceChange::Applied)
    }
}

/// Create a symlink at `link` pointing to `target`.
fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link).with_context(|| {
            format!(
                "creating symlink {} -> {}",
                link.display(),
                target.display()
            )
        })?;
    }

    #[cfg(windows)]
    {
        std::os::windows::fs::symlink_file(target, link).with_context(|| {
            format!(
                "creating symlink {} -> {} (requires Developer Mode or Administrator)",
                link.display(),
                target.display()
            )
        })?;
    }

    Ok(())
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::fs;

    fn setup() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("repo/linux/.vimrc");
        fs::create_dir_all(source.parent().unwrap()).unwrap();
        fs::write(&source, "set number\n").unwrap();
        let target = dir.path().join("home/.vimrc");
        (dir, source, target)
    }

    #[test]
    fn description_names_both_ends() {
        let resource = SymlinkResource::new(PathBuf::from("/source"), PathBuf::from("/target"));
        assert_eq!(resource.description(), "/target -> /source");
    }

    #[test]
    fn invalid_when_source_missing() {
        let dir = tempfile::tempdir().unwrap();
        let resource =
            SymlinkResource::new(dir.path().join("nonexistent"), dir.path().join("target"));
        assert!(matches!(
            resource.current_state().unwrap(),
            ResourceState::Invalid { .. }
        ));
    }

    #[test]
    fn missing_then_applied_then_correct() {
        let (_dir, source, target) = setup();
        let resource = SymlinkResource::new(source.clone(), target.clone());

        assert_eq!(resource.current_state().unwrap(), ResourceState::Missing);
        assert_eq!(resource.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
        assert_eq!(fs::read_link(&target).unwrap(), source);
        assert_eq!(fs::read_to_string(&target).unwrap(), "set number\n");
    }

    #[test]
    fn replaces_regular_file() {
        let (_dir, source, target) = setup();
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, "old contents\n").unwrap();
        let resource = SymlinkResource::new(source.clone(), target.clone());

        assert_eq!(
            resource.current_state().unwrap(),
            ResourceState::Incorrect {
                current: "target is a regular file".to_string()
            }
        );
        resource.apply().unwrap();
        assert_eq!(fs::read_link(&target).unwrap(), source);
    }

    #[test]
    fn replaces_symlink_pointing_elsewhere() {
        let (dir, source, target) = setup();
        let other = dir.path().join("other");
        fs::write(&other, "other\n").unwrap();
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink(&other, &target).unwrap();

        let resource = SymlinkResource::new(source.clone(), target.clone());
        assert!(matches!(
            resource.current_state().unwrap(),
            ResourceState::Incorrect { current } if current.starts_with("points to ")
        ));
        resource.apply().unwrap();
        assert_eq!(fs::read_link(&target).unwrap(), source);
        assert_eq!(fs::read_to_string(&other).unwrap(), "other\n");
    }

    #[test]
    fn replaces_broken_symlink() {
        let (_dir, source, target) = setup();
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink("/nonexistent/file", &target).unwrap();

        let resource = SymlinkResource::new(source.clone(), target.clone());
        assert!(matches!(
            resource.current_state().unwrap(),
            ResourceState::Incorrect { .. }
        ));
        resource.apply().unwrap();
        assert_eq!(fs::read_link(&target).unwrap(), source);
    }

    #[test]
    fn real_directory_target_is_left_alone() {
        let (_dir, source, target) = setup();
        fs::create_dir_all(&target).unwrap();
        let resource = SymlinkResource::new(source, target.clone());

        assert!(matches!(
            resource.current_state().unwrap(),
            ResourceState::Invalid { .. }
        ));
        assert!(matches!(
            resource.apply().unwrap(),
            ResourceChange::Skipped { .. }
        ));
        assert!(target.is_dir());
    }

    #[test]
    fn creates_nested_parent_directories() {
        let (dir, source, _) = setup();
        let target = dir.path().join("home/.config/deep/nested/file");
        let resource = SymlinkResource::new(source, target.clone());
        resource.apply().unwrap();
        assert!(target.symlink_metadata().unwrap().file_type().is_symlink());
    }
}
