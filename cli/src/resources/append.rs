//! Append resource: line-level merge of a marked dotfile into its destination.
//!
//! The first line of the source (the marker) is never copied. Every other
//! non-blank line that does not already appear verbatim in the destination
//! is appended, in source order, once. A link is never created in this mode.
use std::collections::HashSet;
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Result;

use super::helpers::fs::{
    ensure_parent_dir, is_real_dir, is_symlink, paths_equal, remove_existing,
};
use super::{Resource, ResourceChange, ResourceState};
use crate::error::InstallError;

/// The content of a marked dotfile after its marker line.
///
/// # Examples
///
/// ```
/// use dotfiles_installer::resources::append::body_after_marker;
///
/// assert_eq!(body_after_marker(">>> APPEND <<<\nalias ll='ls -la'\n"), "alias ll='ls -la'\n");
/// assert_eq!(body_after_marker(">>> APPEND <<<"), "");
/// ```
#[must_use]
pub fn body_after_marker(content: &str) -> &str {
    content.split_once('\n').map_or("", |(_, rest)| rest)
}

/// Lines of `body` absent from `existing`, in order and without duplicates.
///
/// Blank lines are ignored; comparison is by exact line text.
///
/// # Examples
///
/// ```
/// use dotfiles_installer::resources::append::missing_lines;
///
/// let body = "alias ll='ls -la'\n\nexport EDITOR=vim\n";
/// assert_eq!(missing_lines(body, "alias ll='ls -la'\n"), vec!["export EDITOR=vim"]);
/// assert!(missing_lines(body, "export EDITOR=vim\nalias ll='ls -la'").is_empty());
/// ```
#[must_use]
pub fn missing_lines<'a>(body: &'a str, existing: &str) -> Vec<&'a str> {
    let mut present: HashSet<&str> = existing.lines().collect();
    let mut missing = Vec::new();
    for line in body.lines().filter(|l| !l.trim().is_empty()) {
        // Inserting marks the line as written so duplicates in `body` are
        // appended once.
        if present.insert(line) {
            missing.push(line);
        }
    }
    missing
}

/// Render the bytes to append to `existing` so it gains `lines`.
///
/// A newline is inserted first when `existing` is non-empty and does not end
/// with one; the block ends with a newline when `body` does.
#[must_use]
pub fn render_append(existing: &str, lines: &[&str], body: &str) -> String {
    let mut out = String::new();
    if !existing.is_empty() && !existing.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&lines.join("\n"));
    if body.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Destination `target` that must contain every line of `source`'s body.
#[derive(Debug, Clone)]
pub struct AppendResource {
    /// The marked dotfile in the repository.
    pub source: PathBuf,
    /// The file to merge into.
    pub target: PathBuf,
}

impl AppendResource {
    /// Create a new append resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }

    fn read_source(&self) -> Result<String, InstallError> {
        std::fs::read_to_string(&self.source)
            .map_err(|e| InstallError::io("reading", &self.source, e))
    }

    /// Current destination content; empty when nothing readable is there,
    /// including a link whose target is gone.
    fn read_target(&self) -> Result<String, InstallError> {
        if !self.target.exists() {
            return Ok(String::new());
        }
        let bytes =
            std::fs::read(&self.target).map_err(|e| InstallError::io("reading", &self.target, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Why the target cannot be merged into, if it cannot.
    fn invalid_reason(&self) -> Option<String> {
        if is_real_dir(&self.target) {
            return Some("target is a real directory".to_string());
        }
        let links_back = dunce::canonicalize(&self.target)
            .is_ok_and(|resolved| paths_equal(&resolved, &self.source));
        links_back.then(|| "target resolves to the source itself".to_string())
    }
}

impl Resource for AppendResource {
    fn description(&self) -> String {
        format!("{} << {}", self.target.display(), self.source.display())
    }

    fn current_state(&self) -> Result<ResourceState> {
        if !self.source.is_file() {
            return Ok(ResourceState::Invalid {
                reason: format!("source does not exist: {}", self.source.display()),
            });
        }
        if let Some(reason) = self.invalid_reason() {
            return Ok(ResourceState::Invalid { reason });
        }

        let content = self.read_source()?;
        let body = body_after_marker(&content);
        if body.lines().all(|l| l.trim().is_empty()) {
            return Ok(ResourceState::Correct);
        }
        if !self.target.exists() {
            return Ok(ResourceState::Missing);
        }

        let existing = self.read_target()?;
        let missing = missing_lines(body, &existing).len();
        if missing == 0 {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: format!("{missing} line(s) missing"),
            })
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        if let Some(reason) = self.invalid_reason() {
            return Ok(ResourceChange::Skipped { reason });
        }

        let content = self.read_source()?;
        let body = body_after_marker(&content);
        let existing = self.read_target()?;
        let lines = missing_lines(body, &existing);
        if lines.is_empty() {
            return Ok(ResourceChange::AlreadyCorrect);
        }

        ensure_parent_dir(&self.target)?;
        if is_symlink(&self.target) && !self.target.exists() {
            remove_existing(&self.target)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.target)
            .map_err(|e| InstallError::io("opening", &self.target, e))?;
        file.write_all(render_append(&existing, &lines, body).as_bytes())
            .map_err(|e| InstallError::io("appending to", &self.target, e))?;

        Ok(ResourceChange::Appended { lines: lines.len() })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::fs;

    const BASHRC: &str = ">>> APPEND <<<\nalias ll='ls -la'\n";

    fn setup(source_content: &str) -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("repo/linux/.bashrc");
        fs::create_dir_all(source.parent().unwrap()).unwrap();
        fs::write(&source, source_content).unwrap();
        let target = dir.path().join("home/.bashrc");
        (dir, source, target)
    }

    fn write_target(target: &PathBuf, content: &str) {
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(target, content).unwrap();
    }

    #[test]
    fn body_skips_marker_line_only() {
        assert_eq!(body_after_marker(">>> APPEND <<<\r\na\nb"), "a\nb");
        assert_eq!(body_after_marker(""), "");
    }

    #[test]
    fn missing_lines_ignores_blank_and_duplicate_lines() {
        let body = "a\n\n   \nb\na\nc\n";
        assert_eq!(missing_lines(body, "b\n"), vec!["a", "c"]);
    }

    #[test]
    fn missing_lines_compares_exact_text() {
        assert_eq!(missing_lines("  indented\n", "indented\n"), vec!["  indented"]);
    }

    #[test]
    fn render_adds_separator_when_existing_lacks_newline() {
        assert_eq!(render_append("x", &["a", "b"], "a\nb\n"), "\na\nb\n");
        assert_eq!(render_append("x\n", &["a"], "a"), "a");
        assert_eq!(render_append("", &["a"], "a\n"), "a\n");
    }

    #[test]
    fn line_already_present_is_not_changed() {
        let (_dir, source, target) = setup(BASHRC);
        write_target(&target, "export PATH=$PATH:~/bin\nalias ll='ls -la'\n");
        let resource = AppendResource::new(source, target.clone());

        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
        assert_eq!(resource.apply().unwrap(), ResourceChange::AlreadyCorrect);
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "export PATH=$PATH:~/bin\nalias ll='ls -la'\n"
        );
    }

    #[test]
    fn missing_line_is_appended_once() {
        let (_dir, source, target) = setup(BASHRC);
        write_target(&target, "export PATH=$PATH:~/bin\n");
        let resource = AppendResource::new(source, target.clone());

        assert_eq!(
            resource.current_state().unwrap(),
            ResourceState::Incorrect {
                current: "1 line(s) missing".to_string()
            }
        );
        assert_eq!(
            resource.apply().unwrap(),
            ResourceChange::Appended { lines: 1 }
        );
        assert_eq!(resource.apply().unwrap(), ResourceChange::AlreadyCorrect);
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "export PATH=$PATH:~/bin\nalias ll='ls -la'\n"
        );
    }

    #[test]
    fn missing_destination_is_created_without_marker() {
        let (_dir, source, target) = setup(BASHRC);
        let resource = AppendResource::new(source, target.clone());

        assert_eq!(resource.current_state().unwrap(), ResourceState::Missing);
        resource.apply().unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "alias ll='ls -la'\n");
        assert!(!target.symlink_metadata().unwrap().file_type().is_symlink());
    }

    #[test]
    fn destination_without_trailing_newline_gets_one() {
        let (_dir, source, target) = setup(BASHRC);
        write_target(&target, "export A=1");
        AppendResource::new(source, target.clone()).apply().unwrap();
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "export A=1\nalias ll='ls -la'\n"
        );
    }

    #[test]
    fn marker_only_source_is_a_no_op() {
        let (_dir, source, target) = setup(">>> APPEND <<<\n\n  \n");
        let resource = AppendResource::new(source, target.clone());
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
        assert_eq!(resource.apply().unwrap(), ResourceChange::AlreadyCorrect);
        assert!(!target.exists());
    }

    #[test]
    fn real_directory_target_is_left_alone() {
        let (_dir, source, target) = setup(BASHRC);
        fs::create_dir_all(&target).unwrap();
        let resource = AppendResource::new(source, target);
        assert!(matches!(
            resource.current_state().unwrap(),
            ResourceState::Invalid { .. }
        ));
        assert!(matches!(
            resource.apply().unwrap(),
            ResourceChange::Skipped { .. }
        ));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_link_is_replaced_by_a_new_file() {
        let (_dir, source, target) = setup(BASHRC);
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink("/nonexistent/old-repo/linux/.bashrc", &target).unwrap();
        let resource = AppendResource::new(source, target.clone());

        assert_eq!(resource.current_state().unwrap(), ResourceState::Missing);
        assert_eq!(
            resource.apply().unwrap(),
            ResourceChange::Appended { lines: 1 }
        );
        assert!(!is_symlink(&target));
        assert_eq!(fs::read_to_string(&target).unwrap(), "alias ll='ls -la'\n");
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
    }

    #[cfg(unix)]
    #[test]
    fn refuses_to_append_through_link_to_source() {
        let (_dir, source, target) = setup(BASHRC);
        let source = dunce::canonicalize(&source).unwrap();
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink(&source, &target).unwrap();

        let resource = AppendResource::new(source.clone(), target);
        assert!(matches!(
            resource.current_state().unwrap(),
            ResourceState::Invalid { .. }
        ));
        resource.apply().unwrap();
        assert_eq!(fs::read_to_string(&source).unwrap(), BASHRC);
    }
}
