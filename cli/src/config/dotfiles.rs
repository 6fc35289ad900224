//! Dotfile discovery and install-mode detection.
use std::fmt;
use std::fs;
use std::io::{BufRead as _, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::settings::OsSettings;
use crate::error::InstallError;

/// Marker that selects append mode, after lowercasing and removing all
/// whitespace from a file's first line.
pub const APPEND_MARKER: &str = ">>>append<<<";

/// How a dotfile is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    /// Symlink (Linux, macOS) or copy (Windows) the whole file.
    Link,
    /// Append the source's missing lines to the destination.
    Append,
}

impl fmt::Display for InstallMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link => f.write_str("link"),
            Self::Append => f.write_str("append"),
        }
    }
}

/// A dotfile found in the repository and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dotfile {
    /// Path relative to the OS source directory (and to the home directory).
    pub relative: PathBuf,
    /// Absolute source path inside the repository.
    pub source: PathBuf,
    /// Absolute destination path under the home directory.
    pub target: PathBuf,
    /// Install mode selected by the source's first line.
    pub mode: InstallMode,
}

/// Whether `first_line` carries the append marker.
///
/// Case and whitespace are ignored, and the marker may be surrounded by
/// other text such as a comment leader.
///
/// # Examples
///
/// ```
/// use dotfiles_installer::config::dotfiles::has_append_marker;
///
/// assert!(has_append_marker("# >>> APPEND <<<"));
/// assert!(has_append_marker(">>>append<<<"));
/// assert!(has_append_marker(" > > > Append < < < \r\n"));
/// assert!(!has_append_marker("# APPEND"));
/// ```
#[must_use]
pub fn has_append_marker(first_line: &str) -> bool {
    let normalized: String = first_line
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    normalized.contains(APPEND_MARKER)
}

/// Read the first line of `source` and decide its install mode.
///
/// Non-UTF-8 content is decoded lossily so binary files fall back to
/// [`InstallMode::Link`].
///
/// # Errors
///
/// Returns an error if `source` cannot be opened or read.
pub fn detect_mode(source: &Path) -> Result<InstallMode, InstallError> {
    let file = fs::File::open(source).map_err(|e| InstallError::io("opening", source, e))?;
    let mut first = Vec::new();
    BufReader::new(file)
        .read_until(b'\n', &mut first)
        .map_err(|e| InstallError::io("reading", source, e))?;

    if has_append_marker(&String::from_utf8_lossy(&first)) {
        Ok(InstallMode::Append)
    } else {
        Ok(InstallMode::Link)
    }
}

/// Collect every regular file under `dir` (recursively), as paths relative
/// to `dir`, sorted.
///
/// Directory symlinks are not descended into; symlinks to files are
/// included.
///
/// # Errors
///
/// Returns an error if a directory cannot be read.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_files(dir, Path::new(""), &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_files(root: &Path, relative: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let dir = root.join(relative);
    for entry in fs::read_dir(&dir).with_context(|| format!("reading directory {}", dir.display()))?
    {
        let entry = entry.with_context(|| format!("reading entry in {}", dir.display()))?;
        let rel_path = relative.join(entry.file_name());
        let file_type = entry
            .file_type()
            .with_context(|| format!("reading file type of {}", entry.path().display()))?;
        if file_type.is_dir() {
            collect_files(root, &rel_path, out)?;
        } else if entry.path().is_file() {
            out.push(rel_path);
        }
    }
    Ok(())
}

/// Discover the dotfiles under `source_dir` and map them into `home`.
///
/// Files matched by `settings.exclude` are dropped. A missing `source_dir`
/// yields no dotfiles.
///
/// # Errors
///
/// Returns an error if the directory tree cannot be walked or a source file
/// cannot be read to detect its mode.
pub fn discover(source_dir: &Path, home: &Path, settings: &OsSettings) -> Result<Vec<Dotfile>> {
    if !source_dir.is_dir() {
        return Ok(Vec::new());
    }

    list_files(source_dir)?
        .into_iter()
        .filter(|relative| !settings.is_excluded(relative))
        .map(|relative| -> Result<Dotfile> {
            let source = source_dir.join(&relative);
            let mode = detect_mode(&source)?;
            Ok(Dotfile {
                target: home.join(&relative),
                source,
                relative,
                mode,
            })
        })
        .collect()
}
