//! Utility functions for log path resolution, ANSI stripping, and time formatting.
use std::fs;
use std::path::{Path, PathBuf};

/// Strip ANSI escape sequences from a string.
///
/// Handles SGR sequences (ending in `m`) and other CSI sequences (ending
/// in any letter in the `@`..`~` range).
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            if let Some(next) = chars.next()
                && next == '['
            {
                for inner in chars.by_ref() {
                    if ('@'..='~').contains(&inner) {
                        break;
                    }
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Resolve the log directory from `XDG_CACHE_HOME`, falling back to
/// `<home>/.cache`, then `./.cache`.
pub(super) fn cache_dir_from(xdg_cache_home: Option<&Path>, home: Option<&Path>) -> PathBuf {
    xdg_cache_home
        .map(Path::to_path_buf)
        .unwrap_or_else(|| home.unwrap_or_else(|| Path::new(".")).join(".cache"))
        .join("dotfiles")
}

/// Return the `$XDG_CACHE_HOME/dotfiles/` directory, creating it if needed.
fn dotfiles_cache_dir() -> Option<PathBuf> {
    let xdg = std::env::var_os("XDG_CACHE_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from);
    let dir = cache_dir_from(xdg.as_deref(), home.as_deref());
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Return the install log path under `$XDG_CACHE_HOME/dotfiles/` (or `~/.cache/dotfiles/`).
pub(super) fn log_file_path() -> Option<PathBuf> {
    Some(dotfiles_cache_dir()?.join("install.log"))
}

/// Format the current UTC time as `YYYY-MM-DD HH:MM:SS`.
pub(super) fn format_utc_datetime() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format the current UTC time as `HH:MM:SS`.
pub(super) fn format_utc_time() -> String {
    chrono::Utc::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn strip_ansi_removes_colors() {
        assert_eq!(strip_ansi("\x1b[31mERROR\x1b[0m hello"), "ERROR hello");
        assert_eq!(strip_ansi("no codes here"), "no codes here");
        assert_eq!(
            strip_ansi("\x1b[1;34m==>\x1b[0m \x1b[1mstage\x1b[0m"),
            "==> stage"
        );
    }

    #[test]
    fn strip_ansi_handles_csi_sequences() {
        assert_eq!(strip_ansi("\x1b[2Jhello"), "hello");
        assert_eq!(strip_ansi("\x1b[Kworld"), "world");
        assert_eq!(strip_ansi("\x1bMtext"), "text");
    }

    #[test]
    fn strip_ansi_empty_string() {
        assert_eq!(strip_ansi(""), "");
    }

    #[test]
    fn cache_dir_prefers_xdg() {
        let dir = cache_dir_from(Some(Path::new("/xdg")), Some(Path::new("/home/u")));
        assert_eq!(dir, PathBuf::from("/xdg/dotfiles"));
    }

    #[test]
    fn cache_dir_falls_back_to_home() {
        let dir = cache_dir_from(None, Some(Path::new("/home/u")));
        assert_eq!(dir, PathBuf::from("/home/u/.cache/dotfiles"));
    }

    #[test]
    fn cache_dir_falls_back_to_cwd() {
        let dir = cache_dir_from(None, None);
        assert_eq!(dir, PathBuf::from("./.cache/dotfiles"));
    }

    #[test]
    fn format_utc_time_has_correct_format() {
        let s = format_utc_time();
        assert_eq!(s.len(), 8, "HH:MM:SS should be 8 chars");
        assert_eq!(&s[2..3], ":", "colon at position 2");
        assert_eq!(&s[5..6], ":", "colon at position 5");
    }

    #[test]
    fn format_utc_datetime_has_correct_format() {
        let s = format_utc_datetime();
        assert_eq!(s.len(), 19, "YYYY-MM-DD HH:MM:SS should be 19 chars");
        assert_eq!(&s[4..5], "-", "dash at position 4");
        assert_eq!(&s[10..11], " ", "space at position 10");
    }
}
