// Shared helpers for integration tests.
//
// Provides a temporary repository plus home directory and a fluent builder so
// each integration test can lay out dotfiles without repeating filesystem
// boilerplate. Dotfiles are written under the directory for the host OS.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use dotfiles_installer::cli::InstallOpts;
use dotfiles_installer::logging::Logger;
use dotfiles_installer::platform::{Os, Platform};

/// An isolated repository and home directory backed by a [`tempfile::TempDir`].
pub struct TestRepo {
    tmp: tempfile::TempDir,
    /// Host OS; dotfiles are written to its source directory.
    pub os: Os,
}

impl TestRepo {
    /// Create an empty repository root and an empty home directory.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(tmp.path().join("repo")).expect("create repo dir");
        std::fs::create_dir_all(tmp.path().join("home")).expect("create home dir");
        let os = Platform::detect().expect("supported host").os;
        Self { tmp, os }
    }

    /// Repository root.
    pub fn root(&self) -> PathBuf {
        self.tmp.path().join("repo")
    }

    /// Destination (home) directory.
    pub fn home(&self) -> PathBuf {
        self.tmp.path().join("home")
    }

    /// Source directory for the host OS.
    pub fn source_dir(&self) -> PathBuf {
        self.root().join(self.os.dir_name())
    }

    /// Write a dotfile at `relative` under the host OS source directory.
    pub fn with_dotfile(self, relative: &str, content: &str) -> Self {
        write_file(&self.source_dir().join(relative), content);
        self
    }

    /// Write a file at `relative` under the home directory.
    pub fn with_home_file(self, relative: &str, content: &str) -> Self {
        write_file(&self.home().join(relative), content);
        self
    }

    /// Write `dotfiles.toml` at the repository root.
    pub fn with_settings(self, content: &str) -> Self {
        write_file(&self.root().join("dotfiles.toml"), content);
        self
    }

    /// Options for a non-interactive run against this repository.
    pub fn opts(&self) -> InstallOpts {
        InstallOpts {
            dry_run: false,
            yes: true,
            root: Some(self.root()),
            home: Some(self.home()),
        }
    }

    /// Options for a dry run against this repository.
    pub fn dry_run_opts(&self) -> InstallOpts {
        InstallOpts {
            dry_run: true,
            ..self.opts()
        }
    }

    /// Read a file under the home directory, following links.
    pub fn read_home(&self, relative: &str) -> String {
        std::fs::read_to_string(self.home().join(relative)).expect("read home file")
    }
}

/// A logger that records tasks but writes no log file.
pub fn quiet_logger() -> Logger {
    Logger::with_log_file(None)
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}
