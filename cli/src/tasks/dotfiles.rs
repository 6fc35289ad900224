//! Tasks that install the discovered dotfiles.
use anyhow::Result;

use super::{Context, Task, TaskResult, process_resources};
use crate::config::dotfiles::InstallMode;
use crate::resources::append::AppendResource;
use crate::resources::copy::CopyResource;
use crate::resources::symlink::SymlinkResource;

/// Install plain dotfiles: symlinks on Linux and macOS, copies on Windows.
#[derive(Debug)]
pub struct InstallDotfiles;

impl Task for InstallDotfiles {
    fn name(&self) -> &str {
        "Install dotfiles"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.config.dotfiles_in(InstallMode::Link).next().is_some()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let dotfiles = ctx.config.dotfiles_in(InstallMode::Link);
        if ctx.platform.uses_symlinks() {
            let resources =
                dotfiles.map(|d| SymlinkResource::new(d.source.clone(), d.target.clone()));
            process_resources(ctx, resources, "link")
        } else {
            let resources = dotfiles.map(|d| CopyResource::new(d.source.clone(), d.target.clone()));
            process_resources(ctx, resources, "copy")
        }
    }
}

/// Merge marked dotfiles into their destinations line by line.
#[derive(Debug)]
pub struct AppendDotfiles;

impl Task for AppendDotfiles {
    fn name(&self) -> &str {
        "Append dotfiles"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.config.dotfiles_in(InstallMode::Append).next().is_some()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resources = ctx
            .config
            .dotfiles_in(InstallMode::Append)
            .map(|d| AppendResource::new(d.source.clone(), d.target.clone()));
        process_resources(ctx, resources, "append")
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::platform::{Os, Platform};
    use crate::tasks::test_helpers::RecordingLog;
    use std::fs;

    fn repo_with(files: &[(&str, &str)], os: Os) -> (tempfile::TempDir, Config) {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("repo");
        let src = root.join(os.dir_name());
        for (rel, content) in files {
            let path = src.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        fs::create_dir_all(&src).unwrap();
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).unwrap();
        let config = Config::load(&root, &home, &Platform::new(os)).unwrap();
        (tmp, config)
    }

    #[test]
    fn tasks_apply_only_to_their_mode() {
        let (_tmp, config) = repo_with(&[(".vimrc", "set number\n")], Os::Linux);
        let platform = Platform::new(Os::Linux);
        let log = RecordingLog::default();
        let ctx = Context::new(&config, &platform, &log, false);
        assert!(InstallDotfiles.should_run(&ctx));
        assert!(!AppendDotfiles.should_run(&ctx));
    }

    #[test]
    fn append_task_merges_missing_lines() {
        let (_tmp, config) = repo_with(
            &[(".bashrc", ">>> APPEND <<<\nalias ll='ls -la'\n")],
            Os::Linux,
        );
        let target = config.home.join(".bashrc");
        fs::write(&target, "export PATH=$PATH:~/bin\n").unwrap();

        let platform = Platform::new(Os::Linux);
        let log = RecordingLog::default();
        let ctx = Context::new(&config, &platform, &log, false);
        let result = AppendDotfiles.run(&ctx).unwrap();

        assert!(matches!(result, TaskResult::Ok));
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "export PATH=$PATH:~/bin\nalias ll='ls -la'\n"
        );
        assert!(log.contains("1 changed, 0 already ok"));
    }

    #[test]
    fn windows_platform_copies_instead_of_linking() {
        let (_tmp, config) = repo_with(
            &[("Documents/PowerShell/Profile.ps1", "Set-Alias ll Get-ChildItem\n")],
            Os::Windows,
        );
        let platform = Platform::new(Os::Windows);
        let log = RecordingLog::default();
        let ctx = Context::new(&config, &platform, &log, false);
        InstallDotfiles.run(&ctx).unwrap();

        let target = config.home.join("Documents/PowerShell/Profile.ps1");
        let meta = fs::symlink_metadata(&target).unwrap();
        assert!(meta.is_file());
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "Set-Alias ll Get-ChildItem\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn unix_platform_links_to_source() {
        let (_tmp, config) = repo_with(&[(".vimrc", "set number\n")], Os::Linux);
        let platform = Platform::new(Os::Linux);
        let log = RecordingLog::default();
        let ctx = Context::new(&config, &platform, &log, false);
        InstallDotfiles.run(&ctx).unwrap();

        let target = config.home.join(".vimrc");
        assert_eq!(fs::read_link(&target).unwrap(), config.dotfiles[0].source);
    }

    #[test]
    fn dry_run_leaves_home_untouched() {
        let (_tmp, config) = repo_with(
            &[
                (".vimrc", "set number\n"),
                (".bashrc", ">>> APPEND <<<\nalias ll='ls -la'\n"),
            ],
            Os::Linux,
        );
        let platform = Platform::new(Os::Linux);
        let log = RecordingLog::default();
        let ctx = Context::new(&config, &platform, &log, true);

        assert!(matches!(InstallDotfiles.run(&ctx).unwrap(), TaskResult::DryRun));
        assert!(matches!(AppendDotfiles.run(&ctx).unwrap(), TaskResult::DryRun));
        assert_eq!(fs::read_dir(&config.home).unwrap().count(), 0);
        assert!(log.contains("[dry run] would append"));
    }
}
