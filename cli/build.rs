//! Build script: embeds the installer version string via `DOTFILES_VERSION`.

use std::process::Command;

fn main() {
    // DOTFILES_VERSION wins when set by a release build; otherwise describe
    // the working tree so local builds report where they came from.
    if let Ok(version) = std::env::var("DOTFILES_VERSION") {
        println!("cargo:rustc-env=DOTFILES_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !version.is_empty() {
            println!("cargo:rustc-env=DOTFILES_VERSION={version}");
        }
    }

    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../.git/refs/");
    println!("cargo:rerun-if-env-changed=DOTFILES_VERSION");
}
