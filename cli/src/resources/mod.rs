//! Idempotent resource primitives (check + apply pattern).
pub mod append;
pub mod copy;
pub mod helpers;
pub mod symlink;

use anyhow::Result;

/// State of a resource.
///
/// # Examples
///
/// ```
/// use dotfiles_installer::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let wrong = ResourceState::Incorrect { current: "points to /other/path".into() };
/// let skip = ResourceState::Invalid { reason: "target is a real directory".into() };
///
/// assert_ne!(missing, correct);
/// assert_eq!(correct, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist at the destination.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Resource exists but does not match the desired state.
    Incorrect {
        /// Description of what is currently there.
        current: String,
    },
    /// Resource cannot be applied (e.g., target is a real directory).
    Invalid {
        /// Reason why the resource cannot be applied.
        reason: String,
    },
}

/// Result of applying a resource change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Lines were appended to the destination.
    Appended {
        /// Number of lines written.
        lines: usize,
    },
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
    /// Resource was skipped.
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}

/// A destination the installer can inspect and bring into the desired state.
pub trait Resource {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined due to I/O
    /// failures or permission issues.
    fn current_state(&self) -> Result<ResourceState>;

    /// Apply the resource change.
    ///
    /// Implementations create missing parent directories and replace or
    /// extend whatever is at the destination.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be applied due to I/O
    /// failures, permission issues, or invalid paths.
    fn apply(&self) -> Result<ResourceChange>;
}
