use thiserror::Error;

use crate::resolver::IssueCandidate;

/// A commit hook that exited non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct HookError {
    pub command: String,
    pub exit_status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl HookError {
    /// What to show the user: the hook's stdout, else its stderr.
    pub fn output(&self) -> &str {
        if !self.stdout.trim().is_empty() {
            self.stdout.trim()
        } else if !self.stderr.trim().is_empty() {
            self.stderr.trim()
        } else {
            "Commit hook failed."
        }
    }
}

#[derive(Error, Debug)]
pub enum GgError {
    #[error("\"{0}\" is not a git repository")]
    NotAGitRepository(String),

    #[error("Can't commit when on the master branch. You really ought to do work in branches.")]
    OnMasterBranch,

    #[error("Leaving it up to you to figure out what to do with those untracked files.")]
    UserDeclinedUntracked,

    #[error("You're in a branch that was not created with gg.\nNo branch information available for {0}.")]
    NoBranchState(String),

    #[error("Commit cancelled")]
    EmptyReplacementMessage,

    #[error("No summary given")]
    EmptySummary,

    #[error("Branch is not dirty. There is nothing to commit.")]
    NothingToCommit,

    #[error("No files to add")]
    NoFilesStaged,

    #[error("Commit hook failed ({}, exit code {}):\n{}", .0.command, .0.exit_status, .0.output())]
    HookFailure(HookError),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("There are no remotes configured in this repository")]
    NoRemoteConfigured,

    #[error("There is no remote called '{0}'")]
    RemoteNotFound(String),

    #[error("ID {0} could not be found on GitHub or Bugzilla")]
    ReferenceNotFound(String),

    #[error("Input is ambiguous. Multiple possibilities found. Please re-run with the full URL.")]
    AmbiguousReference(Vec<IssueCandidate>),

    #[error("Unable to read state file {path}: {reason}")]
    StoreUnreadable { path: String, reason: String },

    #[error("Invalid remote URL: {0}")]
    InvalidRemoteUrl(String),

    #[error("GitHub CLI operation failed: {0}")]
    GitHubCli(String),

    #[error("No home directory")]
    NoHomeDir,

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GgError>;
