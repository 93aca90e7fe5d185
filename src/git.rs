use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use auth_git2::GitAuthenticator;
use git2::{ErrorCode, Repository, Status, StatusOptions};

use crate::errors::{GgError, HookError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Remote {
    pub name: String,
    pub url: String,
}

impl Remote {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

/// Everything gg needs from version control.
pub trait Vcs {
    /// Directory name of the working tree.
    fn repository_name(&self) -> String;
    fn workdir(&self) -> &Path;
    fn active_branch_name(&self) -> Result<String>;
    /// Untracked files, relative to the working tree, directories recursed.
    fn untracked_files(&self) -> Result<Vec<PathBuf>>;
    /// Tracked files have changes, staged or not.
    fn is_dirty(&self) -> Result<bool>;
    /// Paths currently in the index.
    fn tracked_files(&self) -> Result<Vec<PathBuf>>;
    fn stage_all(&self, paths: &[PathBuf]) -> Result<()>;
    /// Commit the index, running the commit hooks first. Returns the commit id.
    fn commit(&self, message: &str) -> Result<String>;
    fn remotes(&self) -> Result<Vec<Remote>>;
    fn push(&self, remote: &str, branch: &str) -> Result<()>;
    /// Create `name` at HEAD and switch to it.
    fn create_branch(&self, name: &str) -> Result<()>;

    fn remote(&self, name: &str) -> Result<Remote> {
        let remotes = self.remotes()?;
        if remotes.is_empty() {
            return Err(GgError::NoRemoteConfigured);
        }
        remotes
            .into_iter()
            .find(|remote| remote.name == name)
            .ok_or_else(|| GgError::RemoteNotFound(name.to_string()))
    }
}

pub struct Git {
    repo: Repository,
    workdir: PathBuf,
}

impl Git {
    pub fn open(path: &str) -> Result<Self> {
        log::debug!("Git::open path={}", path);
        let repo = Repository::discover(path)
            .map_err(|_| GgError::NotAGitRepository(path.to_string()))?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| GgError::NotAGitRepository(path.to_string()))?
            .to_path_buf();
        Ok(Self { repo, workdir })
    }

    fn hooks_dir(&self) -> Result<PathBuf> {
        let config = self.repo.config()?;
        match config.get_path("core.hooksPath") {
            Ok(path) if path.is_absolute() => Ok(path),
            Ok(path) => Ok(self.workdir.join(path)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(self.repo.path().join("hooks")),
            Err(e) => Err(e.into()),
        }
    }

    /// Run a hook if it exists and is executable.
    fn run_hook(&self, name: &str, args: &[&Path]) -> Result<()> {
        let hook = self.hooks_dir()?.join(name);
        if !is_executable(&hook) {
            return Ok(());
        }

        log::debug!("running hook {}", hook.display());
        let output = Command::new(&hook)
            .args(args)
            .current_dir(&self.workdir)
            .output()?;
        if output.status.success() {
            return Ok(());
        }

        Err(GgError::HookFailure(HookError {
            command: hook.display().to_string(),
            exit_status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

impl Vcs for Git {
    fn repository_name(&self) -> String {
        self.workdir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string()
    }

    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn active_branch_name(&self) -> Result<String> {
        // HEAD may point at an unborn branch, so read the symbolic ref itself.
        let head = self.repo.find_reference("HEAD")?;
        match head.symbolic_target() {
            Some(target) => Ok(target
                .strip_prefix("refs/heads/")
                .unwrap_or(target)
                .to_string()),
            None => Err(GgError::Git(git2::Error::from_str(
                "HEAD is detached, not on any branch",
            ))),
        }
    }

    fn untracked_files(&self) -> Result<Vec<PathBuf>> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);
        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(statuses
            .iter()
            .filter(|entry| entry.status().contains(Status::WT_NEW))
            .filter_map(|entry| entry.path().map(PathBuf::from))
            .collect())
    }

    fn is_dirty(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options.include_untracked(false).include_ignored(false);
        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(statuses
            .iter()
            .any(|entry| !entry.status().is_empty() && !entry.status().is_ignored()))
    }

    fn tracked_files(&self) -> Result<Vec<PathBuf>> {
        let index = self.repo.index()?;
        Ok(index
            .iter()
            .map(|entry| PathBuf::from(String::from_utf8_lossy(&entry.path).to_string()))
            .collect())
    }

    fn stage_all(&self, paths: &[PathBuf]) -> Result<()> {
        let mut index = self.repo.index()?;
        for path in paths {
            if self.workdir.join(path).exists() {
                index.add_path(path)?;
            } else {
                index.remove_path(path)?;
            }
        }
        index.write()?;
        log::debug!("staged {} paths", paths.len());
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        self.run_hook("pre-commit", &[])?;

        let message_file = self.repo.path().join("COMMIT_EDITMSG");
        fs::write(&message_file, message)?;
        self.run_hook("commit-msg", &[&message_file])?;
        // commit-msg hooks are allowed to rewrite the message.
        let message = fs::read_to_string(&message_file)?;

        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = self.repo.signature()?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == ErrorCode::UnbornBranch => None,
            Err(e) => return Err(e.into()),
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let commit_id = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message.trim_end(),
            &tree,
            &parents,
        )?;
        log::debug!("Commit created: {}", commit_id);
        Ok(commit_id.to_string())
    }

    fn remotes(&self) -> Result<Vec<Remote>> {
        let names = self.repo.remotes()?;
        let mut remotes = Vec::new();
        for name in names.iter().flatten() {
            let remote = self.repo.find_remote(name)?;
            if let Some(url) = remote.url() {
                remotes.push(Remote::new(name, url));
            }
        }
        Ok(remotes)
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        let mut destination = self.repo.find_remote(remote).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                GgError::RemoteNotFound(remote.to_string())
            } else {
                GgError::Git(e)
            }
        })?;

        let auth = GitAuthenticator::default();
        let config = self.repo.config()?;
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(auth.credentials(&config));
        callbacks.push_update_reference(|refname, status| match status {
            Some(reason) => Err(git2::Error::from_str(&format!(
                "{} was rejected: {}",
                refname, reason
            ))),
            None => Ok(()),
        });
        let mut options = git2::PushOptions::new();
        options.remote_callbacks(callbacks);

        let refspec = format!("refs/heads/{0}:refs/heads/{0}", branch);
        log::debug!("pushing {} to {}", refspec, remote);
        destination.push(&[refspec.as_str()], Some(&mut options))?;
        Ok(())
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        let commit = self.repo.head()?.peel_to_commit()?;
        self.repo.branch(name, &commit, false)?;
        self.repo.set_head(&format!("refs/heads/{}", name))?;
        self.repo
            .checkout_head(Some(git2::build::CheckoutBuilder::new().safe()))?;
        log::debug!("Created and checked out branch {} at {}", name, commit.id());
        Ok(())
    }
}
