use crate::errors::{GgError, Result};
use crate::resolver::IssueCandidate;
use serde::Deserialize;
use std::cell::OnceCell;
use std::process::Command;

pub trait GitHubCli {
    fn is_available(&self) -> Result<bool>;
    /// Title and URL of issue `id` in `org/repo`, `None` if there is no such issue.
    fn issue_title(&self, org: &str, repo: &str, id: u64) -> Result<Option<IssueCandidate>>;
}

#[derive(Debug, Deserialize)]
struct Issue {
    title: String,
    html_url: String,
}

/// Read the JSON `gh api` prints for an issue.
pub fn parse_issue(json: &[u8], id: u64) -> Result<IssueCandidate> {
    let issue: Issue = serde_json::from_slice(json)?;
    Ok(IssueCandidate {
        title: issue.title,
        id,
        url: issue.html_url,
    })
}

pub struct GitHubCliImpl {
    /// `gh --version` result, run on first use.
    available: OnceCell<bool>,
}

impl GitHubCliImpl {
    pub fn new() -> Self {
        Self {
            available: OnceCell::new(),
        }
    }

    fn run_command(&self, args: &[&str]) -> Result<std::process::Output> {
        let output = Command::new("gh")
            .args(args)
            .output()
            .map_err(|e| GgError::GitHubCli(format!("Failed to execute gh command: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GgError::GitHubCli(stderr.to_string()));
        }

        Ok(output)
    }
}

impl GitHubCli for GitHubCliImpl {
    fn is_available(&self) -> Result<bool> {
        Ok(*self.available.get_or_init(|| {
            match Command::new("gh").arg("--version").output() {
                Ok(output) => output.status.success(),
                Err(_) => false,
            }
        }))
    }

    fn issue_title(&self, org: &str, repo: &str, id: u64) -> Result<Option<IssueCandidate>> {
        if !self.is_available()? {
            log::warn!("GitHub CLI (gh) not found, skipping lookup of {}/{}#{}", org, repo, id);
            return Ok(None);
        }

        let endpoint = format!("repos/{}/{}/issues/{}", org, repo, id);
        log::debug!("gh api {}", endpoint);
        match self.run_command(&["api", &endpoint]) {
            Ok(output) => parse_issue(&output.stdout, id).map(Some),
            Err(GgError::GitHubCli(ref error))
                if error.contains("Not Found") || error.contains("HTTP 404") =>
            {
                log::debug!("no issue {} in {}/{}", id, org, repo);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
pub struct MockGitHubCli {
    pub available: bool,
    pub availability_checks: std::sync::Mutex<usize>,
    pub issues: std::collections::HashMap<(String, String, u64), String>,
    pub queried: std::sync::Mutex<Vec<(String, String, u64)>>,
}

#[cfg(test)]
impl MockGitHubCli {
    pub fn new() -> Self {
        Self {
            available: true,
            availability_checks: std::sync::Mutex::new(0),
            issues: std::collections::HashMap::new(),
            queried: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn with_issue(mut self, org: &str, repo: &str, id: u64, title: &str) -> Self {
        self.issues
            .insert((org.to_string(), repo.to_string(), id), title.to_string());
        self
    }

    pub fn set_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    pub fn get_queried(&self) -> Vec<(String, String, u64)> {
        self.queried.lock().unwrap().clone()
    }

    pub fn get_availability_checks(&self) -> usize {
        *self.availability_checks.lock().unwrap()
    }
}

#[cfg(test)]
impl GitHubCli for MockGitHubCli {
    fn is_available(&self) -> Result<bool> {
        *self.availability_checks.lock().unwrap() += 1;
        Ok(self.available)
    }

    fn issue_title(&self, org: &str, repo: &str, id: u64) -> Result<Option<IssueCandidate>> {
        self.queried
            .lock()
            .unwrap()
            .push((org.to_string(), repo.to_string(), id));
        if !self.available {
            return Ok(None);
        }
        Ok(self
            .issues
            .get(&(org.to_string(), repo.to_string(), id))
            .map(|title| IssueCandidate {
                title: title.clone(),
                id,
                url: format!("https://github.com/{}/{}/issues/{}", org, repo, id),
            }))
    }
}
