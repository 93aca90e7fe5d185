use crate::bugzilla::Bugzilla;
use crate::errors::{GgError, Result};
use crate::git::Remote;
use crate::github::GitHubCli;
use crate::parser::{parse_remote_url, Reference};

/// One tracker hit for a reference.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueCandidate {
    pub title: String,
    pub id: u64,
    pub url: String,
}

/// What a reference turned out to mean.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Issue(IssueCandidate),
    /// Not a tracker reference: the text is the description.
    Description(String),
}

impl Resolved {
    pub fn description(&self) -> &str {
        match self {
            Resolved::Issue(candidate) => &candidate.title,
            Resolved::Description(text) => text,
        }
    }

    pub fn bug_number(&self) -> Option<u64> {
        match self {
            Resolved::Issue(candidate) => Some(candidate.id),
            Resolved::Description(_) => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Resolved::Issue(candidate) => Some(&candidate.url),
            Resolved::Description(_) => None,
        }
    }
}

/// Every tracker hit for a bare number.
#[derive(Debug, Clone, PartialEq)]
pub enum Matches {
    None,
    One(IssueCandidate),
    Many(Vec<IssueCandidate>),
}

impl From<Vec<IssueCandidate>> for Matches {
    fn from(mut candidates: Vec<IssueCandidate>) -> Self {
        match candidates.len() {
            0 => Matches::None,
            1 => Matches::One(candidates.remove(0)),
            _ => Matches::Many(candidates),
        }
    }
}

pub struct IssueResolver<B: Bugzilla, G: GitHubCli> {
    pub bugzilla: B,
    pub github: G,
    pub bugzilla_url: String,
}

impl<B: Bugzilla, G: GitHubCli> IssueResolver<B, G> {
    pub fn new(bugzilla: B, github: G, bugzilla_url: &str) -> Self {
        Self {
            bugzilla,
            github,
            bugzilla_url: bugzilla_url.to_string(),
        }
    }

    /// Turn what the user typed into a title, id and URL.
    ///
    /// `remotes` and `fork_name` are only consulted for a bare number:
    /// every remote but the fork is asked for a GitHub issue with that id.
    pub fn resolve(&self, reference: &str, remotes: &[Remote], fork_name: &str) -> Result<Resolved> {
        match Reference::parse(reference, &self.bugzilla_url)? {
            Reference::BugzillaRef(id) => self
                .bugzilla
                .get_summary(id)?
                .map(Resolved::Issue)
                .ok_or_else(|| GgError::ReferenceNotFound(id.to_string())),
            Reference::GitHubIssueRef { org, repo, id } => self
                .github
                .issue_title(&org, &repo, id)?
                .map(Resolved::Issue)
                .ok_or_else(|| GgError::ReferenceNotFound(id.to_string())),
            Reference::NumericRef(id) => match self.candidates(id, remotes, fork_name)? {
                Matches::None => Err(GgError::ReferenceNotFound(id.to_string())),
                Matches::One(candidate) => Ok(Resolved::Issue(candidate)),
                Matches::Many(candidates) => Err(GgError::AmbiguousReference(candidates)),
            },
            Reference::FreeTextRef(text) => Ok(Resolved::Description(text)),
        }
    }

    /// Ask every non-fork remote's GitHub repository, then Bugzilla.
    pub fn candidates(&self, id: u64, remotes: &[Remote], fork_name: &str) -> Result<Matches> {
        log::debug!("Using fork name: {}", fork_name);
        let mut candidates = Vec::new();

        let remotes: &[Remote] = if self.github.is_available()? {
            remotes
        } else {
            log::warn!("GitHub CLI (gh) not found, only asking Bugzilla about {}", id);
            &[]
        };
        for remote in remotes.iter().filter(|remote| remote.name != fork_name) {
            let parsed = match parse_remote_url(&remote.url) {
                Ok(parsed) => parsed,
                Err(e) => {
                    log::warn!("Skipping remote {}: {}", remote.name, e);
                    continue;
                }
            };
            if let Some(candidate) = self.github.issue_title(&parsed.org, &parsed.repo, id)? {
                candidates.push(candidate);
            }
        }

        if let Some(candidate) = self.bugzilla.get_summary(id)? {
            candidates.push(candidate);
        }

        Ok(Matches::from(candidates))
    }
}
