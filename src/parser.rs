// Reference, remote URL and branch name grammar

use crate::errors::{GgError, Result};

pub const DEFAULT_BUGZILLA_URL: &str = "https://bugzilla.mozilla.org";

/// What the user typed when starting a branch.
#[derive(Debug, Clone, PartialEq)]
pub enum Reference {
    /// `<bugzilla>/show_bug.cgi?id=<n>`
    BugzillaRef(u64),
    /// `https://<host>/<org>/<repo>/issues/<n>`
    GitHubIssueRef { org: String, repo: String, id: u64 },
    /// A bare number; could live on either tracker.
    NumericRef(u64),
    /// Anything else is the description itself.
    FreeTextRef(String),
}

fn parse_id(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn strip_fragment(input: &str) -> &str {
    input.split('#').next().unwrap_or(input)
}

fn bugzilla_id(input: &str, bugzilla_url: &str) -> Option<u64> {
    let prefix = format!("{}/show_bug.cgi?id=", bugzilla_url.trim_end_matches('/'));
    let start = input.find(&prefix)? + prefix.len();
    parse_id(&input[start..])
}

fn github_issue(input: &str) -> Option<(String, String, u64)> {
    let rest = input
        .strip_prefix("https://")
        .or_else(|| input.strip_prefix("http://"))?;
    let rest = rest.split('?').next().unwrap_or(rest);
    let segments: Vec<&str> = rest.trim_end_matches('/').split('/').collect();
    match segments.as_slice() {
        [host, org, repo, "issues", id]
            if !host.is_empty() && !org.is_empty() && !repo.is_empty() =>
        {
            Some((org.to_string(), repo.to_string(), parse_id(id)?))
        }
        _ => None,
    }
}

impl Reference {
    /// Classify a reference; URL forms win over the ambiguous bare number.
    ///
    /// A run of digits too long to be an id is not free text either: no
    /// tracker can have it.
    pub fn parse(input: &str, bugzilla_url: &str) -> Result<Self> {
        let trimmed = input.trim();
        let without_fragment = strip_fragment(trimmed);

        if let Some(id) = bugzilla_id(without_fragment, bugzilla_url) {
            return Ok(Reference::BugzillaRef(id));
        }
        if let Some((org, repo, id)) = github_issue(without_fragment) {
            return Ok(Reference::GitHubIssueRef { org, repo, id });
        }
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return parse_id(trimmed)
                .map(Reference::NumericRef)
                .ok_or_else(|| GgError::ReferenceNotFound(trimmed.to_string()));
        }
        Ok(Reference::FreeTextRef(trimmed.to_string()))
    }
}

/// The `(org, repo)` a remote URL points at.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRepo {
    pub host: String,
    pub org: String,
    pub repo: String,
}

impl RemoteRepo {
    pub fn is_github(&self) -> bool {
        self.host.eq_ignore_ascii_case("github.com")
    }
}

/// Parse `git@<host>:<org>/<repo>.git` or `https://<host>/<org>/<repo>.git`.
pub fn parse_remote_url(url: &str) -> Result<RemoteRepo> {
    let invalid = || GgError::InvalidRemoteUrl(url.to_string());

    let (host, path) = if let Some(rest) = url.strip_prefix("git@") {
        rest.split_once(':').ok_or_else(invalid)?
    } else if let Some(rest) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
    {
        rest.split_once('/').ok_or_else(invalid)?
    } else {
        return Err(invalid());
    };

    let path = path.strip_suffix(".git").ok_or_else(invalid)?;
    let (org, repo) = path.split_once('/').ok_or_else(invalid)?;
    if host.is_empty() || org.is_empty() || repo.is_empty() {
        return Err(invalid());
    }

    log::debug!("parsed remote {} as {}/{} on {}", url, org, repo, host);
    Ok(RemoteRepo {
        host: host.to_string(),
        org: org.to_string(),
        repo: repo.to_string(),
    })
}

/// Compare URL offering to open a pull request from `fork:branch`.
///
/// The upstream default branch is assumed to be `master`.
pub fn pull_request_url(upstream: &RemoteRepo, fork_name: &str, branch: &str) -> String {
    format!(
        "https://github.com/{org}/{repo}/compare/{org}:master...{fork}:{branch}?expand=1",
        org = upstream.org,
        repo = upstream.repo,
        fork = fork_name,
        branch = branch,
    )
}

/// Make a branch name out of a free text description.
pub fn branch_name(description: &str, bug_number: Option<u64>) -> String {
    let kept: String = description
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '+' | '-'))
        .collect();

    let mut slug = String::new();
    let mut pending_dash = false;
    for c in kept.chars() {
        if c.is_whitespace() || c == '-' {
            pending_dash = true;
            continue;
        }
        if pending_dash && !slug.is_empty() {
            slug.push('-');
        }
        pending_dash = false;
        slug.push(c);
    }

    match bug_number {
        Some(id) if slug.is_empty() => id.to_string(),
        Some(id) => format!("{}-{}", id, slug),
        None => slug,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bugzilla_url() {
        let reference = Reference::parse(
            "https://bugzilla.mozilla.org/show_bug.cgi?id=1234#c3",
            DEFAULT_BUGZILLA_URL,
        ).unwrap();
        assert_eq!(reference, Reference::BugzillaRef(1234));
    }

    #[test]
    fn test_bugzilla_url_must_end_with_id() {
        let reference = Reference::parse(
            "https://bugzilla.mozilla.org/show_bug.cgi?id=1234&x=y",
            DEFAULT_BUGZILLA_URL,
        ).unwrap();
        assert!(matches!(reference, Reference::FreeTextRef(_)));
    }

    #[test]
    fn test_custom_bugzilla_base() {
        let reference = Reference::parse(
            "https://bugs.example.org/show_bug.cgi?id=77",
            "https://bugs.example.org/",
        ).unwrap();
        assert_eq!(reference, Reference::BugzillaRef(77));
    }

    #[test]
    fn test_github_issue_url() {
        let reference = Reference::parse(
            "https://github.com/myorg/myrepo/issues/42#issuecomment-1",
            DEFAULT_BUGZILLA_URL,
        ).unwrap();
        assert_eq!(
            reference,
            Reference::GitHubIssueRef {
                org: "myorg".to_string(),
                repo: "myrepo".to_string(),
                id: 42,
            }
        );
    }

    #[test]
    fn test_numeric_and_free_text() {
        assert_eq!(
            Reference::parse(" 1234 ", DEFAULT_BUGZILLA_URL).unwrap(),
            Reference::NumericRef(1234)
        );
        assert_eq!(
            Reference::parse("fix the 2 flaky tests", DEFAULT_BUGZILLA_URL).unwrap(),
            Reference::FreeTextRef("fix the 2 flaky tests".to_string())
        );
        assert_eq!(
            Reference::parse("https://github.com/o/r/pull/3", DEFAULT_BUGZILLA_URL).unwrap(),
            Reference::FreeTextRef("https://github.com/o/r/pull/3".to_string())
        );
    }

    #[test]
    fn test_overlong_number_is_not_free_text() {
        assert!(matches!(
            Reference::parse("99999999999999999999", DEFAULT_BUGZILLA_URL),
            Err(GgError::ReferenceNotFound(id)) if id == "99999999999999999999"
        ));
    }

    #[test]
    fn test_parse_remote_url_ssh() {
        let remote = parse_remote_url("git@github.com:myorg/myrepo.git").unwrap();
        assert_eq!(remote.host, "github.com");
        assert_eq!(remote.org, "myorg");
        assert_eq!(remote.repo, "myrepo");
        assert!(remote.is_github());
    }

    #[test]
    fn test_parse_remote_url_https() {
        let remote = parse_remote_url("https://gitlab.example.com/o/ther.git").unwrap();
        assert_eq!(remote.org, "o");
        assert_eq!(remote.repo, "ther");
        assert!(!remote.is_github());
    }

    #[test]
    fn test_parse_remote_url_requires_git_suffix() {
        assert!(matches!(
            parse_remote_url("https://github.com/myorg/myrepo"),
            Err(GgError::InvalidRemoteUrl(_))
        ));
        assert!(parse_remote_url("/local/path/repo.git").is_err());
    }

    #[test]
    fn test_pull_request_url() {
        let upstream = parse_remote_url("git@github.com:mozilla/kuma.git").unwrap();
        assert_eq!(
            pull_request_url(&upstream, "peterbe", "1234-fix-thing"),
            "https://github.com/mozilla/kuma/compare/mozilla:master...peterbe:1234-fix-thing?expand=1"
        );
    }

    #[test]
    fn test_branch_name() {
        assert_eq!(branch_name("foo \"bar\"", None), "foo-bar");
        let summary = "  a!@#$%^&*()_+{}[/]-= ;:   --> ==>  ---  `foo`   ,. <bar>     ";
        assert_eq!(branch_name(summary, None), "a_+-foo-bar");
        assert_eq!(branch_name("Crash on startup", Some(1234)), "1234-Crash-on-startup");
    }
}
