use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::errors::Result;
use crate::resolver::IssueCandidate;

pub trait Bugzilla {
    /// Summary and URL of bug `id`, `None` if it can't be seen.
    fn get_summary(&self, id: u64) -> Result<Option<IssueCandidate>>;
}

#[derive(Debug, Deserialize)]
struct Bug {
    summary: String,
}

#[derive(Debug, Deserialize)]
struct BugList {
    #[serde(default)]
    bugs: Vec<Bug>,
}

pub struct BugzillaClient {
    base_url: String,
    client: Client,
}

impl BugzillaClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("gg/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn bug_url(&self, id: u64) -> String {
        format!("{}/show_bug.cgi?id={}", self.base_url, id)
    }
}

impl Bugzilla for BugzillaClient {
    fn get_summary(&self, id: u64) -> Result<Option<IssueCandidate>> {
        let endpoint = format!("{}/rest/bug", self.base_url);
        log::debug!("GET {} id={}", endpoint, id);
        let response = self
            .client
            .get(&endpoint)
            .query(&[("id", id.to_string().as_str()), ("include_fields", "id,summary")])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            // Missing and private bugs both come back as client errors.
            log::debug!("bugzilla answered {} for bug {}", status, id);
            return Ok(None);
        }

        let list: BugList = response.json()?;
        Ok(list.bugs.into_iter().next().map(|bug| IssueCandidate {
            title: bug.summary,
            id,
            url: self.bug_url(id),
        }))
    }
}

#[cfg(test)]
pub struct MockBugzilla {
    pub bugs: std::collections::HashMap<u64, String>,
}

#[cfg(test)]
impl MockBugzilla {
    pub fn new() -> Self {
        Self {
            bugs: std::collections::HashMap::new(),
        }
    }

    pub fn with_bug(mut self, id: u64, summary: &str) -> Self {
        self.bugs.insert(id, summary.to_string());
        self
    }
}

#[cfg(test)]
impl Bugzilla for MockBugzilla {
    fn get_summary(&self, id: u64) -> Result<Option<IssueCandidate>> {
        Ok(self.bugs.get(&id).map(|summary| IssueCandidate {
            title: summary.clone(),
            id,
            url: format!("https://bugzilla.mozilla.org/show_bug.cgi?id={}", id),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bug_url() {
        let client = BugzillaClient::new("https://bugzilla.mozilla.org/").unwrap();
        assert_eq!(
            client.bug_url(1234),
            "https://bugzilla.mozilla.org/show_bug.cgi?id=1234"
        );
    }

    #[test]
    fn test_bug_list_shape() {
        let list: BugList = serde_json::from_str(
            r#"{"bugs": [{"id": 1234, "status": "NEW", "summary": "This is the summary"}], "faults": []}"#,
        )
        .unwrap();
        assert_eq!(list.bugs[0].summary, "This is the summary");

        let empty: BugList = serde_json::from_str(r#"{"faults": []}"#).unwrap();
        assert!(empty.bugs.is_empty());
    }
}
