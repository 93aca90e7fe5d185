use super::*;
use crate::github::cli::{parse_issue, MockGitHubCli};

#[test]
fn test_parse_issue_from_gh_api() {
    let json = br#"{
        "id": 987654,
        "number": 1234,
        "title": "Issue Title Here",
        "html_url": "https://github.com/myorg/myrepo/issues/1234",
        "state": "open"
    }"#;

    let candidate = parse_issue(json, 1234).unwrap();
    assert_eq!(candidate.title, "Issue Title Here");
    assert_eq!(candidate.id, 1234);
    assert_eq!(candidate.url, "https://github.com/myorg/myrepo/issues/1234");
}

#[test]
fn test_parse_issue_rejects_garbage() {
    assert!(parse_issue(b"{\"message\": \"Not Found\"}", 1).is_err());
}

#[test]
fn test_mock_finds_registered_issue() {
    let github_cli = MockGitHubCli::new().with_issue("o", "ther", 7, "Seven");

    let found = github_cli.issue_title("o", "ther", 7).unwrap().unwrap();
    assert_eq!(found.title, "Seven");
    assert!(github_cli.issue_title("o", "ther", 8).unwrap().is_none());
    assert_eq!(github_cli.get_queried().len(), 2);
}

#[test]
fn test_mock_unavailable_finds_nothing() {
    let github_cli = MockGitHubCli::new()
        .with_issue("o", "ther", 7, "Seven")
        .set_available(false);

    assert!(!github_cli.is_available().unwrap());
    assert!(github_cli.issue_title("o", "ther", 7).unwrap().is_none());
}
