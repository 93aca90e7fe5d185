use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, SystemTime};

/// Below this age an untracked group is considered active work.
pub const RECENT_THRESHOLD: Duration = Duration::from_secs(60 * 60 * 12);

#[derive(Debug, Clone, PartialEq)]
pub struct UntrackedGroup {
    /// First component of the path, relative to the repository root.
    pub root_segment: String,
    /// Age of the most recently modified file under `root_segment`.
    pub youngest_age: Duration,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Triage {
    /// Stalest group first.
    pub groups: Vec<UntrackedGroup>,
    /// At least one group is younger than [`RECENT_THRESHOLD`].
    pub has_recent: bool,
}

impl Triage {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

fn root_segment(path: &str) -> &str {
    path.split(['/', std::path::MAIN_SEPARATOR])
        .find(|segment| !segment.is_empty())
        .unwrap_or(path)
}

/// Group untracked files by their top-level segment.
///
/// Each group reports the age of its youngest file; a file whose
/// modification time is in the future counts as age zero.
pub fn triage<P: AsRef<Path>>(files: &[(P, SystemTime)], now: SystemTime) -> Triage {
    let mut youngest: HashMap<String, Duration> = HashMap::new();
    for (path, modified) in files {
        let path = path.as_ref().to_string_lossy();
        let age = now.duration_since(*modified).unwrap_or(Duration::ZERO);
        youngest
            .entry(root_segment(&path).to_string())
            .and_modify(|current| {
                if age < *current {
                    *current = age;
                }
            })
            .or_insert(age);
    }

    let mut groups: Vec<UntrackedGroup> = youngest
        .into_iter()
        .map(|(root_segment, youngest_age)| UntrackedGroup {
            root_segment,
            youngest_age,
        })
        .collect();
    groups.sort_by(|a, b| {
        b.youngest_age
            .cmp(&a.youngest_age)
            .then_with(|| a.root_segment.cmp(&b.root_segment))
    });

    let has_recent = groups
        .iter()
        .any(|group| group.youngest_age < RECENT_THRESHOLD);

    Triage { groups, has_recent }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ago(now: SystemTime, seconds: u64) -> SystemTime {
        now - Duration::from_secs(seconds)
    }

    #[test]
    fn test_youngest_file_governs_group() {
        let now = SystemTime::now();
        let files = vec![
            ("build/a.o", ago(now, 10)),
            ("build/deep/b.o", ago(now, 3600)),
        ];
        let result = triage(&files, now);
        assert_eq!(
            result.groups,
            vec![UntrackedGroup {
                root_segment: "build".to_string(),
                youngest_age: Duration::from_secs(10),
            }]
        );
        assert!(result.has_recent);
    }

    #[test]
    fn test_stalest_group_first() {
        let now = SystemTime::now();
        let files = vec![
            ("notes.txt", ago(now, 60)),
            ("old/dump.sql", ago(now, 60 * 60 * 24 * 30)),
            ("scratch/x.py", ago(now, 3600)),
        ];
        let result = triage(&files, now);
        let roots: Vec<&str> = result
            .groups
            .iter()
            .map(|group| group.root_segment.as_str())
            .collect();
        assert_eq!(roots, vec!["old", "scratch", "notes.txt"]);
    }

    #[test]
    fn test_only_stale_files_do_not_prompt() {
        let now = SystemTime::now();
        let files = vec![
            ("old/a", ago(now, 60 * 60 * 13)),
            ("older/b", ago(now, 60 * 60 * 24 * 7)),
        ];
        let result = triage(&files, now);
        assert_eq!(result.groups.len(), 2);
        assert!(!result.has_recent);
    }

    #[test]
    fn test_future_mtime_is_zero_age() {
        let now = SystemTime::now();
        let files = vec![("clock-skew.txt", now + Duration::from_secs(100))];
        let result = triage(&files, now);
        assert_eq!(result.groups[0].youngest_age, Duration::ZERO);
    }

    #[test]
    fn test_no_files() {
        let files: Vec<(&str, SystemTime)> = Vec::new();
        let result = triage(&files, SystemTime::now());
        assert!(result.is_empty());
        assert!(!result.has_recent);
    }
}
