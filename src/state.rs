//! The branch state file.
//!
//! A single JSON object mixing scalar settings (`FORK_NAME`, `ORIGIN_NAME`,
//! `GITHUB`, ...) with one entry per branch created by gg, keyed
//! `"<repository>:<branch>"`. It is read in full once per command and
//! written in full at most once.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{GgError, Result};
use crate::parser::DEFAULT_BUGZILLA_URL;

const FORK_NAME: &str = "FORK_NAME";
const ORIGIN_NAME: &str = "ORIGIN_NAME";
const GITHUB: &str = "GITHUB";
const BUGZILLA: &str = "BUGZILLA";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchRecord {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bugnumber: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub date: NaiveDateTime,
}

impl BranchRecord {
    /// The commit message proposed for this branch.
    pub fn commit_message(&self) -> String {
        match self.bugnumber {
            Some(bugnumber) => format!("bug {} - {}", bugnumber, self.description),
            None => self.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    pub fork_name: Option<String>,
    pub origin_name: Option<String>,
    pub github: bool,
    pub bugzilla_url: Option<String>,
    pub branches: BTreeMap<String, BranchRecord>,
    /// Top level keys gg doesn't know about, written back untouched.
    pub other: Map<String, Value>,
}

pub fn branch_key(repository: &str, branch: &str) -> String {
    format!("{}:{}", repository, branch)
}

/// `~/.gg.json`
pub fn default_path() -> Result<PathBuf> {
    Ok(dirs::home_dir().ok_or(GgError::NoHomeDir)?.join(".gg.json"))
}

fn unreadable(path: &Path, reason: impl ToString) -> GgError {
    GgError::StoreUnreadable {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

fn string_setting(path: &Path, key: &str, value: Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(unreadable(
            path,
            format!("{} should be a string, found {}", key, other),
        )),
    }
}

impl State {
    /// Load the state file; a missing file is an empty state.
    pub fn load(path: &Path) -> Result<Self> {
        log::debug!("State::load path={}", path.display());
        if !path.exists() {
            log::debug!("state file not found, starting empty");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let object = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(object)) => object,
            Ok(other) => return Err(unreadable(path, format!("expected an object, found {}", other))),
            Err(e) => return Err(unreadable(path, e)),
        };

        let mut state = Self::default();
        for (key, value) in object {
            match key.as_str() {
                FORK_NAME => state.fork_name = string_setting(path, &key, value)?,
                ORIGIN_NAME => state.origin_name = string_setting(path, &key, value)?,
                BUGZILLA => state.bugzilla_url = string_setting(path, &key, value)?,
                GITHUB => {
                    state.github = value.as_bool().unwrap_or(!value.is_null());
                    if !value.is_boolean() && !value.is_null() {
                        state.other.insert(key, value);
                    }
                }
                _ if key.contains(':') && value.is_object() => {
                    let record = serde_json::from_value(value)
                        .map_err(|e| unreadable(path, format!("{}: {}", key, e)))?;
                    state.branches.insert(key, record);
                }
                _ => {
                    state.other.insert(key, value);
                }
            }
        }
        log::debug!("loaded {} branch records", state.branches.len());
        Ok(state)
    }

    /// Write the whole state through a temp file renamed over `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        log::debug!("State::save path={}", path.display());
        let mut object = self.other.clone();
        if let Some(fork_name) = &self.fork_name {
            object.insert(FORK_NAME.to_string(), Value::String(fork_name.clone()));
        }
        if let Some(origin_name) = &self.origin_name {
            object.insert(ORIGIN_NAME.to_string(), Value::String(origin_name.clone()));
        }
        if let Some(bugzilla_url) = &self.bugzilla_url {
            object.insert(BUGZILLA.to_string(), Value::String(bugzilla_url.clone()));
        }
        if !self.github {
            object.remove(GITHUB);
        } else if !object.contains_key(GITHUB) {
            object.insert(GITHUB.to_string(), Value::Bool(true));
        }
        for (key, record) in &self.branches {
            object.insert(key.clone(), serde_json::to_value(record)?);
        }

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, &Value::Object(object))?;
        file.write_all(b"\n")?;
        file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    pub fn lookup(&self, repository: &str, branch: &str) -> Result<&BranchRecord> {
        let key = branch_key(repository, branch);
        self.branches
            .get(&key)
            .ok_or(GgError::NoBranchState(key))
    }

    pub fn insert(&mut self, repository: &str, branch: &str, record: BranchRecord) {
        self.branches.insert(branch_key(repository, branch), record);
    }

    pub fn origin_name(&self) -> &str {
        self.origin_name.as_deref().unwrap_or("origin")
    }

    pub fn bugzilla_url(&self) -> &str {
        self.bugzilla_url.as_deref().unwrap_or(DEFAULT_BUGZILLA_URL)
    }

    /// The remote that is "mine": `FORK_NAME`, else the local user name.
    pub fn fork_name_or_user(&self) -> String {
        if let Some(fork_name) = &self.fork_name {
            return fork_name.clone();
        }
        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "user".to_string())
    }
}
