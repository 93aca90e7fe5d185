//! The `gg commit` sequence.
//!
//! Each [`Step`] does one thing and names the next one; any error aborts the
//! whole command. Decisions that need the user go through [`Prompt`] so the
//! sequence runs the same against a terminal or a script.

use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::duration::humanize_seconds;
use crate::errors::{GgError, Result};
use crate::git::{Remote, Vcs};
use crate::parser::{parse_remote_url, pull_request_url};
use crate::prompt::Prompt;
use crate::state::State;
use crate::untracked::triage;

/// Direct commits to this branch are refused.
pub const TRUNK_BRANCH: &str = "master";

#[derive(Debug, Clone, Default)]
pub struct CommitOptions {
    pub no_verify: bool,
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub commit_id: String,
    pub pushed: bool,
    pub pull_request_url: Option<String>,
}

#[derive(Debug)]
enum Step {
    PreflightBranch,
    UntrackedCheck {
        branch: String,
    },
    MessageLookup {
        branch: String,
    },
    MessageConfirm {
        branch: String,
        message: String,
        bug_number: Option<u64>,
    },
    StageAndCommit {
        branch: String,
        message: String,
    },
    PublishDecision {
        branch: String,
        commit_id: String,
    },
    PrLinkDecision {
        branch: String,
        fork: Remote,
        outcome: Outcome,
    },
    Done(Outcome),
}

pub struct CommitWorkflow<'a, V: Vcs, P: Prompt> {
    vcs: &'a V,
    prompt: &'a mut P,
    state: &'a State,
    options: CommitOptions,
}

impl<'a, V: Vcs, P: Prompt> CommitWorkflow<'a, V, P> {
    pub fn new(vcs: &'a V, prompt: &'a mut P, state: &'a State, options: CommitOptions) -> Self {
        Self {
            vcs,
            prompt,
            state,
            options,
        }
    }

    pub fn run(&mut self) -> Result<Outcome> {
        let mut step = Step::PreflightBranch;
        loop {
            log::debug!("commit step: {:?}", step);
            step = match step {
                Step::PreflightBranch => self.preflight_branch()?,
                Step::UntrackedCheck { branch } => self.untracked_check(branch)?,
                Step::MessageLookup { branch } => self.message_lookup(branch)?,
                Step::MessageConfirm {
                    branch,
                    message,
                    bug_number,
                } => self.message_confirm(branch, message, bug_number)?,
                Step::StageAndCommit { branch, message } => self.stage_and_commit(branch, message)?,
                Step::PublishDecision { branch, commit_id } => {
                    self.publish_decision(branch, commit_id)?
                }
                Step::PrLinkDecision {
                    branch,
                    fork,
                    outcome,
                } => self.pr_link_decision(branch, fork, outcome)?,
                Step::Done(outcome) => return Ok(outcome),
            };
        }
    }

    fn preflight_branch(&mut self) -> Result<Step> {
        let branch = self.vcs.active_branch_name()?;
        if branch == TRUNK_BRANCH {
            return Err(GgError::OnMasterBranch);
        }
        Ok(Step::UntrackedCheck { branch })
    }

    fn untracked_check(&mut self, branch: String) -> Result<Step> {
        let now = SystemTime::now();
        let workdir = self.vcs.workdir().to_path_buf();

        let mut files: Vec<(PathBuf, SystemTime)> = Vec::new();
        for path in self.vcs.untracked_files()? {
            match fs::metadata(workdir.join(&path)).and_then(|m| m.modified()) {
                Ok(modified) => files.push((path, modified)),
                Err(e) => log::warn!("Cannot stat {}: {}", path.display(), e),
            }
        }

        let triage = triage(&files, now);
        if triage.is_empty() {
            return Ok(Step::MessageLookup { branch });
        }

        self.prompt.say("NOTE! There are untracked files:");
        for group in &triage.groups {
            let mut display = group.root_segment.clone();
            if workdir.join(&group.root_segment).is_dir() {
                display.push('/');
            }
            self.prompt.say(&format!(
                "\t{:<60} {}",
                display,
                humanize_seconds(group.youngest_age.as_secs())
            ));
        }

        // Stale leftovers are assumed deliberate; only ask about recent ones.
        if triage.has_recent {
            if !self.prompt.confirm("Ignore untracked files?")? {
                return Err(GgError::UserDeclinedUntracked);
            }
            self.prompt.say("");
        }
        Ok(Step::MessageLookup { branch })
    }

    fn message_lookup(&mut self, branch: String) -> Result<Step> {
        let record = self
            .state
            .lookup(&self.vcs.repository_name(), &branch)?;
        Ok(Step::MessageConfirm {
            message: record.commit_message(),
            bug_number: record.bugnumber,
            branch,
        })
    }

    fn message_confirm(
        &mut self,
        branch: String,
        message: String,
        bug_number: Option<u64>,
    ) -> Result<Step> {
        self.prompt.say("Commit message:");
        self.prompt.say(&format!("\t{}", message));
        self.prompt.say("");

        if !self.prompt.confirm("OK?")? {
            let replacement = self
                .prompt
                .ask("Type a new commit message (or empty to exit): ")?;
            if replacement.is_empty() {
                return Err(GgError::EmptyReplacementMessage);
            }
            return Ok(Step::MessageConfirm {
                branch,
                message: replacement,
                bug_number,
            });
        }

        let message = if bug_number.is_some() && self.prompt.confirm("Add the \"fixes\" prefix?")? {
            format!("fixes {}", message)
        } else {
            message
        };
        Ok(Step::StageAndCommit { branch, message })
    }

    fn stage_and_commit(&mut self, branch: String, message: String) -> Result<Step> {
        if !self.vcs.is_dirty()? {
            return Err(GgError::NothingToCommit);
        }
        let files = self.vcs.tracked_files()?;
        if files.is_empty() {
            return Err(GgError::NoFilesStaged);
        }
        self.vcs.stage_all(&files)?;

        let commit_id = match self.vcs.commit(&message) {
            Ok(commit_id) => commit_id,
            Err(GgError::HookFailure(hook)) if self.options.no_verify => {
                log::debug!("hook {} failed with --no-verify", hook.command);
                return Err(GgError::NotImplemented(
                    "committing without running the commit hooks".to_string(),
                ));
            }
            Err(e) => return Err(e),
        };

        if self.options.verbose {
            self.prompt
                .say(&format!("Committed {:.7} on {}", commit_id, branch));
        }
        Ok(Step::PublishDecision { branch, commit_id })
    }

    fn publish_decision(&mut self, branch: String, commit_id: String) -> Result<Step> {
        let outcome = Outcome {
            commit_id,
            pushed: false,
            pull_request_url: None,
        };
        let Some(fork_name) = self.state.fork_name.as_deref() else {
            self.prompt
                .say("Can't help you push the commit. Please run: gg config --help");
            return Ok(Step::Done(outcome));
        };

        let fork = self.vcs.remote(fork_name)?;
        let pushed = if self.prompt.confirm(&format!("Push branch to {}?", fork_name))? {
            self.vcs.push(&fork.name, &branch)?;
            true
        } else {
            false
        };

        Ok(Step::PrLinkDecision {
            branch,
            fork,
            outcome: Outcome { pushed, ..outcome },
        })
    }

    fn pr_link_decision(&mut self, branch: String, fork: Remote, outcome: Outcome) -> Result<Step> {
        if !self.state.github {
            if self.options.verbose {
                self.prompt.say("Can't help create a GitHub Pull Request.");
                self.prompt.say("Consider running: gg config --github");
            }
            return Ok(Step::Done(outcome));
        }

        match parse_remote_url(&fork.url) {
            Ok(parsed) if parsed.is_github() => {}
            _ => {
                log::debug!("{} is not a GitHub remote, no pull request link", fork.url);
                return Ok(Step::Done(outcome));
            }
        }

        // The commit is made and maybe pushed by now; a missing link is not fatal.
        let upstream = match self
            .vcs
            .remote(self.state.origin_name())
            .and_then(|upstream| parse_remote_url(&upstream.url))
        {
            Ok(upstream) => upstream,
            Err(e) => {
                log::warn!("No pull request link: {}", e);
                return Ok(Step::Done(outcome));
            }
        };
        let url = pull_request_url(&upstream, &fork.name, &branch);

        self.prompt.say("Now, to make a Pull Request, go to:");
        self.prompt.say("");
        self.prompt.say(&url);

        Ok(Step::Done(Outcome {
            pull_request_url: Some(url),
            ..outcome
        }))
    }
}
