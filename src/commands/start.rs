use crate::{
    bugzilla::{Bugzilla, BugzillaClient},
    commands::Context,
    errors::{GgError, Result},
    git::{Git, Vcs},
    github::{GitHubCli, GitHubCliImpl},
    parser::branch_name,
    prompt::Prompt,
    resolver::IssueResolver,
    state::{BranchRecord, State},
};
use chrono::Local;
use clap::Args;

#[derive(Debug, Args)]
pub struct Start {
    /// Bug or issue number, tracker URL, or a description of the work
    pub reference: Vec<String>,
}

impl Start {
    pub fn execute(&self, git: Git, context: &Context, prompt: &mut impl Prompt) -> Result<()> {
        let mut state = State::load(&context.configfile)?;
        let resolver = IssueResolver::new(
            BugzillaClient::new(state.bugzilla_url())?,
            GitHubCliImpl::new(),
            state.bugzilla_url(),
        );

        let branch = start_branch(&git, prompt, &resolver, &mut state, &self.reference.join(" "))?;
        state.save(&context.configfile)?;
        log::debug!("saved state for {} to {}", branch, context.configfile.display());
        Ok(())
    }
}

/// Resolve `reference`, create and check out its branch, and record why it exists.
pub fn start_branch<V: Vcs, P: Prompt, B: Bugzilla, G: GitHubCli>(
    vcs: &V,
    prompt: &mut P,
    resolver: &IssueResolver<B, G>,
    state: &mut State,
    reference: &str,
) -> Result<String> {
    let reference = match reference.trim() {
        "" => prompt.ask("Summary: ")?,
        given => given.to_string(),
    };
    if reference.is_empty() {
        return Err(GgError::EmptySummary);
    }

    let remotes = vcs.remotes()?;
    let resolved = resolver.resolve(&reference, &remotes, &state.fork_name_or_user())?;
    let description = resolved.description().trim().to_string();

    let branch = branch_name(&description, resolved.bug_number());
    if branch.is_empty() {
        return Err(GgError::EmptySummary);
    }
    vcs.create_branch(&branch)?;

    state.insert(
        &vcs.repository_name(),
        &branch,
        BranchRecord {
            description,
            bugnumber: resolved.bug_number(),
            url: resolved.url().map(str::to_string),
            date: Local::now().naive_local(),
        },
    );

    prompt.say(&format!("Switched to a new branch '{}'", branch));
    if let Some(url) = resolved.url() {
        prompt.say(&format!("\t{}", url));
    }
    Ok(branch)
}
