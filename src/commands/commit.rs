use crate::{
    commands::Context,
    errors::Result,
    git::Git,
    prompt::Prompt,
    state::State,
    workflow::{CommitOptions, CommitWorkflow},
};
use clap::Args;

#[derive(Debug, Args)]
pub struct Commit {
    /// This option bypasses the pre-commit and commit-msg hooks
    #[arg(short = 'n', long)]
    pub no_verify: bool,
}

impl Commit {
    pub fn execute(&self, git: Git, context: &Context, prompt: &mut impl Prompt) -> Result<()> {
        let state = State::load(&context.configfile)?;
        let options = CommitOptions {
            no_verify: self.no_verify,
            verbose: context.verbose,
        };

        let outcome = CommitWorkflow::new(&git, prompt, &state, options).run()?;
        log::debug!(
            "commit {} pushed={} pull_request={:?}",
            outcome.commit_id,
            outcome.pushed,
            outcome.pull_request_url
        );
        Ok(())
    }
}
