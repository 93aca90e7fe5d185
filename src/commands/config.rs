use crate::{commands::Context, errors::Result, prompt::Prompt, state::State};
use clap::Args;

#[derive(Debug, Args)]
pub struct Config {
    /// Remote that points at your own fork (empty string to unset)
    #[arg(long)]
    pub fork_name: Option<String>,

    /// Remote that points at the upstream repository (default: origin)
    #[arg(long)]
    pub origin_name: Option<String>,

    /// Print GitHub pull request links after pushing
    #[arg(long, conflicts_with = "no_github")]
    pub github: bool,

    /// Stop printing GitHub pull request links
    #[arg(long)]
    pub no_github: bool,
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl Config {
    pub fn execute(&self, context: &Context, prompt: &mut impl Prompt) -> Result<()> {
        let mut state = State::load(&context.configfile)?;
        if self.apply(&mut state) {
            state.save(&context.configfile)?;
        }

        prompt.say(&format!(
            "FORK_NAME: {}",
            state.fork_name.as_deref().unwrap_or("(not set)")
        ));
        prompt.say(&format!("ORIGIN_NAME: {}", state.origin_name()));
        prompt.say(&format!("GITHUB: {}", state.github));
        prompt.say(&format!("Branches recorded: {}", state.branches.len()));
        Ok(())
    }

    /// Update the settings; true if anything was asked to change.
    pub fn apply(&self, state: &mut State) -> bool {
        let mut changed = false;
        if let Some(fork_name) = &self.fork_name {
            state.fork_name = non_empty(fork_name);
            changed = true;
        }
        if let Some(origin_name) = &self.origin_name {
            state.origin_name = non_empty(origin_name);
            changed = true;
        }
        if self.github || self.no_github {
            state.github = self.github;
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::testing::ScriptedPrompt;
    use tempfile::TempDir;

    fn config() -> Config {
        Config {
            fork_name: None,
            origin_name: None,
            github: false,
            no_github: false,
        }
    }

    #[test]
    fn test_nothing_to_apply() {
        let mut state = State::default();
        assert!(!config().apply(&mut state));
        assert_eq!(state, State::default());
    }

    #[test]
    fn test_set_and_unset() {
        let mut state = State::default();
        let set = Config {
            fork_name: Some("peterbe".to_string()),
            github: true,
            ..config()
        };
        assert!(set.apply(&mut state));
        assert_eq!(state.fork_name.as_deref(), Some("peterbe"));
        assert!(state.github);

        let unset = Config {
            fork_name: Some(String::new()),
            no_github: true,
            ..config()
        };
        assert!(unset.apply(&mut state));
        assert_eq!(state.fork_name, None);
        assert!(!state.github);
    }

    #[test]
    fn test_execute_saves() {
        let dir = TempDir::new().unwrap();
        let context = Context {
            configfile: dir.path().join("state.json"),
            verbose: false,
        };
        let mut prompt = ScriptedPrompt::new(&[]);
        let command = Config {
            fork_name: Some("peterbe".to_string()),
            origin_name: Some("upstream".to_string()),
            ..config()
        };

        command.execute(&context, &mut prompt).unwrap();
        let state = State::load(&context.configfile).unwrap();
        assert_eq!(state.fork_name.as_deref(), Some("peterbe"));
        assert_eq!(state.origin_name(), "upstream");
        assert!(prompt.output().contains("FORK_NAME: peterbe"));
    }
}
