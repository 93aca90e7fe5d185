use std::path::PathBuf;

pub mod commit;
pub mod config;
pub mod start;

/// Options shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub configfile: PathBuf,
    pub verbose: bool,
}
