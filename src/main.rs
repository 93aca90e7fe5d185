use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use commands::commit::Commit;
use commands::config::Config;
use commands::start::Start;
use commands::Context;
use errors::{GgError, Result};
use git::Git;
use prompt::Terminal;

mod bugzilla;
mod commands;
mod duration;
mod errors;
mod git;
mod github;
mod parser;
mod prompt;
mod resolver;
mod state;
mod untracked;
mod workflow;

#[derive(Debug, Parser)] // requires `derive` feature
#[command(name = "gg")]
#[command(about = "Commit and publish branches started from a bug, an issue or a summary", long_about = None)]
struct Cli {
    /// Path to the JSON state file (default: ~/.gg.json)
    #[arg(long, global = true, env = "GG_CONFIGFILE")]
    configfile: Option<PathBuf>,

    /// Say more about what is going on
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Commit the current branch
    Commit(Commit),
    /// Create a branch for a bug, an issue or a summary
    Start(Start),
    /// Show or change the push and pull request settings
    Config(Config),
}

fn run(args: Cli) -> Result<()> {
    let configfile = match args.configfile {
        Some(path) => path,
        None => state::default_path()?,
    };
    let context = Context {
        configfile,
        verbose: args.verbose,
    };
    let mut terminal = Terminal::new();

    match args.command {
        Commands::Commit(commit) => commit.execute(Git::open(".")?, &context, &mut terminal),
        Commands::Start(start) => start.execute(Git::open(".")?, &context, &mut terminal),
        Commands::Config(config) => config.execute(&context, &mut terminal),
    }
}

fn main() {
    let args = Cli::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        if let GgError::AmbiguousReference(candidates) = &e {
            for candidate in candidates {
                eprintln!("\t{}", candidate.url);
                eprintln!("\t{}\n", candidate.title);
            }
        }
        std::process::exit(1);
    }
}
