pub mod cli;

#[cfg(test)]
mod tests;

pub use cli::{GitHubCli, GitHubCliImpl};
