//! Subcommands of the CLI.

use super::*;

pub mod init;
pub mod organize;
pub mod summarize;

pub use init::{init, InitOptions};
pub use organize::{organize, OrganizeOptions};
pub use summarize::{summarize, SummarizeOptions};

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Write a configuration file with default settings
  Init(InitOptions),

  /// Rename, classify, and copy papers into a classification tree
  Organize(OrganizeOptions),

  /// Write a Markdown summary note for every paper
  Summarize(SummarizeOptions),
}

/// Reads the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<Config> {
  if !path.exists() {
    return Err(CliError::MissingConfig(path.to_path_buf()));
  }
  debug!("Using configuration at {path:?}");
  Ok(Config::load(path)?)
}
