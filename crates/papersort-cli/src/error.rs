//! Error types for the papersort command line interface.

use thiserror::Error;

use super::*;

/// Result alias for CLI operations.
pub type Result<T> = core::result::Result<T, CliError>;

/// Errors surfaced to the user by the CLI.
#[derive(Error, Debug)]
pub enum CliError {
  /// Errors from the papersort library
  #[error(transparent)]
  Papersort(#[from] PapersortError),

  /// The configuration file does not exist yet
  #[error("No configuration found at {0:?}. Run `papersort init` first.")]
  MissingConfig(PathBuf),

  /// Errors from interactive prompts
  #[error(transparent)]
  Dialoguer(#[from] dialoguer::Error),

  /// Errors writing to the terminal
  #[error(transparent)]
  Io(#[from] std::io::Error),
}
