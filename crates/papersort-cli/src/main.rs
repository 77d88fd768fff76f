//! Command line interface for the papersort paper organizer.
//!
//! This crate wraps the `papersort` library in a small CLI:
//! - Writing a starting configuration file
//! - Renaming, classifying, and filing a directory of papers
//! - Writing a Markdown summary note per paper
//!
//! # Usage
//!
//! ```bash
//! # Write a default configuration file
//! papersort init
//!
//! # Organize ./papers into ./organized and write processing_report.csv
//! papersort organize --input papers --output organized
//!
//! # Write one summary note per paper into ./notes
//! papersort summarize --input papers --notes notes
//! ```
//!
//! The API key is read from the configuration file or from the
//! `PAPERSORT_API_KEY` environment variable. Logging verbosity is raised with
//! `-v`, and `--log-dir` additionally writes the log to a file.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use clap::{builder::ArgAction, Args, Parser, Subcommand};
use console::style;
use papersort::{
  analysis::{LlmClassifier, LlmMetadataExtractor, LlmSummarizer},
  config::Config,
  error::PapersortError,
  llm::LlmClient,
  notes::Notebook,
  organizer::{Organized, Organizer},
};
use tracing::{debug, trace};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod commands;
pub mod error;
pub mod interaction;

use crate::{commands::*, error::*, interaction::*};

/// Name of the log file written under `--log-dir`
static LOG_FILE_NAME: &str = "papersort.log";

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Rename, classify, and file research papers")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Path to the configuration file. If not specified, uses the default platform-specific config
  /// directory.
  #[arg(long, short, global = true)]
  config: Option<PathBuf>,

  /// Directory to additionally write a log file into
  #[arg(long, global = true)]
  log_dir: Option<PathBuf>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,

  /// Skip all prompts and accept defaults (mostly for testing)
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

impl Cli {
  /// The configuration file this invocation works with.
  fn config_path(&self) -> PathBuf { self.config.clone().unwrap_or_else(Config::default_path) }
}

/// Configures the logging system based on the verbosity level
///
/// # Arguments
///
/// * `verbosity` - Number of times the verbose flag was used
/// * `log_dir` - Directory for an additional, uncolored log file
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
///
/// `RUST_LOG` takes precedence when set. The returned guard must be held until
/// exit so buffered file output is flushed.
fn setup_logging(verbosity: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  let registry = tracing_subscriber::registry().with(filter).with(
    fmt::layer()
      .with_writer(std::io::stderr)
      .with_file(true)
      .with_line_number(true)
      .with_thread_ids(true)
      .with_target(true),
  );

  match log_dir {
    Some(log_dir) => {
      let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, LOG_FILE_NAME));
      registry.with(fmt::layer().with_ansi(false).with_writer(writer)).init();
      Some(guard)
    },
    None => {
      registry.init();
      None
    },
  }
}

/// Entry point for the papersort CLI application
///
/// Parses arguments, sets up logging, and runs the requested command. Errors
/// are printed with a styled prefix and turn into a non-zero exit code.
#[tokio::main]
async fn main() {
  let cli = Cli::parse();
  let _guard = setup_logging(cli.verbose, cli.log_dir.as_deref());
  trace!("Parsed command line, config path {:?}", cli.config_path());

  let interaction = Terminal::new(cli.accept_defaults);
  let result = match &cli.command {
    Commands::Init(options) => init(&interaction, &cli.config_path(), options),
    Commands::Organize(options) => organize(&interaction, &cli.config_path(), options).await,
    Commands::Summarize(options) => summarize(&interaction, &cli.config_path(), options).await,
  };

  if let Err(e) = result {
    eprintln!("{} {e}", style(ERROR_PREFIX).red());
    std::process::exit(1);
  }
}
