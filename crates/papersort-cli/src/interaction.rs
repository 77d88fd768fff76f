//! Terminal output and prompts.

use console::Term;
use dialoguer::Confirm;

use super::*;

/// Prefix for information messages
pub static INFO_PREFIX: &str = "ℹ ";
/// Prefix for success messages
pub static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for error messages
pub static ERROR_PREFIX: &str = "✗ ";
/// Prefix for warning messages
pub static WARNING_PREFIX: &str = "! ";
/// Prefix for user prompts
pub static PROMPT_PREFIX: &str = "❯ ";
/// Branch for all but the last list item
pub static ITEM_PREFIX: &str = "├─";
/// Branch for the last list item
pub static LAST_ITEM_PREFIX: &str = "└─";
/// Continuation line below a branch
pub static CONTINUE_PREFIX: &str = "│  ";
/// Separates a source from its destination
pub static ARROW: &str = "→";

/// Everything a command may show the user.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// Finished organization run and where its report went
  Organized {
    /// Rows and skipped documents of the run
    organized: &'a Organized,
    /// Path of the written report
    report:    &'a Path,
  },
  /// Notes written by the summarize command
  Notes(&'a [PathBuf]),
  /// Something completed
  Success(&'a str),
  /// Something needs the user's attention
  Warning(&'a str),
  /// Anything else
  Info(&'a str),
}

/// How commands talk to the user.
pub trait UserInteraction {
  /// Asks a yes/no question.
  fn confirm(&self, message: &str) -> Result<bool>;
  /// Shows `content` to the user.
  fn reply(&self, content: ResponseContent) -> Result<()>;
}

/// Interaction over stdout with `dialoguer` prompts.
pub struct Terminal {
  /// Answer every prompt with yes
  accept_defaults: bool,
  /// Where replies are written
  term:            Term,
}

impl Terminal {
  /// Creates a terminal interaction, optionally accepting every prompt.
  pub fn new(accept_defaults: bool) -> Self { Self { accept_defaults, term: Term::stdout() } }

  /// Prints one line per row, the skipped documents, and a summary line.
  fn reply_organized(&self, organized: &Organized, report: &Path) -> Result<()> {
    let count = organized.rows.len();
    for (index, row) in organized.rows.iter().enumerate() {
      let prefix = if index + 1 == count { LAST_ITEM_PREFIX } else { ITEM_PREFIX };
      let destination = if row.new_name.is_empty() {
        style("not copied").red().to_string()
      } else {
        format!("{}/{}", row.classification_path.replace('/', "_"), row.new_name)
      };
      self.term.write_line(&format!(
        "{prefix} {} {ARROW} {} ({})",
        style(&row.original_name).white(),
        style(destination).green(),
        row.confidence_display,
      ))?;
      if row.has_warnings() {
        let continuation = if index + 1 == count { "   " } else { CONTINUE_PREFIX };
        self.term.write_line(&format!(
          "{continuation}{} {}",
          style(WARNING_PREFIX).yellow(),
          style(&row.warnings).yellow()
        ))?;
      }
    }

    for skipped in &organized.skipped {
      self.term.write_line(&format!(
        "{} Skipped {} (no usable metadata)",
        style(WARNING_PREFIX).yellow(),
        skipped.display()
      ))?;
    }

    self.term.write_line(&format!(
      "{} Organized {} document(s): {} placed, {} with warnings, {} skipped",
      style(SUCCESS_PREFIX).green(),
      count,
      organized.placed(),
      organized.warned(),
      organized.skipped.len(),
    ))?;
    self.term.write_line(&format!(
      "{} Report written to {}",
      style(INFO_PREFIX).blue(),
      style(report.display()).yellow()
    ))?;
    Ok(())
  }
}

impl UserInteraction for Terminal {
  fn confirm(&self, message: &str) -> Result<bool> {
    if self.accept_defaults {
      return Ok(true);
    }
    Ok(
      Confirm::new()
        .with_prompt(format!("{} {message}", style(PROMPT_PREFIX).cyan()))
        .default(false)
        .interact()?,
    )
  }

  fn reply(&self, content: ResponseContent) -> Result<()> {
    match content {
      ResponseContent::Organized { organized, report } => self.reply_organized(organized, report)?,
      ResponseContent::Notes(notes) => {
        for note in notes {
          self.term.write_line(&format!("{ITEM_PREFIX} {}", style(note.display()).green()))?;
        }
        self.term.write_line(&format!(
          "{} Wrote {} note(s)",
          style(SUCCESS_PREFIX).green(),
          notes.len()
        ))?;
      },
      ResponseContent::Success(message) =>
        self.term.write_line(&format!("{} {message}", style(SUCCESS_PREFIX).green()))?,
      ResponseContent::Warning(message) =>
        self.term.write_line(&format!("{} {message}", style(WARNING_PREFIX).yellow()))?,
      ResponseContent::Info(message) =>
        self.term.write_line(&format!("{} {message}", style(INFO_PREFIX).blue()))?,
    }
    Ok(())
  }
}
