//! Module for writing a starting configuration file.

use super::*;

/// Arguments that can be used for the [`Commands::Init`]
#[derive(Args, Clone)]
pub struct InitOptions {
  /// Directory of papers to organize
  #[arg(long)]
  pub input:  Option<PathBuf>,
  /// Root of the classification tree
  #[arg(long)]
  pub output: Option<PathBuf>,
  /// Directory for summary notes
  #[arg(long)]
  pub notes:  Option<PathBuf>,
  /// Model identifier to request
  #[arg(long)]
  pub model:  Option<String>,
  /// Overwrite an existing configuration without asking
  #[arg(long, action = ArgAction::SetTrue)]
  pub force:  bool,
}

/// Function for the [`Commands::Init`] in the CLI.
pub fn init<I: UserInteraction>(interaction: &I, path: &Path, options: &InitOptions) -> Result<()> {
  if path.exists()
    && !options.force
    && !interaction.confirm(&format!(
      "A configuration already exists at {}. Overwrite it?",
      path.display()
    ))?
  {
    interaction.reply(ResponseContent::Info("Kept the existing configuration."))?;
    return Ok(());
  }

  let mut config = Config::default();
  if let Some(input) = &options.input {
    config = config.with_input_dir(input);
  }
  if let Some(output) = &options.output {
    config = config.with_output_dir(output);
  }
  if let Some(notes) = &options.notes {
    config = config.with_notes_dir(notes);
  }
  if let Some(model) = &options.model {
    config = config.with_model(model);
  }
  config.validate()?;
  config.save(path)?;

  interaction.reply(ResponseContent::Success(&format!(
    "Configuration written to {}\nInput directory: {:?}\nOutput directory: {:?}\nNotes directory: \
     {:?}\nModel: {}",
    path.display(),
    config.input_dir,
    config.output_dir,
    config.notes_dir,
    config.model,
  )))?;
  if config.resolved_api_key().is_err() {
    interaction.reply(ResponseContent::Warning(
      "No API key yet. Add `api_key` to the file or export PAPERSORT_API_KEY.",
    ))?;
  }
  Ok(())
}
