//! Module for the summarize command.

use super::*;

/// Arguments that can be used for the [`Commands::Summarize`]
#[derive(Args, Clone)]
pub struct SummarizeOptions {
  /// Directory of papers, overriding `input_dir` from the configuration
  #[arg(long, short)]
  pub input: Option<PathBuf>,
  /// Notes directory, overriding `notes_dir` from the configuration
  #[arg(long, short)]
  pub notes: Option<PathBuf>,
}

/// Function for the [`Commands::Summarize`] in the CLI.
pub async fn summarize<I: UserInteraction>(
  interaction: &I,
  config_path: &Path,
  options: &SummarizeOptions,
) -> Result<()> {
  let mut config = load_config(config_path)?;
  if let Some(input) = &options.input {
    config = config.with_input_dir(input);
  }
  if let Some(notes) = &options.notes {
    config = config.with_notes_dir(notes);
  }

  let summarizer = LlmSummarizer::new(LlmClient::from_config(&config)?, &config);
  let notebook = Notebook::new(&config, summarizer);

  interaction.reply(ResponseContent::Info(&format!(
    "Summarizing {} into {}",
    config.input_dir.display(),
    config.notes_dir.display()
  )))?;
  let notes = notebook.process(&config.input_dir, &config.notes_dir).await?;
  interaction.reply(ResponseContent::Notes(&notes))
}
